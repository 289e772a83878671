// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! API to unsubscribe the caller from a route.

use crate::driver::Driver;
use crate::model::RouteId;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<RouteId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;
    let route = driver.unsubscribe_route(whoami, id).await?;
    Ok(Json(route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, Route};
    use crate::rest::testutils::*;
    use axum::http;
    use rideshare_core::rest::testutils::*;

    fn route(id: RouteId) -> (http::Method, String) {
        (http::Method::POST, format!("/api/routes/{}/unsubscribe", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let (user, token) = context.login_as("user", Role::User).await;
        let other = context.create_account("other", Role::User).await;
        let route_ = context.create_route("Sofia", "Plovdiv").await;
        context.driver().subscribe_route(user, *route_.id()).await.unwrap();
        context.driver().subscribe_route(other, *route_.id()).await.unwrap();

        let response = OneShotBuilder::new(context.app(), route(*route_.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Route>()
            .await;
        assert_eq!(&[other.id], response.subscribers().as_slice());
    }

    #[tokio::test]
    async fn test_not_subscribed() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;
        let route_ = context.create_route("Sofia", "Plovdiv").await;

        let response = OneShotBuilder::new(context.app(), route(*route_.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Route>()
            .await;
        assert_eq!(route_, response);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(RouteId::from(1)));
}
