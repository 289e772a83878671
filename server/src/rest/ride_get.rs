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

//! API to get the details of a ride.

use crate::driver::Driver;
use crate::model::RideId;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<RideId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    require_whoami(&driver, &headers).await?;
    let ride = driver.get_ride(id).await?;
    Ok(Json(ride))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ride, Role};
    use crate::rest::testutils::*;
    use axum::http;
    use rideshare_core::rest::testutils::*;

    fn route(id: RideId) -> (http::Method, String) {
        (http::Method::GET, format!("/api/rides/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;
        let driver = context.create_account("driver", Role::User).await;
        let ride = context.create_ride(driver.id).await;

        let response = OneShotBuilder::new(context.app(), route(*ride.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Ride>()
            .await;
        assert_eq!(ride, response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;

        OneShotBuilder::new(context.app(), route(RideId::from(42)))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (http::Method::GET, "/api/rides/abc"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_text("Cannot parse")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(RideId::from(1)));
}
