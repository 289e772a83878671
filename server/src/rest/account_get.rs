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

//! API to get the details of an account.

use crate::driver::Driver;
use crate::model::AccountId;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<AccountId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;
    let account = driver.get_account(whoami, id).await?;
    Ok(Json(account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::rest::testutils::*;
    use axum::http;
    use rideshare_core::rest::testutils::*;
    use serde_json::Value;

    fn route(id: AccountId) -> (http::Method, String) {
        (http::Method::GET, format!("/api/accounts/{}", id))
    }

    #[tokio::test]
    async fn test_own_account() {
        let context = TestContext::setup().await;
        let (user, token) = context.login_as("user", Role::User).await;

        let response = OneShotBuilder::new(context.app(), route(user.id))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(user.id.as_i64(), response["id"]);
        assert_eq!("user@example.com", response["email"]);
        assert_eq!("Tester", response["surname"]);
    }

    #[tokio::test]
    async fn test_admin_reads_other() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("admin", Role::Admin).await;
        let user = context.create_account("user", Role::User).await;

        let response = OneShotBuilder::new(context.app(), route(user.id))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(user.id.as_i64(), response["id"]);
    }

    #[tokio::test]
    async fn test_forbidden() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("moderator", Role::Moderator).await;
        let user = context.create_account("user", Role::User).await;

        OneShotBuilder::new(context.app(), route(user.id))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("Access denied")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("admin", Role::Admin).await;

        OneShotBuilder::new(context.app(), route(AccountId::from(9999)))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(AccountId::from(1))
    );
}
