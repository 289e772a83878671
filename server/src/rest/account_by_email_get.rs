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

//! API to look up an account by its email address.

use crate::driver::Driver;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::model::EmailAddress;
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(email): Path<String>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;
    let email = EmailAddress::new(email)?;
    let account = driver.get_account_by_email(whoami, email).await?;
    Ok(Json(account))
}

#[cfg(test)]
mod tests {
    use crate::model::Role;
    use crate::rest::testutils::*;
    use axum::http;
    use rideshare_core::rest::testutils::*;
    use serde_json::Value;

    fn route(email: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/accounts/email/{}", email))
    }

    #[tokio::test]
    async fn test_own_account() {
        let context = TestContext::setup().await;
        let (user, token) = context.login_as("user", Role::User).await;

        let response = OneShotBuilder::new(context.app(), route("USER@example.com"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<Value>()
            .await;
        assert_eq!(user.id.as_i64(), response["id"]);
    }

    #[tokio::test]
    async fn test_invisible_account_is_not_found() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;
        context.create_account("other", Role::User).await;

        for email in ["other@example.com", "missing@example.com"] {
            OneShotBuilder::new(context.app(), route(email))
                .with_bearer_auth(token.as_str())
                .send_empty()
                .await
                .expect_status(http::StatusCode::NOT_FOUND)
                .expect_error(&format!("Account {} not found", email))
                .await;
        }
    }

    #[tokio::test]
    async fn test_invalid_email() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;

        OneShotBuilder::new(context.app(), route("not-an-email"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("valid address")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route("user@example.com")
    );
}
