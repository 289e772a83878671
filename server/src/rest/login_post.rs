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

//! API to log into an account.

use crate::driver::Driver;
use crate::model::AccessToken;
use crate::rest::httputils::{get_basic_auth, map_auth_error};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// Message returned by the server after a successful login attempt.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct LoginResponse {
    /// Access token for this session.
    pub(crate) access_token: AccessToken,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let (email, password) = get_basic_auth(&headers)?;

    let session = driver.login(email, password).await.map_err(|e| map_auth_error("Basic", e))?;
    let response = LoginResponse { access_token: session.take_access_token() };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::rest::testutils::*;
    use axum::http;
    use rideshare_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/login".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let user = context.create_account("user", Role::User).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("user@example.com", "test-password")
            .send_empty()
            .await
            .expect_json::<LoginResponse>()
            .await;

        let whoami = context.driver().authenticate(response.access_token).await.unwrap();
        assert_eq!(user, whoami);
    }

    #[tokio::test]
    async fn test_bad_password() {
        let context = TestContext::setup().await;
        context.create_account("user", Role::User).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth("user@example.com", "wrong")
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED);
        let exp_challenge = "Basic realm=\"rideshare\"".to_owned();
        assert_eq!(Some(exp_challenge), response.header("WWW-Authenticate"));
        response.expect_error("Invalid email or password").await;
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_basic_auth("unknown@example.com", "test-password")
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid email or password")
            .await;
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Missing Authorization header")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_email() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_basic_auth("not-an-email", "test-password")
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("valid address")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
