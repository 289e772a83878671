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

//! API to terminate the session of the caller.

use crate::driver::Driver;
use crate::rest::httputils::{get_bearer_auth, map_auth_error};
use axum::extract::State;
use axum::http::{self, HeaderMap};
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<http::StatusCode, RestError> {
    let access_token = get_bearer_auth(&headers)?;
    driver.logout(access_token).await.map_err(|e| map_auth_error("Bearer", e))?;
    Ok(http::StatusCode::NO_CONTENT)
}
