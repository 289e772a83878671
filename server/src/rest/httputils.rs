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

//! Utilities to extract credentials from HTTP requests.

use crate::driver::Driver;
use crate::model::{AccessToken, Password, Principal};
use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose;
use rideshare_core::driver::DriverError;
use rideshare_core::model::EmailAddress;
use rideshare_core::rest::{RestError, RestResult, get_unique_header};

/// Authentication realm advertised in the challenges of rejected requests.
pub(crate) const REALM: &str = "rideshare";

/// Builds an authentication error for the `scheme` challenge with a descriptive `message`.
fn unauthorized<S: Into<String>>(scheme: &'static str, message: S) -> RestError {
    RestError::Unauthorized { scheme, realm: REALM, message: message.into() }
}

/// Gets the payload of the `Authorization` header in `headers` after validating that it uses
/// `exp_scheme`.
fn get_authorization_payload<'a>(
    headers: &'a HeaderMap,
    exp_scheme: &'static str,
) -> RestResult<&'a str> {
    let authz = match get_unique_header(headers, "Authorization") {
        Ok(Some(value)) => value,
        Ok(None) => return Err(unauthorized(exp_scheme, "Missing Authorization header")),
        Err(e) => return Err(unauthorized(exp_scheme, e.to_string())),
    };

    let authz = authz.to_str().map_err(|e| {
        unauthorized(exp_scheme, format!("Bad encoding in Authorization header: {}", e))
    })?;

    let (scheme, payload) = match authz.split_once(' ') {
        Some((scheme, _)) if scheme.is_empty() => {
            return Err(unauthorized(exp_scheme, "Bad Authorization header: missing scheme"));
        }
        Some(parts) => parts,
        None if authz.is_empty() => {
            return Err(unauthorized(exp_scheme, "Bad Authorization header: missing scheme"));
        }
        None => return Err(unauthorized(exp_scheme, "Bad Authorization header: missing payload")),
    };

    if scheme != exp_scheme {
        return Err(unauthorized(exp_scheme, "Unsupported scheme"));
    }

    Ok(payload)
}

/// Extracts the email and password of a login request sent with basic authentication.
pub(crate) fn get_basic_auth(headers: &HeaderMap) -> RestResult<(EmailAddress, Password)> {
    let payload = get_authorization_payload(headers, "Basic")?;

    let payload = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| unauthorized("Basic", format!("Bad base64 encoding in payload: {}", e)))?;
    let payload = String::from_utf8(payload)
        .map_err(|e| unauthorized("Basic", format!("Bad UTF-8 encoding in payload: {}", e)))?;

    let (email, password) = match payload.split_once(':') {
        Some(parts) => parts,
        None => return Err(unauthorized("Basic", "Bad content")),
    };

    Ok((EmailAddress::new(email)?, Password::new(password)?))
}

/// Checks whether the request carries an `Authorization` header at all.
pub(crate) fn has_auth(headers: &HeaderMap) -> RestResult<bool> {
    match get_unique_header(headers, "Authorization") {
        Ok(value) => Ok(value.is_some()),
        Err(e) => Err(unauthorized("Bearer", e.to_string())),
    }
}

/// Extracts the access token of a request sent with bearer authentication.
pub(crate) fn get_bearer_auth(headers: &HeaderMap) -> RestResult<AccessToken> {
    let payload = get_authorization_payload(headers, "Bearer")?;
    AccessToken::new(payload).map_err(|e| unauthorized("Bearer", e.to_string()))
}

/// Converts an authentication failure reported by the `driver` into a challenge for `scheme`.
pub(crate) fn map_auth_error(scheme: &'static str, e: DriverError) -> RestError {
    match e {
        DriverError::Unauthorized(message) => unauthorized(scheme, message),
        e => e.into(),
    }
}

/// Resolves the caller of a request that requires bearer authentication.
pub(crate) async fn require_whoami(driver: &Driver, headers: &HeaderMap) -> RestResult<Principal> {
    let access_token = get_bearer_auth(headers)?;
    driver.clone().authenticate(access_token).await.map_err(|e| map_auth_error("Bearer", e))
}

/// Resolves the caller of a request where bearer authentication is optional.
pub(crate) async fn optional_whoami(
    driver: &Driver,
    headers: &HeaderMap,
) -> RestResult<Option<Principal>> {
    if has_auth(headers)? { Ok(Some(require_whoami(driver, headers).await?)) } else { Ok(None) }
}
