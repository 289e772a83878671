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

//! API to register a new account.

use crate::driver::Driver;
use crate::model::{AccountDetails, AccountId, Password, PersonName, Role};
use crate::rest::httputils::optional_whoami;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use rideshare_core::model::EmailAddress;
use rideshare_core::rest::RestError;
use serde::Deserialize;

/// Message sent to the server to register a new account.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountRequest {
    /// Identifier proposed by the client, which must not exist yet.
    id: Option<AccountId>,

    /// Email address of the new account.
    email: EmailAddress,

    /// First name of the account holder.
    first_name: PersonName,

    /// Surname of the account holder.
    surname: PersonName,

    /// Password for the new account.
    password: Password,

    /// Role for the new account, only honored if the caller is an administrator.
    role: Option<Role>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<AccountRequest>,
) -> Result<impl IntoResponse, RestError> {
    let whoami = optional_whoami(&driver, &headers).await?;

    let details = AccountDetails {
        email: request.email,
        first_name: request.first_name,
        surname: request.surname,
        role: request.role,
    };
    let account = driver.add_account(whoami, request.id, details, request.password).await?;

    Ok((http::StatusCode::CREATED, Json(account)))
}
