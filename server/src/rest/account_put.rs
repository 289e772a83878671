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

//! API to update the details of an account.

use crate::driver::Driver;
use crate::model::{AccountDetails, AccountId, Password, PersonName, Role};
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::model::EmailAddress;
use rideshare_core::rest::RestError;
use serde::Deserialize;

/// Message sent to the server to update an account.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountUpdateRequest {
    /// Identifier of the account, which must match the one in the path if present.
    id: Option<AccountId>,

    /// New email address.
    email: EmailAddress,

    /// New first name.
    first_name: PersonName,

    /// New surname.
    surname: PersonName,

    /// New password.  The current one is kept if missing.
    password: Option<Password>,

    /// New role, only honored if the caller is an administrator.
    role: Option<Role>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<AccountId>,
    headers: HeaderMap,
    Json(request): Json<AccountUpdateRequest>,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;

    let details = AccountDetails {
        email: request.email,
        first_name: request.first_name,
        surname: request.surname,
        role: request.role,
    };
    let account = driver.update_account(whoami, id, request.id, details, request.password).await?;

    Ok(Json(account))
}
