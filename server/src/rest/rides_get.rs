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

//! API to list rides, optionally restricted to those of a single driver.

use crate::driver::Driver;
use crate::model::AccountId;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};
use serde::{Deserialize, Serialize};

/// Filters accepted by the API.
#[derive(Default, Deserialize, Serialize)]
pub(crate) struct RidesQuery {
    /// Only return the rides driven by this account.
    #[serde(skip_serializing_if = "Option::is_none")]
    driver: Option<AccountId>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Query(query): Query<RidesQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    require_whoami(&driver, &headers).await?;

    let rides = match query.driver {
        Some(id) => driver.get_rides_by_driver(id).await?,
        None => driver.get_rides().await?,
    };

    Ok(Json(rides))
}
