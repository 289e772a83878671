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

//! API to delete a route.

use crate::driver::Driver;
use crate::model::RouteId;
use crate::rest::httputils::require_whoami;
use axum::extract::{Path, State};
use axum::http::{self, HeaderMap};
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<RouteId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<http::StatusCode, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;
    driver.delete_route(whoami, id).await?;
    Ok(http::StatusCode::NO_CONTENT)
}
