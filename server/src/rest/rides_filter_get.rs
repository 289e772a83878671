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

//! API to find the rides between two exact points.

use crate::driver::Driver;
use crate::model::Coordinates;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};
use serde::{Deserialize, Serialize};

/// Points to match rides against.
///
/// Clients send the starting latitude as `starLatitude` and existing callers depend on it.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FilterQuery {
    /// Latitude of the starting point.
    #[serde(rename = "starLatitude")]
    start_latitude: f64,

    /// Longitude of the starting point.
    start_longitude: f64,

    /// Latitude of the final point.
    end_latitude: f64,

    /// Longitude of the final point.
    end_longitude: f64,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Query(query): Query<FilterQuery>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    require_whoami(&driver, &headers).await?;

    let start = Coordinates::new(query.start_latitude, query.start_longitude)?;
    let end = Coordinates::new(query.end_latitude, query.end_longitude)?;
    let rides = driver.get_rides_by_destination(start, end).await?;

    Ok(Json(rides))
}
