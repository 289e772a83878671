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

//! API to create a new route.

use crate::driver::Driver;
use crate::model::{RouteDetails, RouteType, TimeInterval};
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use rideshare_core::rest::RestError;
use serde::Deserialize;

/// Message sent to the server to create a route.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteRequest {
    /// Name of the place where the route starts.
    starting_destination: String,

    /// Name of the place where the route ends.
    final_destination: String,

    /// Whether the route is traveled once or periodically.
    route_type: RouteType,

    /// How often the route is traveled, for recurring routes.
    time_interval: Option<TimeInterval>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<RouteRequest>,
) -> Result<impl IntoResponse, RestError> {
    require_whoami(&driver, &headers).await?;

    let details = RouteDetails::new(
        request.starting_destination,
        request.final_destination,
        request.route_type,
        request.time_interval,
    )?;
    let route = driver.add_route(details).await?;

    Ok((http::StatusCode::CREATED, Json(route)))
}
