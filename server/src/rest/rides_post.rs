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

//! API to offer a new ride.

use crate::driver::Driver;
use crate::model::{AccountId, Coordinates, RideDetails, RideId, RouteId};
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::State;
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use rideshare_core::rest::RestError;
use serde::Deserialize;

/// Message sent to the server to create or update a ride.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RideRequest {
    /// Identifier of the ride.  Ignored on creation and must match the path on updates.
    id: Option<RideId>,

    /// Driver of the ride.  Defaults to the caller on creation and to the current driver on
    /// updates.
    driver: Option<AccountId>,

    /// Starting point of the ride.
    start: Coordinates,

    /// Final point of the ride.
    end: Coordinates,

    /// Route the ride follows, if any.
    route: Option<RouteId>,
}

impl RideRequest {
    /// Splits the request into the identifier given by the client and the ride details.
    pub(super) fn into_parts(self) -> (Option<RideId>, RideDetails) {
        let details = RideDetails {
            driver: self.driver,
            start: self.start,
            end: self.end,
            route: self.route,
        };
        (self.id, details)
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    headers: HeaderMap,
    Json(request): Json<RideRequest>,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;

    let (id, details) = request.into_parts();
    if let Some(id) = id {
        log::debug!("Ignoring client-provided identifier {} for new ride", id);
    }
    let ride = driver.add_ride(whoami, details).await?;

    Ok((http::StatusCode::CREATED, Json(ride)))
}
