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

//! The `Ride` data type and its lifecycle.

use crate::model::{AccountId, RouteId};
use derive_getters::Getters;
use derive_more::{Display, From};
use rideshare_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a ride, assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub(crate) struct RideId(i64);

impl RideId {
    /// Returns the raw numeric value of the identifier.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Unvalidated representation of `Coordinates` as received from the outside world.
#[derive(Deserialize)]
struct RawCoordinates {
    /// Latitude in degrees.
    latitude: f64,

    /// Longitude in degrees.
    longitude: f64,
}

/// A point on the globe.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "RawCoordinates")]
pub(crate) struct Coordinates {
    /// Latitude in degrees, in the [-90, 90] range.
    latitude: f64,

    /// Longitude in degrees, in the [-180, 180] range.
    longitude: f64,
}

impl Coordinates {
    /// Creates a new pair of coordinates, making sure they are in range.
    pub(crate) fn new(latitude: f64, longitude: f64) -> ModelResult<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ModelError(format!("Latitude {} is out of range", latitude)));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ModelError(format!("Longitude {} is out of range", longitude)));
        }
        Ok(Self { latitude, longitude })
    }

    /// Returns the latitude in degrees.
    pub(crate) fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    pub(crate) fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = ModelError;

    fn try_from(raw: RawCoordinates) -> ModelResult<Self> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

/// Lifecycle status of a ride.
///
/// Rides can only move forward: `Pending` to `Started` to `Stopped`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum RideStatus {
    /// The ride has been created but has not departed yet.
    Pending,

    /// The ride is in progress.
    Started,

    /// The ride is over.
    Stopped,
}

impl RideStatus {
    /// Returns the textual representation of the status as stored in the database.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Pending => "PENDING",
            RideStatus::Started => "STARTED",
            RideStatus::Stopped => "STOPPED",
        }
    }

    /// Computes the status after starting a ride in this status, if allowed.
    pub(crate) fn start(self) -> Option<RideStatus> {
        match self {
            RideStatus::Pending => Some(RideStatus::Started),
            RideStatus::Started | RideStatus::Stopped => None,
        }
    }

    /// Computes the status after stopping a ride in this status, if allowed.
    pub(crate) fn stop(self) -> Option<RideStatus> {
        match self {
            RideStatus::Started => Some(RideStatus::Stopped),
            RideStatus::Pending | RideStatus::Stopped => None,
        }
    }

    /// Returns true if passengers can still join a ride in this status.
    pub(crate) fn accepts_passengers(self) -> bool {
        self != RideStatus::Stopped
    }
}

impl FromStr for RideStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "PENDING" => Ok(RideStatus::Pending),
            "STARTED" => Ok(RideStatus::Started),
            "STOPPED" => Ok(RideStatus::Stopped),
            _ => Err(ModelError(format!("Unknown ride status '{}'", s))),
        }
    }
}

/// Properties of a ride that clients provide when creating or updating it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RideDetails {
    /// Account that drives the ride.  Defaults to the caller when absent.
    pub(crate) driver: Option<AccountId>,

    /// Where the ride departs from.
    pub(crate) start: Coordinates,

    /// Where the ride arrives at.
    pub(crate) end: Coordinates,

    /// Route this ride belongs to, if any.
    pub(crate) route: Option<RouteId>,
}

/// A ride as stored in the database.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Ride {
    /// Identifier of the ride.
    id: RideId,

    /// Account that drives the ride.
    driver: AccountId,

    /// Where the ride departs from.
    start: Coordinates,

    /// Where the ride arrives at.
    end: Coordinates,

    /// Current lifecycle status.
    status: RideStatus,

    /// Route this ride belongs to, if any.
    route: Option<RouteId>,
}

impl Ride {
    /// Creates a new ride from its parts.
    pub(crate) fn new(
        id: RideId,
        driver: AccountId,
        start: Coordinates,
        end: Coordinates,
        status: RideStatus,
        route: Option<RouteId>,
    ) -> Self {
        Self { id, driver, start, end, status, route }
    }

    /// Replaces the client-provided details of the ride.  The driver is only replaced if the
    /// details carry one.
    pub(crate) fn with_details(mut self, details: RideDetails) -> Self {
        if let Some(driver) = details.driver {
            self.driver = driver;
        }
        self.start = details.start;
        self.end = details.end;
        self.route = details.route;
        self
    }

    /// Replaces the status of the ride.
    pub(crate) fn with_status(mut self, status: RideStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens, assert_de_tokens_error};

    #[test]
    fn test_coordinates_ok() {
        let c = Coordinates::new(42.69, 23.32).unwrap();
        assert_eq!(42.69, c.latitude());
        assert_eq!(23.32, c.longitude());

        Coordinates::new(-90.0, -180.0).unwrap();
        Coordinates::new(90.0, 180.0).unwrap();
    }

    #[test]
    fn test_coordinates_error() {
        Coordinates::new(90.5, 0.0).unwrap_err();
        Coordinates::new(-90.5, 0.0).unwrap_err();
        Coordinates::new(0.0, 180.5).unwrap_err();
        Coordinates::new(0.0, -180.5).unwrap_err();
        Coordinates::new(f64::NAN, 0.0).unwrap_err();
        Coordinates::new(0.0, f64::NAN).unwrap_err();
    }

    #[test]
    fn test_coordinates_de() {
        assert_de_tokens(
            &Coordinates::new(1.5, -2.5).unwrap(),
            &[
                Token::Struct { name: "RawCoordinates", len: 2 },
                Token::Str("latitude"),
                Token::F64(1.5),
                Token::Str("longitude"),
                Token::F64(-2.5),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_coordinates_de_error() {
        assert_de_tokens_error::<Coordinates>(
            &[
                Token::Struct { name: "RawCoordinates", len: 2 },
                Token::Str("latitude"),
                Token::F64(100.0),
                Token::Str("longitude"),
                Token::F64(0.0),
                Token::StructEnd,
            ],
            "Latitude 100 is out of range",
        );
    }

    #[test]
    fn test_ride_status_transitions() {
        assert_eq!(Some(RideStatus::Started), RideStatus::Pending.start());
        assert_eq!(None, RideStatus::Started.start());
        assert_eq!(None, RideStatus::Stopped.start());

        assert_eq!(None, RideStatus::Pending.stop());
        assert_eq!(Some(RideStatus::Stopped), RideStatus::Started.stop());
        assert_eq!(None, RideStatus::Stopped.stop());
    }

    #[test]
    fn test_ride_status_accepts_passengers() {
        assert!(RideStatus::Pending.accepts_passengers());
        assert!(RideStatus::Started.accepts_passengers());
        assert!(!RideStatus::Stopped.accepts_passengers());
    }

    #[test]
    fn test_ride_status_from_str_matches_as_str() {
        for status in [RideStatus::Pending, RideStatus::Started, RideStatus::Stopped] {
            assert_eq!(status, RideStatus::from_str(status.as_str()).unwrap());
        }
        RideStatus::from_str("pending").unwrap_err();
    }

    #[test]
    fn test_ride_serialization() {
        let ride = Ride::new(
            RideId::from(3),
            AccountId::from(8),
            Coordinates::new(1.0, 2.0).unwrap(),
            Coordinates::new(3.0, 4.0).unwrap(),
            RideStatus::Started,
            None,
        );
        assert_eq!(
            serde_json::json!({
                "id": 3,
                "driver": 8,
                "start": {"latitude": 1.0, "longitude": 2.0},
                "end": {"latitude": 3.0, "longitude": 4.0},
                "status": "STARTED",
                "route": null,
            }),
            serde_json::to_value(&ride).unwrap()
        );
    }

    #[test]
    fn test_ride_with_details_keeps_driver_when_absent() {
        let ride = Ride::new(
            RideId::from(3),
            AccountId::from(8),
            Coordinates::new(1.0, 2.0).unwrap(),
            Coordinates::new(3.0, 4.0).unwrap(),
            RideStatus::Pending,
            None,
        );
        let details = RideDetails {
            driver: None,
            start: Coordinates::new(5.0, 6.0).unwrap(),
            end: Coordinates::new(7.0, 8.0).unwrap(),
            route: Some(RouteId::from(2)),
        };
        let ride = ride.with_details(details);
        assert_eq!(AccountId::from(8), *ride.driver());
        assert_eq!(Coordinates::new(5.0, 6.0).unwrap(), *ride.start());
        assert_eq!(Some(RouteId::from(2)), *ride.route());
        assert_eq!(RideStatus::Pending, *ride.status());
    }
}
