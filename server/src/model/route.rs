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

//! The `Route` data type.

use crate::model::AccountId;
use derive_getters::Getters;
use derive_more::{Display, From};
use rideshare_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of destination names per the schema.
const MAX_DESTINATION_LENGTH: usize = 256;

/// Identifier of a route, assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub(crate) struct RouteId(i64);

impl RouteId {
    /// Returns the raw numeric value of the identifier.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Generates the string conversions of a fieldless enum that is stored as text.
macro_rules! text_enum [
    ( $t:ident, $what:expr, $( $variant:ident => $text:expr ),+ ) => {
        impl $t {
            /// Returns the textual representation of the value as stored in the database.
            pub(crate) fn as_str(&self) -> &'static str {
                match self {
                    $( $t::$variant => $text, )+
                }
            }
        }

        impl FromStr for $t {
            type Err = ModelError;

            fn from_str(s: &str) -> ModelResult<Self> {
                match s {
                    $( $text => Ok($t::$variant), )+
                    _ => Err(ModelError(format!("Unknown {} '{}'", $what, s))),
                }
            }
        }
    }
];

/// Whether a route is traveled once or repeatedly.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum RouteType {
    /// Traveled once.
    OneTime,

    /// Traveled repeatedly at a `TimeInterval`.
    Recurring,
}

text_enum!(RouteType, "route type", OneTime => "ONE_TIME", Recurring => "RECURRING");

/// Frequency of a recurring route.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum TimeInterval {
    /// Every day.
    Daily,

    /// Every week.
    Weekly,

    /// Every month.
    Monthly,
}

text_enum!(
    TimeInterval,
    "time interval",
    Daily => "DAILY",
    Weekly => "WEEKLY",
    Monthly => "MONTHLY"
);

/// Validates the name of a destination.
fn validate_destination(name: &str) -> ModelResult<()> {
    if name.trim().is_empty() {
        return Err(ModelError("Destination cannot be empty".to_owned()));
    }
    if name.chars().count() > MAX_DESTINATION_LENGTH {
        return Err(ModelError("Destination is too long".to_owned()));
    }
    Ok(())
}

/// Properties of a route that clients provide when creating it.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct RouteDetails {
    /// Name of the place where the route begins.
    starting_destination: String,

    /// Name of the place where the route ends.
    final_destination: String,

    /// Whether the route is traveled once or repeatedly.
    route_type: RouteType,

    /// Frequency of the route, if recurring.
    time_interval: Option<TimeInterval>,
}

impl RouteDetails {
    /// Creates a new set of route details, making sure the destinations are valid.
    pub(crate) fn new<S1: Into<String>, S2: Into<String>>(
        starting_destination: S1,
        final_destination: S2,
        route_type: RouteType,
        time_interval: Option<TimeInterval>,
    ) -> ModelResult<Self> {
        let starting_destination = starting_destination.into();
        let final_destination = final_destination.into();
        validate_destination(&starting_destination)?;
        validate_destination(&final_destination)?;
        Ok(Self { starting_destination, final_destination, route_type, time_interval })
    }

    /// Converts these details into a route with the given `id` and no subscribers.
    pub(crate) fn into_route(self, id: RouteId) -> Route {
        Route {
            id,
            starting_destination: self.starting_destination,
            final_destination: self.final_destination,
            route_type: self.route_type,
            time_interval: self.time_interval,
            subscribers: vec![],
        }
    }
}

/// A route as stored in the database, along with the accounts subscribed to it.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Route {
    /// Identifier of the route.
    id: RouteId,

    /// Name of the place where the route begins.
    starting_destination: String,

    /// Name of the place where the route ends.
    final_destination: String,

    /// Whether the route is traveled once or repeatedly.
    route_type: RouteType,

    /// Frequency of the route, if recurring.
    time_interval: Option<TimeInterval>,

    /// Accounts subscribed to the route, sorted by identifier.
    subscribers: Vec<AccountId>,
}

impl Route {
    /// Creates a new route from its parts, as read from storage.
    pub(crate) fn new(
        id: RouteId,
        details: RouteDetails,
        mut subscribers: Vec<AccountId>,
    ) -> Self {
        subscribers.sort();
        Self { subscribers, ..details.into_route(id) }
    }
}
