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

//! The `Payment` data type.

use crate::model::{AccountId, RideId};
use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier of a payment, assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub(crate) struct PaymentId(i64);

impl PaymentId {
    /// Returns the raw numeric value of the identifier.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Membership of an account in a ride, along with whether the account has paid for it.
///
/// The set of payments of a ride is the set of its passengers.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Payment {
    /// Identifier of the payment.
    id: PaymentId,

    /// Ride the payment is for.
    ride: RideId,

    /// Passenger that owes the payment.
    owner: AccountId,

    /// Whether the payment has been settled.
    paid: bool,
}

impl Payment {
    /// Creates a new payment from its parts.
    pub(crate) fn new(id: PaymentId, ride: RideId, owner: AccountId, paid: bool) -> Self {
        Self { id, ride, owner, paid }
    }
}
