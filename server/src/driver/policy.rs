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

//! Authorization rules that gate access to entities.
//!
//! All rules follow the same shape: the owner of an entity can act on it, and so can callers with
//! a sufficiently privileged role.

use crate::model::{AccountId, Principal, Ride};
use rideshare_core::driver::{DriverError, DriverResult};

/// Checks that `whoami` can read or modify the account `id`, which is only allowed for the
/// account itself and for administrators.
pub(super) fn check_account_access(whoami: &Principal, id: AccountId) -> DriverResult<()> {
    if whoami.id == id || whoami.is_admin() {
        Ok(())
    } else {
        Err(DriverError::Unauthorized(format!("Cannot access account {}", id)))
    }
}

/// Checks that `whoami` can modify `ride`, which is only allowed for its driver and for
/// administrators and moderators.
pub(super) fn check_ride_access(whoami: &Principal, ride: &Ride) -> DriverResult<()> {
    if whoami.id == *ride.driver() || whoami.is_elevated() {
        Ok(())
    } else {
        Err(DriverError::Unauthorized(format!("Cannot modify ride {}", ride.id())))
    }
}

/// Checks that `whoami` is an administrator or a moderator, using `action` to describe the
/// rejected operation.
pub(super) fn check_elevated(whoami: &Principal, action: &str) -> DriverResult<()> {
    if whoami.is_elevated() {
        Ok(())
    } else {
        Err(DriverError::Unauthorized(format!("Only administrators and moderators can {}", action)))
    }
}
