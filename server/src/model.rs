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

//! High-level data types.

mod accesstoken;
pub(crate) use accesstoken::AccessToken;
mod account;
pub use account::{AccountId, Role};
pub(crate) use account::{Account, AccountDetails, PersonName, Principal};
mod passwords;
pub(crate) use passwords::{HashedPassword, Password};
mod payment;
pub(crate) use payment::{Payment, PaymentId};
mod ride;
pub(crate) use ride::{Coordinates, Ride, RideDetails, RideId, RideStatus};
mod route;
pub(crate) use route::{Route, RouteDetails, RouteId, RouteType, TimeInterval};
mod session;
pub(crate) use session::Session;
