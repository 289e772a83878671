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

//! Operations on rides and their passengers.

use crate::db;
use crate::driver::Driver;
use crate::driver::policy::{check_elevated, check_ride_access};
use crate::model::*;
use rideshare_core::db::DbError;
use rideshare_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Gets all rides.
    pub(crate) async fn get_rides(self) -> DriverResult<Vec<Ride>> {
        let rides = db::get_rides(&mut self.db.ex().await?).await?;
        Ok(rides)
    }

    /// Gets all rides driven by `driver`.
    pub(crate) async fn get_rides_by_driver(self, driver: AccountId) -> DriverResult<Vec<Ride>> {
        let rides = db::get_rides_by_driver(&mut self.db.ex().await?, driver).await?;
        Ok(rides)
    }

    /// Gets all rides that go exactly from `start` to `end`.
    pub(crate) async fn get_rides_by_destination(
        self,
        start: Coordinates,
        end: Coordinates,
    ) -> DriverResult<Vec<Ride>> {
        let rides = db::get_rides_by_destination(&mut self.db.ex().await?, start, end).await?;
        Ok(rides)
    }

    /// Gets the ride identified by `id`.
    pub(crate) async fn get_ride(self, id: RideId) -> DriverResult<Ride> {
        let ride = db::get_ride(&mut self.db.ex().await?, id).await?;
        Ok(ride)
    }

    /// Gets the payments of the passengers of the ride identified by `id`.
    pub(crate) async fn get_passengers(self, id: RideId) -> DriverResult<Vec<Payment>> {
        let mut ex = self.db.ex().await?;
        db::get_ride(&mut ex, id).await?;
        let payments = db::get_payments_by_ride(&mut ex, id).await?;
        Ok(payments)
    }

    /// Creates a new ride described by `details`.
    ///
    /// The caller becomes the driver unless the details name one.  Only administrators and
    /// moderators can create rides on behalf of somebody else.
    pub(crate) async fn add_ride(
        self,
        whoami: Principal,
        details: RideDetails,
    ) -> DriverResult<Ride> {
        let driver = details.driver.unwrap_or(whoami.id);
        if driver != whoami.id {
            check_elevated(&whoami, "create rides for other drivers")?;
        }

        let mut tx = self.db.begin().await?;

        match db::get_account(tx.ex(), driver).await {
            Ok(_) => (),
            Err(DbError::NotFound) => {
                return Err(DriverError::NotFound(format!("Driver {} not found", driver)));
            }
            Err(e) => return Err(e.into()),
        }
        let ride = db::create_ride(tx.ex(), driver, details.start, details.end, details.route)
            .await
            .map_err(|e| match (e, details.route) {
                (DbError::NotFound, Some(route)) => {
                    DriverError::NotFound(format!("Route {} not found", route))
                }
                (e, _) => e.into(),
            })?;

        tx.commit().await?;
        log::info!("Created ride {} for driver {}", ride.id(), driver);
        Ok(ride)
    }

    /// Updates the ride identified by `id` with new `details`.
    ///
    /// `body_id` is the identifier the client included in the request, if any, and it must match
    /// `id`.  The status of the ride is not affected.
    pub(crate) async fn update_ride(
        self,
        whoami: Principal,
        id: RideId,
        body_id: Option<RideId>,
        details: RideDetails,
    ) -> DriverResult<Ride> {
        if let Some(body_id) = body_id {
            if body_id != id {
                return Err(DriverError::InvalidInput(format!(
                    "Ride identifier {} in body does not match {} in path",
                    body_id, id
                )));
            }
        }

        let mut tx = self.db.begin().await?;

        let ride = db::get_ride(tx.ex(), id).await?;
        check_ride_access(&whoami, &ride)?;
        if details.driver.is_some_and(|driver| driver != *ride.driver()) {
            check_elevated(&whoami, "reassign rides to other drivers")?;
        }
        let ride = ride.with_details(details);
        db::update_ride(tx.ex(), &ride).await?;

        tx.commit().await?;
        Ok(ride)
    }

    /// Deletes the ride identified by `id` along with its payments.
    pub(crate) async fn delete_ride(self, whoami: Principal, id: RideId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        let ride = db::get_ride(tx.ex(), id).await?;
        check_ride_access(&whoami, &ride)?;
        let payments = db::delete_payments_by_ride(tx.ex(), id).await?;
        db::delete_ride(tx.ex(), id).await?;

        tx.commit().await?;
        log::info!("Deleted ride {} and its {} payments", id, payments);
        Ok(())
    }

    /// Moves the ride identified by `id` to the status computed by `next`, failing with
    /// `InvalidState` if `next` does not allow the transition.  `verb` names the transition.
    async fn transition_ride(
        self,
        whoami: Principal,
        id: RideId,
        next: fn(RideStatus) -> Option<RideStatus>,
        verb: &str,
    ) -> DriverResult<Ride> {
        let mut tx = self.db.begin().await?;

        let ride = db::get_ride(tx.ex(), id).await?;
        check_ride_access(&whoami, &ride)?;
        let status = match next(*ride.status()) {
            Some(status) => status,
            None => {
                return Err(DriverError::InvalidState(format!(
                    "Cannot {} ride {} because it is {}",
                    verb,
                    id,
                    ride.status().as_str()
                )));
            }
        };
        let ride = ride.with_status(status);
        db::update_ride(tx.ex(), &ride).await?;

        tx.commit().await?;
        log::info!("Ride {} is now {}", id, status.as_str());
        Ok(ride)
    }

    /// Starts the pending ride identified by `id`.
    pub(crate) async fn start_ride(self, whoami: Principal, id: RideId) -> DriverResult<Ride> {
        self.transition_ride(whoami, id, RideStatus::start, "start").await
    }

    /// Stops the started ride identified by `id`.
    pub(crate) async fn stop_ride(self, whoami: Principal, id: RideId) -> DriverResult<Ride> {
        self.transition_ride(whoami, id, RideStatus::stop, "stop").await
    }

    /// Adds the caller as a passenger of the ride identified by `id` with an unpaid payment.
    pub(crate) async fn join_ride(self, whoami: Principal, id: RideId) -> DriverResult<Ride> {
        let mut tx = self.db.begin().await?;

        let ride = db::get_ride(tx.ex(), id).await?;
        if !ride.status().accepts_passengers() {
            return Err(DriverError::InvalidState(format!(
                "Cannot join ride {} because it is {}",
                id,
                ride.status().as_str()
            )));
        }
        db::create_payment(tx.ex(), id, whoami.id).await.map_err(|e| match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(format!(
                "Account {} already joined ride {}",
                whoami.id, id
            )),
            e => e.into(),
        })?;

        tx.commit().await?;
        Ok(ride)
    }

    /// Removes the caller from the passengers of the ride identified by `id`.
    ///
    /// Leaving a ride that the caller is not part of is not an error.
    pub(crate) async fn leave_ride(self, whoami: Principal, id: RideId) -> DriverResult<Ride> {
        let mut tx = self.db.begin().await?;

        let ride = db::get_ride(tx.ex(), id).await?;
        match db::delete_payment(tx.ex(), id, whoami.id).await {
            Ok(()) => (),
            Err(DbError::NotFound) => {
                log::warn!("Account {} tried to leave ride {} without being in it", whoami.id, id);
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(ride)
    }
}
