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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::{Driver, DriverOptions};
use crate::model::*;
use rideshare_core::clocks::testutils::{SettableClock, utc_datetime};
use rideshare_core::db::{Db, Executor};
use rideshare_core::model::EmailAddress;
use std::sync::Arc;

/// Password assigned to all accounts created by `TestContext::create_account`.
pub(crate) const TEST_PASSWORD: &str = "test-password";

/// State of a running test against the business layer.
pub(crate) struct TestContext {
    /// Database backing the driver, exposed to allow tests to inspect and tweak its contents.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock backing the driver, exposed to allow tests to control time.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver backed by an in-memory database and default options.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_opts(DriverOptions::default()).await
    }

    /// Initializes a driver backed by an in-memory database and the given `opts`.
    pub(crate) async fn setup_with_opts(opts: DriverOptions) -> Self {
        let db: Arc<dyn Db + Send + Sync> = Arc::new(db::testutils::setup_sqlite().await);
        let clock = Arc::new(SettableClock::new(utc_datetime(2023, 6, 1, 10, 0, 0)));
        let driver = Driver::new(db.clone(), clock.clone(), opts);
        Self { db, clock, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver under test.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the clock used by the driver.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Creates an account named `name` with the given `role` and returns its principal.
    ///
    /// The email address of the account is `<name>@example.com` and its password is
    /// `TEST_PASSWORD`.
    pub(crate) async fn create_account(&self, name: &'static str, role: Role) -> Principal {
        let account = db::create_account(
            &mut self.ex().await,
            EmailAddress::new(format!("{}@example.com", name)).unwrap(),
            PersonName::from(name),
            PersonName::from("Tester"),
            Password::from(TEST_PASSWORD).hash().unwrap(),
            role,
        )
        .await
        .unwrap();
        account.principal()
    }

    /// Gets the stored account identified by `id`, if any.
    pub(crate) async fn get_account(&self, id: AccountId) -> Option<Account> {
        db::get_account(&mut self.ex().await, id).await.ok()
    }

    /// Creates a ride driven by `driver` between two fixed points.
    pub(crate) async fn create_ride(&self, driver: AccountId) -> Ride {
        db::create_ride(
            &mut self.ex().await,
            driver,
            Coordinates::new(42.69, 23.32).unwrap(),
            Coordinates::new(42.14, 24.74).unwrap(),
            None,
        )
        .await
        .unwrap()
    }

    /// Gets the stored ride identified by `id`, if any.
    pub(crate) async fn get_ride(&self, id: RideId) -> Option<Ride> {
        db::get_ride(&mut self.ex().await, id).await.ok()
    }

    /// Forces the status of the stored `ride` to `status`.
    pub(crate) async fn set_ride_status(&self, ride: &Ride, status: RideStatus) {
        let ride = ride.clone().with_status(status);
        db::update_ride(&mut self.ex().await, &ride).await.unwrap();
    }

    /// Gets the identifiers of the passengers of the ride `id`.
    pub(crate) async fn get_passengers(&self, id: RideId) -> Vec<AccountId> {
        db::get_payments_by_ride(&mut self.ex().await, id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| *p.owner())
            .collect()
    }

    /// Adds `passenger` to the ride `id`.
    pub(crate) async fn join_ride(&self, id: RideId, passenger: AccountId) {
        db::create_payment(&mut self.ex().await, id, passenger).await.unwrap();
    }

    /// Creates a one-time route between two places.
    pub(crate) async fn create_route(&self, from: &'static str, to: &'static str) -> Route {
        let details = RouteDetails::new(from, to, RouteType::OneTime, None).unwrap();
        db::create_route(&mut self.ex().await, details).await.unwrap()
    }

    /// Gets the stored route identified by `id`, if any.
    pub(crate) async fn get_route(&self, id: RouteId) -> Option<Route> {
        db::get_route(&mut self.ex().await, id).await.ok()
    }
}
