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

//! Ride-sharing coordination service.
//!
//! Drivers publish rides between two points, passengers join and leave them, and accounts can
//! subscribe to named routes.  All operations are exposed via a REST API under `/api`.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use axum::Router;
use rideshare_core::clocks::SystemClock;
use rideshare_core::db::Db;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub mod db;
pub mod driver;
use driver::{AdminOptions, Driver, DriverOptions};
pub(crate) mod model;
mod rest;
use rest::app;

/// Starts serving the application on `bind_addr` backed by the `db`.
///
/// The administrator described by `admin_opts` is created before accepting any requests if it
/// does not exist yet.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db: Arc<dyn Db + Send + Sync>,
    driver_opts: DriverOptions,
    admin_opts: AdminOptions,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db, Arc::from(SystemClock::default()), driver_opts);
    driver.clone().bootstrap_admin(admin_opts).await?;

    let app = Router::new().nest("/api", app(driver));

    let bind_addr = bind_addr.into();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
