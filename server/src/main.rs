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

//! Entry point to the ride-sharing service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use rideshare_core::db::Db;
use rideshare_server::db::init_schema;
use rideshare_server::driver::{AdminOptions, DriverOptions};
use rideshare_server::serve;
use std::env;
use std::error::Error;
use std::net::Ipv4Addr;
use std::process;
use std::sync::Arc;

/// Port to listen on when `PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Opens the production database as configured in the environment.
#[cfg(feature = "postgres")]
fn open_db() -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
    use rideshare_core::db::postgres::{PostgresDb, PostgresOptions};

    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    Ok(Arc::new(PostgresDb::connect(db_opts)?))
}

/// Opens the production database as configured in the environment.
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
async fn open_db() -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
    use rideshare_core::env::get_required_var;

    let path = get_required_var::<String>("SQLITE", "PATH")?;
    Ok(Arc::new(rideshare_core::db::sqlite::connect(&path).await?))
}

/// Gathers the configuration from the environment and runs the service until it fails.
async fn run() -> Result<(), Box<dyn Error>> {
    let port = match env::var("PORT") {
        Ok(val) => val.parse::<u16>().map_err(|e| format!("Invalid PORT '{}': {}", val, e))?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    #[cfg(feature = "postgres")]
    let db = open_db()?;
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    let db = open_db().await?;
    init_schema(&mut db.ex().await?).await?;

    let driver_opts = DriverOptions::from_env("RIDES")?;
    let admin_opts = AdminOptions::from_env("ADMIN")?;

    serve(addr, db, driver_opts, admin_opts).await
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("rideshare: {}", e);
        process::exit(1);
    }
}
