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

//! Database abstraction for the rideshare service.
//!
//! Every entity has its own module with free functions that take an `Executor`.  Entities only
//! reference each other through foreign keys, so deleting an entity that is still referenced
//! fails and the driver is responsible for removing the references first.

#[cfg(feature = "postgres")]
use rideshare_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use rideshare_core::db::sqlite;
use rideshare_core::db::{DbResult, Executor};

mod accounts;
pub(crate) use accounts::*;
mod payments;
pub(crate) use payments::*;
mod rides;
pub(crate) use rides::*;
mod routes;
pub(crate) use routes::*;
mod sessions;
pub(crate) use sessions::*;
#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}
