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

//! Business logic for the service.

use crate::model::{Password, PersonName, Role};
use rideshare_core::clocks::Clock;
use rideshare_core::db::Db;
use rideshare_core::env::get_optional_var;
use rideshare_core::model::EmailAddress;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

mod accounts;
mod login;
mod policy;
mod rides;
mod routes;
#[cfg(test)]
pub(crate) mod testutils;

/// Default maximum age of login sessions.
const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration options for the business logic.
#[derive(Clone, Debug)]
pub struct DriverOptions {
    /// Maximum age of a login session before it is considered expired.
    pub session_max_age: Duration,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self { session_max_age: DEFAULT_SESSION_MAX_AGE }
    }
}

impl DriverOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with
    /// `prefix`.
    ///
    /// All variables are optional and take default values when missing.
    pub fn from_env(prefix: &str) -> Result<DriverOptions, String> {
        Ok(DriverOptions {
            session_max_age: get_optional_var::<Duration>(prefix, "SESSION_MAX_AGE")?
                .unwrap_or(DEFAULT_SESSION_MAX_AGE),
        })
    }
}

/// Details of the administrator account to create at startup if it does not exist yet.
#[derive(Debug)]
pub struct AdminOptions {
    /// Email address of the administrator, which identifies the account.
    pub(crate) email: EmailAddress,

    /// Initial password of the administrator.
    pub(crate) password: Password,

    /// First name of the administrator.
    pub(crate) first_name: PersonName,

    /// Surname of the administrator.
    pub(crate) surname: PersonName,

    /// Role of the administrator account.
    pub(crate) role: Role,
}

impl AdminOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with
    /// `prefix`.
    ///
    /// All variables are optional and take default values when missing, which are only suitable
    /// for development deployments.
    pub fn from_env(prefix: &str) -> Result<AdminOptions, String> {
        /// Gets the optional variable `<prefix>_<suffix>`, falling back to `default`.
        fn get_or(prefix: &str, suffix: &str, default: &str) -> Result<String, String> {
            Ok(get_optional_var::<String>(prefix, suffix)?.unwrap_or_else(|| default.to_owned()))
        }

        /// Formats a validation error for the variable `<prefix>_<suffix>`.
        fn invalid(prefix: &str, suffix: &str, e: impl ToString) -> String {
            let e = e.to_string();
            format!("Invalid value in environment variable {}_{}: {}", prefix, suffix, e)
        }

        let email = EmailAddress::new(get_or(prefix, "EMAIL", "admin@localhost")?)
            .map_err(|e| invalid(prefix, "EMAIL", e))?;
        let password = Password::new(get_or(prefix, "PASSWORD", "admin")?)
            .map_err(|e| invalid(prefix, "PASSWORD", e))?;
        let first_name = PersonName::new(get_or(prefix, "FIRST_NAME", "admin")?)
            .map_err(|e| invalid(prefix, "FIRST_NAME", e))?;
        let surname = PersonName::new(get_or(prefix, "SURNAME", "admin")?)
            .map_err(|e| invalid(prefix, "SURNAME", e))?;
        let role = Role::from_str(&get_or(prefix, "ROLE", "ADMIN")?)
            .map_err(|e| invalid(prefix, "ROLE", e))?;

        Ok(AdminOptions { email, password, first_name, surname, role })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock used to timestamp sessions.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Configuration options.
    opts: DriverOptions,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        opts: DriverOptions,
    ) -> Self {
        Self { db, clock, opts }
    }
}
