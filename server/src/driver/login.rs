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

//! Operations on login sessions.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use rideshare_core::db::DbError;
use rideshare_core::driver::{DriverError, DriverResult};
use rideshare_core::model::EmailAddress;

impl Driver {
    /// Marks the account identified by `email` as logged in after validating its `password`.
    /// Returns the new session, whose access token the client must present in later requests.
    pub(crate) async fn login(
        self,
        email: EmailAddress,
        password: Password,
    ) -> DriverResult<Session> {
        let bad_credentials = || DriverError::Unauthorized("Invalid email or password".to_owned());

        let mut tx = self.db.begin().await?;

        let account = match db::get_account_by_email(tx.ex(), &email).await {
            Ok(account) => account,
            Err(DbError::NotFound) => return Err(bad_credentials()),
            Err(e) => return Err(e.into()),
        };
        if !password.verify(account.password())? {
            return Err(bad_credentials());
        }

        let session = Session::new(AccessToken::generate(), *account.id(), self.clock.now_utc());
        db::put_session(tx.ex(), &session).await?;

        tx.commit().await?;
        log::info!("Account {} logged in", account.id());
        Ok(session)
    }

    /// Marks the session identified by `access_token` as logged out.
    pub(crate) async fn logout(self, access_token: AccessToken) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        match db::delete_session(tx.ex(), &access_token, self.clock.now_utc()).await {
            Ok(()) => (),
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Invalid access token".to_owned()));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        Ok(())
    }

    /// Resolves the `access_token` of an active session into the account that owns it.
    ///
    /// Sessions older than the configured maximum age are rejected.
    pub(crate) async fn authenticate(self, access_token: AccessToken) -> DriverResult<Principal> {
        let mut ex = self.db.ex().await?;

        let session = match db::get_session(&mut ex, &access_token).await {
            Ok(session) => session,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Invalid access token".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let age = self.clock.now_utc() - *session.login_time();
        if age > self.opts.session_max_age {
            return Err(DriverError::Unauthorized("Session has expired".to_owned()));
        }

        let account = match db::get_account(&mut ex, *session.account()).await {
            Ok(account) => account,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Account no longer exists".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(account.principal())
    }
}
