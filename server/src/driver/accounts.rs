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

//! Operations on accounts.

use crate::db;
use crate::driver::policy::check_account_access;
use crate::driver::{AdminOptions, Driver};
use crate::model::*;
use rideshare_core::db::DbError;
use rideshare_core::driver::{DriverError, DriverResult};
use rideshare_core::model::EmailAddress;

/// Converts a uniqueness violation on the email address of an account into a descriptive error.
fn map_email_conflict(email: &EmailAddress) -> impl FnOnce(DbError) -> DriverError + '_ {
    move |e| match e {
        DbError::AlreadyExists => {
            DriverError::AlreadyExists(format!("Email {} is already registered", email.as_str()))
        }
        e => e.into(),
    }
}

impl Driver {
    /// Gets all accounts visible to `whoami`.
    ///
    /// Only administrators can list accounts.  Anybody else gets an empty list, and the database
    /// is not even queried in that case.
    pub(crate) async fn get_accounts(self, whoami: Principal) -> DriverResult<Vec<Account>> {
        if !whoami.is_admin() {
            return Ok(vec![]);
        }
        let accounts = db::get_accounts(&mut self.db.ex().await?).await?;
        Ok(accounts)
    }

    /// Gets the account identified by `id`.
    pub(crate) async fn get_account(
        self,
        whoami: Principal,
        id: AccountId,
    ) -> DriverResult<Account> {
        check_account_access(&whoami, id)?;
        let account = db::get_account(&mut self.db.ex().await?, id).await?;
        Ok(account)
    }

    /// Gets the account whose address is `email`.
    ///
    /// Accounts that `whoami` is not allowed to see are reported as missing so that callers
    /// cannot probe for registered addresses.
    pub(crate) async fn get_account_by_email(
        self,
        whoami: Principal,
        email: EmailAddress,
    ) -> DriverResult<Account> {
        let not_found = || DriverError::NotFound(format!("Account {} not found", email.as_str()));

        let account = match db::get_account_by_email(&mut self.db.ex().await?, &email).await {
            Ok(account) => account,
            Err(DbError::NotFound) => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        if check_account_access(&whoami, *account.id()).is_err() {
            return Err(not_found());
        }
        Ok(account)
    }

    /// Registers a new account.
    ///
    /// `whoami` is the caller, if authenticated.  The requested role is only honored when the
    /// caller is an administrator; everybody else registers regular users.  If the client
    /// provided an `id`, it must not belong to an existing account.  The stored account always
    /// gets a newly-assigned identifier.
    pub(crate) async fn add_account(
        self,
        whoami: Option<Principal>,
        id: Option<AccountId>,
        details: AccountDetails,
        password: Password,
    ) -> DriverResult<Account> {
        let role = match (whoami, details.role) {
            (Some(whoami), Some(role)) if whoami.is_admin() => role,
            _ => Role::User,
        };
        let password = password.hash()?;

        let mut tx = self.db.begin().await?;

        if let Some(id) = id {
            match db::get_account(tx.ex(), id).await {
                Ok(_) => return Err(DriverError::AlreadyExists(format!("Account {} exists", id))),
                Err(DbError::NotFound) => (),
                Err(e) => return Err(e.into()),
            }
        }

        let email = details.email.clone();
        let account = db::create_account(
            tx.ex(),
            details.email,
            details.first_name,
            details.surname,
            password,
            role,
        )
        .await
        .map_err(map_email_conflict(&email))?;

        tx.commit().await?;
        log::info!("Registered account {} with role {}", account.id(), role.as_str());
        Ok(account)
    }

    /// Updates the account identified by `id` with new `details` and, optionally, a new
    /// `password`.
    ///
    /// `body_id` is the identifier the client included in the request, if any, and it must match
    /// `id`.  Role changes are silently ignored unless `whoami` is an administrator.
    pub(crate) async fn update_account(
        self,
        whoami: Principal,
        id: AccountId,
        body_id: Option<AccountId>,
        details: AccountDetails,
        password: Option<Password>,
    ) -> DriverResult<Account> {
        if let Some(body_id) = body_id {
            if body_id != id {
                return Err(DriverError::InvalidInput(format!(
                    "Account identifier {} in body does not match {} in path",
                    body_id, id
                )));
            }
        }
        check_account_access(&whoami, id)?;

        let details =
            if whoami.is_admin() { details } else { AccountDetails { role: None, ..details } };
        let password = password.map(Password::hash).transpose()?;

        let mut tx = self.db.begin().await?;

        let mut account = db::get_account(tx.ex(), id).await?.with_details(details);
        if let Some(password) = password {
            account = account.with_password(password);
        }
        db::update_account(tx.ex(), &account).await.map_err(map_email_conflict(account.email()))?;

        tx.commit().await?;
        Ok(account)
    }

    /// Deletes the account identified by `id` along with everything that belongs to it: its
    /// sessions, its payments, its route subscriptions and the rides it drives.
    pub(crate) async fn delete_account(self, whoami: Principal, id: AccountId) -> DriverResult<()> {
        check_account_access(&whoami, id)?;

        let mut tx = self.db.begin().await?;

        db::get_account(tx.ex(), id).await?;
        db::delete_sessions_by_account(tx.ex(), id).await?;
        let payments = db::delete_payments_by_owner(tx.ex(), id).await?;
        let subscriptions = db::delete_subscriptions_by_account(tx.ex(), id).await?;
        let rides = db::delete_rides_by_driver(tx.ex(), id).await?;
        db::delete_account(tx.ex(), id).await?;

        tx.commit().await?;
        log::info!(
            "Deleted account {} with {} payments, {} subscriptions and {} rides",
            id,
            payments,
            subscriptions,
            rides
        );
        Ok(())
    }

    /// Creates the administrator account described by `admin` if no account with its email
    /// address exists yet.  Returns true if the account was created.
    pub(crate) async fn bootstrap_admin(self, admin: AdminOptions) -> DriverResult<bool> {
        let mut tx = self.db.begin().await?;

        match db::get_account_by_email(tx.ex(), &admin.email).await {
            Ok(account) => {
                log::debug!("Administrator account {} already exists", account.email().as_str());
                return Ok(false);
            }
            Err(DbError::NotFound) => (),
            Err(e) => return Err(e.into()),
        }

        let account = db::create_account(
            tx.ex(),
            admin.email,
            admin.first_name,
            admin.surname,
            admin.password.hash()?,
            admin.role,
        )
        .await?;

        tx.commit().await?;
        log::info!("Created administrator account {}", account.email().as_str());
        Ok(true)
    }
}
