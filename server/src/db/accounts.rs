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

//! Database abstraction to manipulate accounts.

use crate::model::{Account, AccountId, HashedPassword, PersonName, Role};
#[cfg(feature = "postgres")]
use rideshare_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use rideshare_core::db::sqlite;
use rideshare_core::db::{DbError, DbResult, Executor, expect_one_row};
use rideshare_core::model::EmailAddress;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use std::str::FromStr;

/// Builds an `Account` from the raw values of a row.
fn build_account(
    id: i64,
    email: String,
    first_name: String,
    surname: String,
    password: String,
    role: String,
) -> DbResult<Account> {
    Ok(Account::new(
        AccountId::from(id),
        EmailAddress::new(email)?,
        PersonName::new(first_name)?,
        PersonName::new(surname)?,
        HashedPassword::new(password),
        Role::from_str(&role)?,
    ))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Account {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let surname: String = row.try_get("surname").map_err(postgres::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(postgres::map_sqlx_error)?;
        let role: String = row.try_get("role").map_err(postgres::map_sqlx_error)?;
        build_account(id, email, first_name, surname, password, role)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Account {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let surname: String = row.try_get("surname").map_err(sqlite::map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(sqlite::map_sqlx_error)?;
        let role: String = row.try_get("role").map_err(sqlite::map_sqlx_error)?;
        build_account(id, email, first_name, surname, password, role)
    }
}

/// Creates a new account and returns it with its newly-assigned identifier.
///
/// Fails with `AlreadyExists` if the `email` is already taken by another account.
pub(crate) async fn create_account(
    ex: &mut Executor,
    email: EmailAddress,
    first_name: PersonName,
    surname: PersonName,
    password: HashedPassword,
    role: Role,
) -> DbResult<Account> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO accounts (email, first_name, surname, password, role)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(email.as_str())
                .bind(first_name.as_str())
                .bind(surname.as_str())
                .bind(password.as_str())
                .bind(role.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO accounts (email, first_name, surname, password, role)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(email.as_str())
                .bind(first_name.as_str())
                .bind(surname.as_str())
                .bind(password.as_str())
                .bind(role.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Account::new(AccountId::from(id), email, first_name, surname, password, role))
}

/// Gets the account identified by `id`.
pub(crate) async fn get_account(ex: &mut Executor, id: AccountId) -> DbResult<Account> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM accounts WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Account::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM accounts WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Account::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the account whose address is `email`.
pub(crate) async fn get_account_by_email(
    ex: &mut Executor,
    email: &EmailAddress,
) -> DbResult<Account> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM accounts WHERE email = $1";
            let row = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Account::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM accounts WHERE email = ?";
            let row = sqlx::query(query_str)
                .bind(email.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Account::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all accounts, sorted by identifier.
pub(crate) async fn get_accounts(ex: &mut Executor) -> DbResult<Vec<Account>> {
    let query_str = "SELECT * FROM accounts ORDER BY id";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Account::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Account::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Overwrites the stored properties of `account`, which must already exist.
pub(crate) async fn update_account(ex: &mut Executor, account: &Account) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE accounts
                SET email = $1, first_name = $2, surname = $3, password = $4, role = $5
                WHERE id = $6";
            let done = sqlx::query(query_str)
                .bind(account.email().as_str())
                .bind(account.first_name().as_str())
                .bind(account.surname().as_str())
                .bind(account.password().as_str())
                .bind(account.role().as_str())
                .bind(account.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE accounts
                SET email = ?, first_name = ?, surname = ?, password = ?, role = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(account.email().as_str())
                .bind(account.first_name().as_str())
                .bind(account.surname().as_str())
                .bind(account.password().as_str())
                .bind(account.role().as_str())
                .bind(account.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected)
}

/// Deletes the account identified by `id`.
///
/// The caller is responsible for deleting any entities that reference the account first.
pub(crate) async fn delete_account(ex: &mut Executor, id: AccountId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM accounts WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM accounts WHERE id = ?")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    expect_one_row(rows_affected)
}
