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

//! Database abstraction to manipulate login sessions.

use crate::model::{AccessToken, AccountId, Session};
#[cfg(feature = "postgres")]
use rideshare_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use rideshare_core::db::sqlite::{self, build_timestamp, unpack_timestamp};
use rideshare_core::db::{DbError, DbResult, Executor, expect_one_row};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Session {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let access_token: String = row.try_get("access_token").map_err(postgres::map_sqlx_error)?;
        let account_id: i64 = row.try_get("account_id").map_err(postgres::map_sqlx_error)?;
        let login_time: OffsetDateTime =
            row.try_get("login_time").map_err(postgres::map_sqlx_error)?;

        let access_token = AccessToken::new(access_token)?;

        Ok(Session::new(access_token, AccountId::from(account_id), login_time))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Session {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let access_token: String = row.try_get("access_token").map_err(sqlite::map_sqlx_error)?;
        let account_id: i64 = row.try_get("account_id").map_err(sqlite::map_sqlx_error)?;
        let login_time_secs: i64 =
            row.try_get("login_time_secs").map_err(sqlite::map_sqlx_error)?;
        let login_time_nsecs: i64 =
            row.try_get("login_time_nsecs").map_err(sqlite::map_sqlx_error)?;

        let access_token = AccessToken::new(access_token)?;
        let login_time = build_timestamp(login_time_secs, login_time_nsecs)?;

        Ok(Session::new(access_token, AccountId::from(account_id), login_time))
    }
}

/// Saves a new `session`.
pub(crate) async fn put_session(ex: &mut Executor, session: &Session) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO sessions (access_token, account_id, login_time) VALUES ($1, $2, $3)";
            let done = sqlx::query(query_str)
                .bind(session.access_token().as_str())
                .bind(session.account().as_i64())
                .bind(*session.login_time())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (login_time_secs, login_time_nsecs) = unpack_timestamp(*session.login_time())?;

            let query_str = "
                INSERT INTO sessions (access_token, account_id, login_time_secs, login_time_nsecs)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(session.access_token().as_str())
                .bind(session.account().as_i64())
                .bind(login_time_secs)
                .bind(login_time_nsecs)
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

/// Gets the active session identified by `access_token`.
///
/// Sessions that have been logged out are reported as `NotFound`.
pub(crate) async fn get_session(
    ex: &mut Executor,
    access_token: &AccessToken,
) -> DbResult<Session> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT * FROM sessions WHERE access_token = $1 AND logout_time IS NULL";
            let row = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Session::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                "SELECT * FROM sessions WHERE access_token = ? AND logout_time_secs IS NULL";
            let row = sqlx::query(query_str)
                .bind(access_token.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Session::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Marks the active session identified by `access_token` as logged out at `now`.
pub(crate) async fn delete_session(
    ex: &mut Executor,
    access_token: &AccessToken,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE sessions SET logout_time = $1
                WHERE access_token = $2 AND logout_time IS NULL";
            let done = sqlx::query(query_str)
                .bind(now)
                .bind(access_token.as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let (logout_time_secs, logout_time_nsecs) = unpack_timestamp(now)?;

            let query_str = "
                UPDATE sessions SET logout_time_secs = ?, logout_time_nsecs = ?
                WHERE access_token = ? AND logout_time_secs IS NULL";
            let done = sqlx::query(query_str)
                .bind(logout_time_secs)
                .bind(logout_time_nsecs)
                .bind(access_token.as_str())
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

/// Deletes all sessions of `account`, active or not.  Returns the number of deleted sessions.
pub(crate) async fn delete_sessions_by_account(
    ex: &mut Executor,
    account: AccountId,
) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM sessions WHERE account_id = $1")
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM sessions WHERE account_id = ?")
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
