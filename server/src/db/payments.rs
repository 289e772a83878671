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

//! Database abstraction to manipulate payments, which represent the passengers of rides.

use crate::model::{AccountId, Payment, PaymentId, RideId};
#[cfg(feature = "postgres")]
use rideshare_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use rideshare_core::db::sqlite;
use rideshare_core::db::{DbError, DbResult, Executor, expect_one_row};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Payment {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let ride_id: i64 = row.try_get("ride_id").map_err(postgres::map_sqlx_error)?;
        let owner_id: i64 = row.try_get("owner_id").map_err(postgres::map_sqlx_error)?;
        let paid: bool = row.try_get("paid").map_err(postgres::map_sqlx_error)?;
        Ok(Payment::new(
            PaymentId::from(id),
            RideId::from(ride_id),
            AccountId::from(owner_id),
            paid,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Payment {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let ride_id: i64 = row.try_get("ride_id").map_err(sqlite::map_sqlx_error)?;
        let owner_id: i64 = row.try_get("owner_id").map_err(sqlite::map_sqlx_error)?;
        let paid: bool = row.try_get("paid").map_err(sqlite::map_sqlx_error)?;
        Ok(Payment::new(
            PaymentId::from(id),
            RideId::from(ride_id),
            AccountId::from(owner_id),
            paid,
        ))
    }
}

/// Creates an unpaid payment of `owner` for `ride`.
///
/// Fails with `AlreadyExists` if the owner already has a payment for the ride, and with
/// `NotFound` if either of them does not exist.
pub(crate) async fn create_payment(
    ex: &mut Executor,
    ride: RideId,
    owner: AccountId,
) -> DbResult<Payment> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO payments (ride_id, owner_id, paid) VALUES ($1, $2, FALSE)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(ride.as_i64())
                .bind(owner.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO payments (ride_id, owner_id, paid) VALUES (?, ?, FALSE)";
            let done = sqlx::query(query_str)
                .bind(ride.as_i64())
                .bind(owner.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Payment::new(PaymentId::from(id), ride, owner, false))
}

/// Gets all payments for `ride`, sorted by identifier.
pub(crate) async fn get_payments_by_ride(
    ex: &mut Executor,
    ride: RideId,
) -> DbResult<Vec<Payment>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query("SELECT * FROM payments WHERE ride_id = $1 ORDER BY id")
                .bind(ride.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Payment::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query("SELECT * FROM payments WHERE ride_id = ? ORDER BY id")
                .bind(ride.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Payment::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes the payment of `owner` for `ride`.  Fails with `NotFound` if there is none.
pub(crate) async fn delete_payment(
    ex: &mut Executor,
    ride: RideId,
    owner: AccountId,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE ride_id = $1 AND owner_id = $2")
                .bind(ride.as_i64())
                .bind(owner.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE ride_id = ? AND owner_id = ?")
                .bind(ride.as_i64())
                .bind(owner.as_i64())
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

/// Deletes all payments for `ride`.  Returns the number of deleted payments.
pub(crate) async fn delete_payments_by_ride(ex: &mut Executor, ride: RideId) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE ride_id = $1")
                .bind(ride.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE ride_id = ?")
                .bind(ride.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Deletes all payments owed by `owner`.  Returns the number of deleted payments.
pub(crate) async fn delete_payments_by_owner(ex: &mut Executor, owner: AccountId) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE owner_id = $1")
                .bind(owner.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM payments WHERE owner_id = ?")
                .bind(owner.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
