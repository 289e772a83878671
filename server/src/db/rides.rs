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

//! Database abstraction to manipulate rides.

use crate::model::{AccountId, Coordinates, Ride, RideId, RideStatus, RouteId};
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
use std::str::FromStr;

/// Extracts a `Ride` from a row of any database type.
macro_rules! ride_from_row [
    ( $row:expr, $map_err:path ) => {{
        let row = $row;
        let id: i64 = row.try_get("id").map_err($map_err)?;
        let driver_id: i64 = row.try_get("driver_id").map_err($map_err)?;
        let start_latitude: f64 = row.try_get("start_latitude").map_err($map_err)?;
        let start_longitude: f64 = row.try_get("start_longitude").map_err($map_err)?;
        let end_latitude: f64 = row.try_get("end_latitude").map_err($map_err)?;
        let end_longitude: f64 = row.try_get("end_longitude").map_err($map_err)?;
        let status: String = row.try_get("status").map_err($map_err)?;
        let route_id: Option<i64> = row.try_get("route_id").map_err($map_err)?;

        Ok(Ride::new(
            RideId::from(id),
            AccountId::from(driver_id),
            Coordinates::new(start_latitude, start_longitude)?,
            Coordinates::new(end_latitude, end_longitude)?,
            RideStatus::from_str(&status)?,
            route_id.map(RouteId::from),
        ))
    }}
];

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Ride {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        ride_from_row!(row, postgres::map_sqlx_error)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Ride {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        ride_from_row!(row, sqlite::map_sqlx_error)
    }
}

/// Creates a new ride in the `PENDING` status and returns it with its newly-assigned identifier.
///
/// Fails with `NotFound` if the `driver` or the `route` do not exist.
pub(crate) async fn create_ride(
    ex: &mut Executor,
    driver: AccountId,
    start: Coordinates,
    end: Coordinates,
    route: Option<RouteId>,
) -> DbResult<Ride> {
    let status = RideStatus::Pending;
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO rides
                    (driver_id, start_latitude, start_longitude, end_latitude, end_longitude,
                    status, route_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(driver.as_i64())
                .bind(start.latitude())
                .bind(start.longitude())
                .bind(end.latitude())
                .bind(end.longitude())
                .bind(status.as_str())
                .bind(route.map(|r| r.as_i64()))
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO rides
                    (driver_id, start_latitude, start_longitude, end_latitude, end_longitude,
                    status, route_id)
                VALUES (?, ?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(driver.as_i64())
                .bind(start.latitude())
                .bind(start.longitude())
                .bind(end.latitude())
                .bind(end.longitude())
                .bind(status.as_str())
                .bind(route.map(|r| r.as_i64()))
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Ride::new(RideId::from(id), driver, start, end, status, route))
}

/// Gets the ride identified by `id`.
pub(crate) async fn get_ride(ex: &mut Executor, id: RideId) -> DbResult<Ride> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query("SELECT * FROM rides WHERE id = $1")
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ride::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row = sqlx::query("SELECT * FROM rides WHERE id = ?")
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ride::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all rides, sorted by identifier.
pub(crate) async fn get_rides(ex: &mut Executor) -> DbResult<Vec<Ride>> {
    let query_str = "SELECT * FROM rides ORDER BY id";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all rides driven by `driver`, sorted by identifier.
pub(crate) async fn get_rides_by_driver(
    ex: &mut Executor,
    driver: AccountId,
) -> DbResult<Vec<Ride>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query("SELECT * FROM rides WHERE driver_id = $1 ORDER BY id")
                .bind(driver.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query("SELECT * FROM rides WHERE driver_id = ? ORDER BY id")
                .bind(driver.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all rides that go exactly from `start` to `end`, sorted by identifier.
pub(crate) async fn get_rides_by_destination(
    ex: &mut Executor,
    start: Coordinates,
    end: Coordinates,
) -> DbResult<Vec<Ride>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM rides
                WHERE start_latitude = $1 AND start_longitude = $2
                    AND end_latitude = $3 AND end_longitude = $4
                ORDER BY id";
            let rows = sqlx::query(query_str)
                .bind(start.latitude())
                .bind(start.longitude())
                .bind(end.latitude())
                .bind(end.longitude())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM rides
                WHERE start_latitude = ? AND start_longitude = ?
                    AND end_latitude = ? AND end_longitude = ?
                ORDER BY id";
            let rows = sqlx::query(query_str)
                .bind(start.latitude())
                .bind(start.longitude())
                .bind(end.latitude())
                .bind(end.longitude())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Ride::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Overwrites the stored properties of `ride`, which must already exist.
pub(crate) async fn update_ride(ex: &mut Executor, ride: &Ride) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE rides
                SET driver_id = $1, start_latitude = $2, start_longitude = $3, end_latitude = $4,
                    end_longitude = $5, status = $6, route_id = $7
                WHERE id = $8";
            let done = sqlx::query(query_str)
                .bind(ride.driver().as_i64())
                .bind(ride.start().latitude())
                .bind(ride.start().longitude())
                .bind(ride.end().latitude())
                .bind(ride.end().longitude())
                .bind(ride.status().as_str())
                .bind(ride.route().map(|r| r.as_i64()))
                .bind(ride.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE rides
                SET driver_id = ?, start_latitude = ?, start_longitude = ?, end_latitude = ?,
                    end_longitude = ?, status = ?, route_id = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(ride.driver().as_i64())
                .bind(ride.start().latitude())
                .bind(ride.start().longitude())
                .bind(ride.end().latitude())
                .bind(ride.end().longitude())
                .bind(ride.status().as_str())
                .bind(ride.route().map(|r| r.as_i64()))
                .bind(ride.id().as_i64())
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

/// Deletes the ride identified by `id`.
///
/// The caller is responsible for deleting the payments of the ride first.
pub(crate) async fn delete_ride(ex: &mut Executor, id: RideId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM rides WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM rides WHERE id = ?")
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

/// Deletes all rides driven by `driver` along with their payments.  Returns the number of
/// deleted rides.
pub(crate) async fn delete_rides_by_driver(ex: &mut Executor, driver: AccountId) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            sqlx::query(
                "DELETE FROM payments WHERE ride_id IN (SELECT id FROM rides WHERE driver_id = $1)",
            )
            .bind(driver.as_i64())
            .execute(ex.conn())
            .await
            .map_err(postgres::map_sqlx_error)?;

            let done = sqlx::query("DELETE FROM rides WHERE driver_id = $1")
                .bind(driver.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            sqlx::query(
                "DELETE FROM payments WHERE ride_id IN (SELECT id FROM rides WHERE driver_id = ?)",
            )
            .bind(driver.as_i64())
            .execute(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;

            let done = sqlx::query("DELETE FROM rides WHERE driver_id = ?")
                .bind(driver.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Detaches all rides from `route`.  Returns the number of modified rides.
pub(crate) async fn clear_route_from_rides(ex: &mut Executor, route: RouteId) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("UPDATE rides SET route_id = NULL WHERE route_id = $1")
                .bind(route.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("UPDATE rides SET route_id = NULL WHERE route_id = ?")
                .bind(route.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
