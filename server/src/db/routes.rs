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

//! Database abstraction to manipulate routes and their subscriptions.

use crate::model::{AccountId, Route, RouteDetails, RouteId, RouteType, TimeInterval};
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
use std::collections::HashMap;
use std::str::FromStr;

/// Contents of a row in the `routes` table, which lacks the subscribers of the route.
struct RouteRow {
    /// Identifier of the route.
    id: RouteId,

    /// Stored properties of the route.
    details: RouteDetails,
}

/// Builds a `RouteRow` from the raw values of a row.
fn build_route_row(
    id: i64,
    starting_destination: String,
    final_destination: String,
    route_type: String,
    time_interval: Option<String>,
) -> DbResult<RouteRow> {
    let time_interval = match time_interval {
        Some(interval) => Some(TimeInterval::from_str(&interval)?),
        None => None,
    };
    let details = RouteDetails::new(
        starting_destination,
        final_destination,
        RouteType::from_str(&route_type)?,
        time_interval,
    )?;
    Ok(RouteRow { id: RouteId::from(id), details })
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for RouteRow {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let starting_destination: String =
            row.try_get("starting_destination").map_err(postgres::map_sqlx_error)?;
        let final_destination: String =
            row.try_get("final_destination").map_err(postgres::map_sqlx_error)?;
        let route_type: String = row.try_get("route_type").map_err(postgres::map_sqlx_error)?;
        let time_interval: Option<String> =
            row.try_get("time_interval").map_err(postgres::map_sqlx_error)?;
        build_route_row(id, starting_destination, final_destination, route_type, time_interval)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for RouteRow {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let starting_destination: String =
            row.try_get("starting_destination").map_err(sqlite::map_sqlx_error)?;
        let final_destination: String =
            row.try_get("final_destination").map_err(sqlite::map_sqlx_error)?;
        let route_type: String = row.try_get("route_type").map_err(sqlite::map_sqlx_error)?;
        let time_interval: Option<String> =
            row.try_get("time_interval").map_err(sqlite::map_sqlx_error)?;
        build_route_row(id, starting_destination, final_destination, route_type, time_interval)
    }
}

/// Creates a new route without subscribers and returns it with its newly-assigned identifier.
pub(crate) async fn create_route(ex: &mut Executor, details: RouteDetails) -> DbResult<Route> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO routes
                    (starting_destination, final_destination, route_type, time_interval)
                VALUES ($1, $2, $3, $4)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(details.starting_destination().as_str())
                .bind(details.final_destination().as_str())
                .bind(details.route_type().as_str())
                .bind(details.time_interval().map(|i| i.as_str()))
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO routes
                    (starting_destination, final_destination, route_type, time_interval)
                VALUES (?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(details.starting_destination().as_str())
                .bind(details.final_destination().as_str())
                .bind(details.route_type().as_str())
                .bind(details.time_interval().map(|i| i.as_str()))
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            expect_one_row(done.rows_affected())?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(details.into_route(RouteId::from(id)))
}

/// Gets the identifiers of the accounts subscribed to `route`.
async fn get_subscribers(ex: &mut Executor, route: RouteId) -> DbResult<Vec<AccountId>> {
    let ids: Vec<i64> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT account_id FROM route_subscriptions WHERE route_id = $1";
            let rows = sqlx::query(query_str)
                .bind(route.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get::<i64, _>("account_id").map_err(postgres::map_sqlx_error))
                .collect::<DbResult<_>>()?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT account_id FROM route_subscriptions WHERE route_id = ?";
            let rows = sqlx::query(query_str)
                .bind(route.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get::<i64, _>("account_id").map_err(sqlite::map_sqlx_error))
                .collect::<DbResult<_>>()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(ids.into_iter().map(AccountId::from).collect())
}

/// Gets the route identified by `id` along with its subscribers.
pub(crate) async fn get_route(ex: &mut Executor, id: RouteId) -> DbResult<Route> {
    let route_row = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let row = sqlx::query("SELECT * FROM routes WHERE id = $1")
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            RouteRow::try_from(row)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let row = sqlx::query("SELECT * FROM routes WHERE id = ?")
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            RouteRow::try_from(row)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let subscribers = get_subscribers(ex, id).await?;
    Ok(Route::new(route_row.id, route_row.details, subscribers))
}

/// Gets all routes along with their subscribers, sorted by identifier.
pub(crate) async fn get_routes(ex: &mut Executor) -> DbResult<Vec<Route>> {
    let routes_query = "SELECT * FROM routes ORDER BY id";
    let subscriptions_query = "SELECT route_id, account_id FROM route_subscriptions";

    let (route_rows, subscriptions): (Vec<RouteRow>, Vec<(i64, i64)>) = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(routes_query)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let route_rows = rows.into_iter().map(RouteRow::try_from).collect::<DbResult<_>>()?;

            let rows = sqlx::query(subscriptions_query)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let subscriptions = rows
                .iter()
                .map(|row| -> Result<(i64, i64), sqlx::Error> {
                    let route_id: i64 = row.try_get("route_id")?;
                    let account_id: i64 = row.try_get("account_id")?;
                    Ok((route_id, account_id))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(postgres::map_sqlx_error)?;

            (route_rows, subscriptions)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(routes_query)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let route_rows = rows.into_iter().map(RouteRow::try_from).collect::<DbResult<_>>()?;

            let rows = sqlx::query(subscriptions_query)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let subscriptions = rows
                .iter()
                .map(|row| -> Result<(i64, i64), sqlx::Error> {
                    let route_id: i64 = row.try_get("route_id")?;
                    let account_id: i64 = row.try_get("account_id")?;
                    Ok((route_id, account_id))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(sqlite::map_sqlx_error)?;

            (route_rows, subscriptions)
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    let mut subscribers: HashMap<i64, Vec<AccountId>> = HashMap::default();
    for (route_id, account_id) in subscriptions {
        subscribers.entry(route_id).or_default().push(AccountId::from(account_id));
    }

    Ok(route_rows
        .into_iter()
        .map(|row| {
            let subscribers = subscribers.remove(&row.id.as_i64()).unwrap_or_default();
            Route::new(row.id, row.details, subscribers)
        })
        .collect())
}

/// Deletes the route identified by `id`.
///
/// The caller is responsible for removing any references to the route first.
pub(crate) async fn delete_route(ex: &mut Executor, id: RouteId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM routes WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM routes WHERE id = ?")
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

/// Subscribes `account` to `route`.  Returns false if the subscription already existed.
pub(crate) async fn add_subscriber(
    ex: &mut Executor,
    route: RouteId,
    account: AccountId,
) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO route_subscriptions (route_id, account_id) VALUES ($1, $2)
                ON CONFLICT DO NOTHING";
            let done = sqlx::query(query_str)
                .bind(route.as_i64())
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO route_subscriptions (route_id, account_id) VALUES (?, ?)
                ON CONFLICT DO NOTHING";
            let done = sqlx::query(query_str)
                .bind(route.as_i64())
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(rows_affected > 0)
}

/// Unsubscribes `account` from `route`.  Returns false if there was no such subscription.
pub(crate) async fn remove_subscriber(
    ex: &mut Executor,
    route: RouteId,
    account: AccountId,
) -> DbResult<bool> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "DELETE FROM route_subscriptions WHERE route_id = $1 AND account_id = $2";
            let done = sqlx::query(query_str)
                .bind(route.as_i64())
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM route_subscriptions WHERE route_id = ? AND account_id = ?";
            let done = sqlx::query(query_str)
                .bind(route.as_i64())
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(rows_affected > 0)
}

/// Deletes all subscriptions of `account`.  Returns the number of deleted subscriptions.
pub(crate) async fn delete_subscriptions_by_account(
    ex: &mut Executor,
    account: AccountId,
) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM route_subscriptions WHERE account_id = $1")
                .bind(account.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM route_subscriptions WHERE account_id = ?")
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

/// Deletes all subscriptions to `route`.  Returns the number of deleted subscriptions.
pub(crate) async fn delete_subscriptions_by_route(
    ex: &mut Executor,
    route: RouteId,
) -> DbResult<u64> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM route_subscriptions WHERE route_id = $1")
                .bind(route.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(done.rows_affected())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM route_subscriptions WHERE route_id = ?")
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
