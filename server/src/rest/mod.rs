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

//! REST interface of the service.

use crate::driver::Driver;
use axum::Router;

mod account_by_email_get;
mod account_delete;
mod account_get;
mod account_put;
mod accounts_get;
mod accounts_post;
mod httputils;
mod login_post;
mod logout_post;
mod ride_delete;
mod ride_get;
mod ride_join_post;
mod ride_leave_put;
mod ride_passengers_get;
mod ride_put;
mod ride_start_put;
mod ride_stop_put;
mod rides_filter_get;
mod rides_get;
mod rides_post;
mod route_delete;
mod route_get;
mod route_subscribe_post;
mod route_unsubscribe_post;
mod routes_get;
mod routes_post;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.  All paths are relative to the API root.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/login", post(login_post::handler))
        .route("/logout", post(logout_post::handler))
        .route("/accounts", get(accounts_get::handler).post(accounts_post::handler))
        .route(
            "/accounts/:id",
            get(account_get::handler).put(account_put::handler).delete(account_delete::handler),
        )
        .route("/accounts/email/:email", get(account_by_email_get::handler))
        .route("/rides", get(rides_get::handler).post(rides_post::handler))
        .route("/rides/filter", get(rides_filter_get::handler))
        .route(
            "/rides/:id",
            get(ride_get::handler).put(ride_put::handler).delete(ride_delete::handler),
        )
        .route("/rides/:id/passengers", get(ride_passengers_get::handler))
        .route("/rides/startRide/:id", put(ride_start_put::handler))
        .route("/rides/stopRide/:id", put(ride_stop_put::handler))
        .route("/rides/joinRide/:id", post(ride_join_post::handler))
        .route("/rides/leaveRide/:id", put(ride_leave_put::handler))
        .route("/routes", get(routes_get::handler).post(routes_post::handler))
        .route("/routes/:id", get(route_get::handler).delete(route_delete::handler))
        .route("/routes/:id/subscribe", post(route_subscribe_post::handler))
        .route("/routes/:id/unsubscribe", post(route_unsubscribe_post::handler))
        .with_state(driver)
}
