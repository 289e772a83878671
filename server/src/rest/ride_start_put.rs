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

//! API to start a pending ride.

use crate::driver::Driver;
use crate::model::RideId;
use crate::rest::httputils::require_whoami;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{self, HeaderMap};
use axum::response::IntoResponse;
use rideshare_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<RideId>,
    headers: HeaderMap,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let whoami = require_whoami(&driver, &headers).await?;
    let ride = driver.start_ride(whoami, id).await?;
    Ok((http::StatusCode::ACCEPTED, Json(ride)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Ride, RideStatus, Role};
    use crate::rest::testutils::*;
    use rideshare_core::rest::testutils::*;

    fn route(id: RideId) -> (http::Method, String) {
        (http::Method::PUT, format!("/api/rides/startRide/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let (driver, token) = context.login_as("driver", Role::User).await;
        let ride = context.create_ride(driver.id).await;

        let response = OneShotBuilder::new(context.app(), route(*ride.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::ACCEPTED)
            .expect_json::<Ride>()
            .await;
        assert_eq!(RideStatus::Started, *response.status());
        assert_eq!(RideStatus::Started, *context.get_ride(*ride.id()).await.unwrap().status());
    }

    #[tokio::test]
    async fn test_already_started() {
        let context = TestContext::setup().await;
        let (driver, token) = context.login_as("driver", Role::User).await;
        let ride = context.create_ride(driver.id).await;
        context.set_ride_status(&ride, RideStatus::Stopped).await;

        OneShotBuilder::new(context.app(), route(*ride.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::CONFLICT)
            .expect_error("Cannot start ride .* because it is STOPPED")
            .await;
    }

    #[tokio::test]
    async fn test_forbidden() {
        let context = TestContext::setup().await;
        let (_, token) = context.login_as("user", Role::User).await;
        let driver = context.create_account("driver", Role::User).await;
        let ride = context.create_ride(driver.id).await;

        OneShotBuilder::new(context.app(), route(*ride.id()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("Cannot modify ride")
            .await;

        assert_eq!(RideStatus::Pending, *context.get_ride(*ride.id()).await.unwrap().status());
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route(RideId::from(1)));
}
