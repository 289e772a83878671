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

//! Operations on routes and their subscribers.

use crate::db;
use crate::driver::Driver;
use crate::driver::policy::check_elevated;
use crate::model::*;
use rideshare_core::driver::DriverResult;

impl Driver {
    /// Gets all routes.
    pub(crate) async fn get_routes(self) -> DriverResult<Vec<Route>> {
        let routes = db::get_routes(&mut self.db.ex().await?).await?;
        Ok(routes)
    }

    /// Gets the route identified by `id`.
    pub(crate) async fn get_route(self, id: RouteId) -> DriverResult<Route> {
        let route = db::get_route(&mut self.db.ex().await?, id).await?;
        Ok(route)
    }

    /// Creates a new route described by `details`.
    pub(crate) async fn add_route(self, details: RouteDetails) -> DriverResult<Route> {
        let mut tx = self.db.begin().await?;
        let route = db::create_route(tx.ex(), details).await?;
        tx.commit().await?;
        log::info!("Created route {}", route.id());
        Ok(route)
    }

    /// Deletes the route identified by `id`.  Rides that follow the route are kept but detached
    /// from it.
    pub(crate) async fn delete_route(self, whoami: Principal, id: RouteId) -> DriverResult<()> {
        check_elevated(&whoami, "delete routes")?;

        let mut tx = self.db.begin().await?;

        db::get_route(tx.ex(), id).await?;
        let rides = db::clear_route_from_rides(tx.ex(), id).await?;
        db::delete_subscriptions_by_route(tx.ex(), id).await?;
        db::delete_route(tx.ex(), id).await?;

        tx.commit().await?;
        log::info!("Deleted route {} and detached {} rides from it", id, rides);
        Ok(())
    }

    /// Subscribes the caller to the route identified by `id`.  Subscribing twice is a no-op.
    pub(crate) async fn subscribe_route(
        self,
        whoami: Principal,
        id: RouteId,
    ) -> DriverResult<Route> {
        let mut tx = self.db.begin().await?;

        db::get_route(tx.ex(), id).await?;
        if !db::add_subscriber(tx.ex(), id, whoami.id).await? {
            log::debug!("Account {} was already subscribed to route {}", whoami.id, id);
        }
        let route = db::get_route(tx.ex(), id).await?;

        tx.commit().await?;
        Ok(route)
    }

    /// Unsubscribes the caller from the route identified by `id`.
    ///
    /// Unsubscribing from a route that the caller is not subscribed to is not an error.
    pub(crate) async fn unsubscribe_route(
        self,
        whoami: Principal,
        id: RouteId,
    ) -> DriverResult<Route> {
        let mut tx = self.db.begin().await?;

        db::get_route(tx.ex(), id).await?;
        if !db::remove_subscriber(tx.ex(), id, whoami.id).await? {
            log::warn!("Account {} is not subscribed to route {}", whoami.id, id);
        }
        let route = db::get_route(tx.ex(), id).await?;

        tx.commit().await?;
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use rideshare_core::driver::DriverError;

    #[tokio::test]
    async fn test_add_and_get_routes() {
        let context = TestContext::setup().await;

        let details =
            RouteDetails::new("Sofia", "Plovdiv", RouteType::Recurring, Some(TimeInterval::Monthly))
                .unwrap();
        let route1 = context.driver().add_route(details).await.unwrap();
        assert_eq!("Sofia", route1.starting_destination());
        assert_eq!(Some(TimeInterval::Monthly), *route1.time_interval());
        assert!(route1.subscribers().is_empty());

        let route2 = context.create_route("Varna", "Burgas").await;

        assert_eq!(route1, context.driver().get_route(*route1.id()).await.unwrap());
        assert_eq!(vec![route1, route2], context.driver().get_routes().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_route_not_found() {
        let context = TestContext::setup().await;

        match context.driver().get_route(RouteId::from(1)).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_subscribe_is_idempotent() {
        let context = TestContext::setup().await;
        let user1 = context.create_account("user1", Role::User).await;
        let user2 = context.create_account("user2", Role::User).await;
        let route = context.create_route("A", "B").await;

        let updated = context.driver().subscribe_route(user2, *route.id()).await.unwrap();
        assert_eq!(&vec![user2.id], updated.subscribers());
        context.driver().subscribe_route(user1, *route.id()).await.unwrap();
        let updated = context.driver().subscribe_route(user1, *route.id()).await.unwrap();
        assert_eq!(&vec![user1.id, user2.id], updated.subscribers());
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let context = TestContext::setup().await;
        let user1 = context.create_account("user1", Role::User).await;
        let user2 = context.create_account("user2", Role::User).await;
        let route = context.create_route("A", "B").await;
        context.driver().subscribe_route(user1, *route.id()).await.unwrap();
        context.driver().subscribe_route(user2, *route.id()).await.unwrap();

        let updated = context.driver().unsubscribe_route(user1, *route.id()).await.unwrap();
        assert_eq!(&vec![user2.id], updated.subscribers());
        let updated = context.driver().unsubscribe_route(user1, *route.id()).await.unwrap();
        assert_eq!(&vec![user2.id], updated.subscribers());
    }

    #[tokio::test]
    async fn test_subscriptions_route_not_found() {
        let context = TestContext::setup().await;
        let user = context.create_account("user", Role::User).await;

        match context.driver().subscribe_route(user, RouteId::from(4)).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("{:?}", e),
        }
        match context.driver().unsubscribe_route(user, RouteId::from(4)).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete_route_detaches_rides() {
        let context = TestContext::setup().await;
        let moderator = context.create_account("moderator", Role::Moderator).await;
        let user = context.create_account("user", Role::User).await;
        let route = context.create_route("A", "B").await;
        context.driver().subscribe_route(user, *route.id()).await.unwrap();

        let details = RideDetails {
            driver: None,
            start: Coordinates::new(1.0, 1.0).unwrap(),
            end: Coordinates::new(2.0, 2.0).unwrap(),
            route: Some(*route.id()),
        };
        let ride = context.driver().add_ride(user, details).await.unwrap();

        context.driver().delete_route(moderator, *route.id()).await.unwrap();

        assert!(context.get_route(*route.id()).await.is_none());
        let ride = context.get_ride(*ride.id()).await.unwrap();
        assert_eq!(None, *ride.route());
    }

    #[tokio::test]
    async fn test_delete_route_denied_and_not_found() {
        let context = TestContext::setup().await;
        let admin = context.create_account("admin", Role::Admin).await;
        let user = context.create_account("user", Role::User).await;
        let route = context.create_route("A", "B").await;

        match context.driver().delete_route(user, *route.id()).await {
            Err(DriverError::Unauthorized(_)) => (),
            e => panic!("{:?}", e),
        }
        assert!(context.get_route(*route.id()).await.is_some());

        match context.driver().delete_route(admin, RouteId::from(100)).await {
            Err(DriverError::NotFound(_)) => (),
            e => panic!("{:?}", e),
        }
    }
}
