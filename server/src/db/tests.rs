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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::*;
use rideshare_core::clocks::testutils::utc_datetime;
use rideshare_core::db::{Db, DbError, Executor};
use rideshare_core::model::EmailAddress;

/// Syntactic sugar to create an account with default settings given only its local name.
async fn create_simple_account(ex: &mut Executor, name: &'static str) -> Account {
    create_account(
        ex,
        EmailAddress::new(format!("{}@example.com", name)).unwrap(),
        PersonName::from(name),
        PersonName::from("Surname"),
        HashedPassword::new("some-hash"),
        Role::User,
    )
    .await
    .unwrap()
}

/// Shorthand to build coordinates in tests.
fn coords(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap()
}

pub(crate) async fn test_accounts_ok<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account = create_account(
        tx.ex(),
        EmailAddress::from("ana@example.com"),
        PersonName::from("Ana"),
        PersonName::from("Petrova"),
        HashedPassword::new("the-hash"),
        Role::Moderator,
    )
    .await
    .unwrap();
    assert_eq!("ana@example.com", account.email().as_str());
    assert_eq!(Role::Moderator, *account.role());

    assert_eq!(account, get_account(tx.ex(), *account.id()).await.unwrap());
    assert_eq!(account, get_account_by_email(tx.ex(), account.email()).await.unwrap());

    let other = create_simple_account(tx.ex(), "other").await;
    assert_eq!(vec![account, other], get_accounts(tx.ex()).await.unwrap());
}

pub(crate) async fn test_accounts_abort_creation_and_not_found<D: Db>(db: D) {
    let id = {
        let mut tx = db.begin().await.unwrap();
        *create_simple_account(tx.ex(), "someone").await.id()
    };

    let mut tx = db.begin().await.unwrap();
    assert_eq!(DbError::NotFound, get_account(tx.ex(), id).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        get_account_by_email(tx.ex(), &EmailAddress::from("someone@example.com"))
            .await
            .unwrap_err()
    );
    assert!(get_accounts(tx.ex()).await.unwrap().is_empty());
}

pub(crate) async fn test_accounts_email_is_unique<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    create_simple_account(tx.ex(), "dup").await;
    let err = create_account(
        tx.ex(),
        EmailAddress::from("dup@example.com"),
        PersonName::from("Other"),
        PersonName::from("Person"),
        HashedPassword::new("hash"),
        Role::User,
    )
    .await
    .unwrap_err();
    assert_eq!(DbError::AlreadyExists, err);
}

pub(crate) async fn test_accounts_corrupted_email<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account = create_account(
        tx.ex(),
        EmailAddress::new_invalid("this_is_invalid"),
        PersonName::from("A"),
        PersonName::from("B"),
        HashedPassword::new("hash"),
        Role::User,
    )
    .await
    .unwrap();
    match get_account(tx.ex(), *account.id()).await.unwrap_err() {
        DbError::DataIntegrityError(msg) if msg.contains("valid address") => (),
        e => panic!("Unexpected error: {:?}", e),
    }
}

pub(crate) async fn test_accounts_update_and_delete<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account = create_simple_account(tx.ex(), "before").await;
    let account = account
        .with_details(AccountDetails {
            email: EmailAddress::from("after@example.com"),
            first_name: PersonName::from("After"),
            surname: PersonName::from("Update"),
            role: Some(Role::Admin),
        })
        .with_password(HashedPassword::new("new-hash"));
    update_account(tx.ex(), &account).await.unwrap();
    assert_eq!(account, get_account(tx.ex(), *account.id()).await.unwrap());

    delete_account(tx.ex(), *account.id()).await.unwrap();
    assert_eq!(DbError::NotFound, get_account(tx.ex(), *account.id()).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_account(tx.ex(), &account).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_account(tx.ex(), *account.id()).await.unwrap_err());
}

pub(crate) async fn test_rides_ok<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let driver = create_simple_account(tx.ex(), "driver").await;
    let ride = create_ride(tx.ex(), *driver.id(), coords(1.0, 2.0), coords(3.0, 4.0), None)
        .await
        .unwrap();
    assert_eq!(driver.id(), ride.driver());
    assert_eq!(RideStatus::Pending, *ride.status());
    assert_eq!(ride, get_ride(tx.ex(), *ride.id()).await.unwrap());

    let ride = ride.with_status(RideStatus::Started).with_details(RideDetails {
        driver: None,
        start: coords(-1.5, -2.5),
        end: coords(3.0, 4.0),
        route: None,
    });
    update_ride(tx.ex(), &ride).await.unwrap();
    assert_eq!(ride, get_ride(tx.ex(), *ride.id()).await.unwrap());

    delete_ride(tx.ex(), *ride.id()).await.unwrap();
    assert_eq!(DbError::NotFound, get_ride(tx.ex(), *ride.id()).await.unwrap_err());
    assert_eq!(DbError::NotFound, update_ride(tx.ex(), &ride).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_ride(tx.ex(), *ride.id()).await.unwrap_err());
}

pub(crate) async fn test_rides_unknown_references<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let err = create_ride(tx.ex(), AccountId::from(123), coords(1.0, 2.0), coords(3.0, 4.0), None)
        .await
        .unwrap_err();
    assert_eq!(DbError::NotFound, err);

    let driver = create_simple_account(tx.ex(), "driver").await;
    let err = create_ride(
        tx.ex(),
        *driver.id(),
        coords(1.0, 2.0),
        coords(3.0, 4.0),
        Some(RouteId::from(5)),
    )
    .await
    .unwrap_err();
    assert_eq!(DbError::NotFound, err);
}

pub(crate) async fn test_rides_queries<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let driver1 = create_simple_account(tx.ex(), "driver1").await;
    let driver2 = create_simple_account(tx.ex(), "driver2").await;

    let a = coords(42.69, 23.32);
    let b = coords(42.14, 24.74);
    let ride1 = create_ride(tx.ex(), *driver1.id(), a, b, None).await.unwrap();
    let ride2 = create_ride(tx.ex(), *driver2.id(), b, a, None).await.unwrap();
    let ride3 = create_ride(tx.ex(), *driver1.id(), a, b, None).await.unwrap();
    let ride4 = create_ride(tx.ex(), *driver2.id(), a, coords(0.0, 0.0), None).await.unwrap();

    assert_eq!(
        vec![ride1.clone(), ride2.clone(), ride3.clone(), ride4.clone()],
        get_rides(tx.ex()).await.unwrap()
    );
    assert_eq!(
        vec![ride1.clone(), ride3.clone()],
        get_rides_by_driver(tx.ex(), *driver1.id()).await.unwrap()
    );
    assert_eq!(vec![ride2.clone()], get_rides_by_destination(tx.ex(), b, a).await.unwrap());
    assert_eq!(vec![ride1, ride3], get_rides_by_destination(tx.ex(), a, b).await.unwrap());
    assert!(get_rides_by_destination(tx.ex(), b, b).await.unwrap().is_empty());
    assert!(get_rides_by_driver(tx.ex(), AccountId::from(999)).await.unwrap().is_empty());
}

pub(crate) async fn test_payments_ok<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let driver = create_simple_account(tx.ex(), "driver").await;
    let passenger1 = create_simple_account(tx.ex(), "passenger1").await;
    let passenger2 = create_simple_account(tx.ex(), "passenger2").await;
    let ride = create_ride(tx.ex(), *driver.id(), coords(1.0, 2.0), coords(3.0, 4.0), None)
        .await
        .unwrap();

    let payment1 = create_payment(tx.ex(), *ride.id(), *passenger1.id()).await.unwrap();
    assert!(!payment1.paid());
    let payment2 = create_payment(tx.ex(), *ride.id(), *passenger2.id()).await.unwrap();
    assert_eq!(
        vec![payment1.clone(), payment2.clone()],
        get_payments_by_ride(tx.ex(), *ride.id()).await.unwrap()
    );

    assert_eq!(
        DbError::AlreadyExists,
        create_payment(tx.ex(), *ride.id(), *passenger1.id()).await.unwrap_err()
    );

    delete_payment(tx.ex(), *ride.id(), *passenger1.id()).await.unwrap();
    assert_eq!(
        DbError::NotFound,
        delete_payment(tx.ex(), *ride.id(), *passenger1.id()).await.unwrap_err()
    );
    assert_eq!(vec![payment2], get_payments_by_ride(tx.ex(), *ride.id()).await.unwrap());
}

pub(crate) async fn test_payments_unknown_ride<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let passenger = create_simple_account(tx.ex(), "passenger").await;
    assert_eq!(
        DbError::NotFound,
        create_payment(tx.ex(), RideId::from(8), *passenger.id()).await.unwrap_err()
    );
    assert!(get_payments_by_ride(tx.ex(), RideId::from(8)).await.unwrap().is_empty());
}

pub(crate) async fn test_payments_bulk_deletions<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let driver = create_simple_account(tx.ex(), "driver").await;
    let passenger = create_simple_account(tx.ex(), "passenger").await;
    let ride1 = create_ride(tx.ex(), *driver.id(), coords(1.0, 2.0), coords(3.0, 4.0), None)
        .await
        .unwrap();
    let ride2 = create_ride(tx.ex(), *driver.id(), coords(5.0, 6.0), coords(7.0, 8.0), None)
        .await
        .unwrap();
    let ride3 = create_ride(tx.ex(), *passenger.id(), coords(5.0, 6.0), coords(7.0, 8.0), None)
        .await
        .unwrap();

    create_payment(tx.ex(), *ride1.id(), *passenger.id()).await.unwrap();
    create_payment(tx.ex(), *ride1.id(), *driver.id()).await.unwrap();
    create_payment(tx.ex(), *ride2.id(), *passenger.id()).await.unwrap();
    create_payment(tx.ex(), *ride3.id(), *driver.id()).await.unwrap();

    assert_eq!(2, delete_payments_by_ride(tx.ex(), *ride1.id()).await.unwrap());
    assert_eq!(1, delete_payments_by_owner(tx.ex(), *passenger.id()).await.unwrap());
    assert_eq!(0, delete_payments_by_owner(tx.ex(), *passenger.id()).await.unwrap());

    assert_eq!(2, delete_rides_by_driver(tx.ex(), *driver.id()).await.unwrap());
    assert_eq!(vec![ride3.clone()], get_rides(tx.ex()).await.unwrap());
    assert_eq!(1, get_payments_by_ride(tx.ex(), *ride3.id()).await.unwrap().len());
}

pub(crate) async fn test_routes_ok<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account1 = create_simple_account(tx.ex(), "account1").await;
    let account2 = create_simple_account(tx.ex(), "account2").await;

    let details =
        RouteDetails::new("Sofia", "Plovdiv", RouteType::Recurring, Some(TimeInterval::Daily))
            .unwrap();
    let route1 = create_route(tx.ex(), details).await.unwrap();
    assert!(route1.subscribers().is_empty());
    let details = RouteDetails::new("Varna", "Burgas", RouteType::OneTime, None).unwrap();
    let route2 = create_route(tx.ex(), details).await.unwrap();

    assert!(add_subscriber(tx.ex(), *route1.id(), *account2.id()).await.unwrap());
    assert!(add_subscriber(tx.ex(), *route1.id(), *account1.id()).await.unwrap());
    assert!(!add_subscriber(tx.ex(), *route1.id(), *account1.id()).await.unwrap());
    assert!(add_subscriber(tx.ex(), *route2.id(), *account2.id()).await.unwrap());

    let route1 = get_route(tx.ex(), *route1.id()).await.unwrap();
    assert_eq!(&vec![*account1.id(), *account2.id()], route1.subscribers());
    assert_eq!("Sofia", route1.starting_destination());
    assert_eq!(Some(TimeInterval::Daily), *route1.time_interval());

    let routes = get_routes(tx.ex()).await.unwrap();
    assert_eq!(2, routes.len());
    assert_eq!(route1, routes[0]);
    assert_eq!(&vec![*account2.id()], routes[1].subscribers());

    assert!(remove_subscriber(tx.ex(), *route1.id(), *account1.id()).await.unwrap());
    assert!(!remove_subscriber(tx.ex(), *route1.id(), *account1.id()).await.unwrap());
    assert_eq!(2, delete_subscriptions_by_account(tx.ex(), *account2.id()).await.unwrap());
    assert!(get_route(tx.ex(), *route1.id()).await.unwrap().subscribers().is_empty());
    assert!(get_route(tx.ex(), *route2.id()).await.unwrap().subscribers().is_empty());
}

pub(crate) async fn test_routes_unknown_references<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    assert_eq!(DbError::NotFound, get_route(tx.ex(), RouteId::from(1)).await.unwrap_err());
    assert_eq!(DbError::NotFound, delete_route(tx.ex(), RouteId::from(1)).await.unwrap_err());

    let account = create_simple_account(tx.ex(), "account").await;
    assert_eq!(
        DbError::NotFound,
        add_subscriber(tx.ex(), RouteId::from(1), *account.id()).await.unwrap_err()
    );
}

pub(crate) async fn test_routes_delete_with_references<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account = create_simple_account(tx.ex(), "account").await;
    let details = RouteDetails::new("A", "B", RouteType::OneTime, None).unwrap();
    let route = create_route(tx.ex(), details).await.unwrap();
    add_subscriber(tx.ex(), *route.id(), *account.id()).await.unwrap();
    let ride =
        create_ride(tx.ex(), *account.id(), coords(1.0, 1.0), coords(2.0, 2.0), Some(*route.id()))
            .await
            .unwrap();
    assert_eq!(Some(*route.id()), *ride.route());

    assert_eq!(1, clear_route_from_rides(tx.ex(), *route.id()).await.unwrap());
    assert_eq!(1, delete_subscriptions_by_route(tx.ex(), *route.id()).await.unwrap());
    delete_route(tx.ex(), *route.id()).await.unwrap();

    assert_eq!(None, *get_ride(tx.ex(), *ride.id()).await.unwrap().route());
    assert!(get_routes(tx.ex()).await.unwrap().is_empty());
}

pub(crate) async fn test_sessions_ok<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let account1 = create_simple_account(tx.ex(), "account1").await;
    let account2 = create_simple_account(tx.ex(), "account2").await;

    let session1 = Session::new(
        AccessToken::generate(),
        *account1.id(),
        utc_datetime(2023, 5, 17, 6, 29, 28),
    );
    put_session(tx.ex(), &session1).await.unwrap();
    let session2 = Session::new(
        AccessToken::generate(),
        *account2.id(),
        utc_datetime(2023, 5, 17, 6, 30, 12),
    );
    put_session(tx.ex(), &session2).await.unwrap();

    assert_eq!(session1, get_session(tx.ex(), session1.access_token()).await.unwrap());
    assert_eq!(session2, get_session(tx.ex(), session2.access_token()).await.unwrap());

    // Mark one of the sessions as logged out.
    delete_session(tx.ex(), session1.access_token(), utc_datetime(2023, 5, 17, 7, 0, 0))
        .await
        .unwrap();
    assert_eq!(
        DbError::NotFound,
        get_session(tx.ex(), session1.access_token()).await.unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        delete_session(tx.ex(), session1.access_token(), utc_datetime(2023, 5, 17, 7, 0, 0))
            .await
            .unwrap_err()
    );

    // Make sure the other session was unaffected.
    assert_eq!(session2, get_session(tx.ex(), session2.access_token()).await.unwrap());

    assert_eq!(1, delete_sessions_by_account(tx.ex(), *account1.id()).await.unwrap());
    assert_eq!(1, delete_sessions_by_account(tx.ex(), *account2.id()).await.unwrap());
    assert_eq!(
        DbError::NotFound,
        get_session(tx.ex(), session2.access_token()).await.unwrap_err()
    );
}

pub(crate) async fn test_sessions_unknown_account<D: Db>(db: D) {
    let mut tx = db.begin().await.unwrap();

    let login_time = utc_datetime(2023, 1, 1, 0, 0, 0);
    let session = Session::new(AccessToken::generate(), AccountId::from(5), login_time);
    assert_eq!(DbError::NotFound, put_session(tx.ex(), &session).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        get_session(tx.ex(), &AccessToken::generate()).await.unwrap_err()
    );
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        rideshare_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_accounts_ok,
            test_accounts_abort_creation_and_not_found,
            test_accounts_email_is_unique,
            test_accounts_corrupted_email,
            test_accounts_update_and_delete,
            test_rides_ok,
            test_rides_unknown_references,
            test_rides_queries,
            test_payments_ok,
            test_payments_unknown_ride,
            test_payments_bulk_deletions,
            test_routes_ok,
            test_routes_unknown_references,
            test_routes_delete_with_references,
            test_sessions_ok,
            test_sessions_unknown_account
        );
    }
];

mod sqlite {
    use crate::db::testutils::setup_sqlite;

    generate_db_tests!(setup_sqlite().await);
}

#[cfg(feature = "postgres")]
mod postgres {
    use crate::db::testutils::setup_postgres;

    generate_db_tests!(
        setup_postgres().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}
