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

//! Test utilities for the REST layer.

use crate::driver::testutils::{TEST_PASSWORD, TestContext as DriverTestContext};
use crate::model::{AccessToken, Principal, Role};
use crate::rest::app;
use axum::Router;
use rideshare_core::model::EmailAddress;
use std::ops::Deref;

/// State of a running test against the REST layer.
///
/// Dereferences into the business layer context so that tests can set up and inspect the
/// backing data directly.
pub(crate) struct TestContext {
    /// Backing state of the app.
    base: DriverTestContext,

    /// The app under test, with all routes nested under `/api`.
    app: Router,
}

impl TestContext {
    /// Initializes the app backed by an in-memory database.
    pub(crate) async fn setup() -> Self {
        let base = DriverTestContext::setup().await;
        let app = Router::new().nest("/api", app(base.driver()));
        Self { base, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates an account named `name` with the given `role` and logs it in.
    pub(crate) async fn login_as(
        &self,
        name: &'static str,
        role: Role,
    ) -> (Principal, AccessToken) {
        let principal = self.base.create_account(name, role).await;
        let email = EmailAddress::new(format!("{}@example.com", name)).unwrap();
        let session = self.base.driver().login(email, TEST_PASSWORD.into()).await.unwrap();
        (principal, session.take_access_token())
    }
}

impl Deref for TestContext {
    type Target = DriverTestContext;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}
