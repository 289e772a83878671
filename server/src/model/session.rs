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

//! The `Session` data type.

use crate::model::{AccessToken, AccountId};
use derive_getters::Getters;
use time::OffsetDateTime;

/// A login session for an account, identified by its access token.
#[derive(Clone, Debug, Getters, PartialEq)]
pub(crate) struct Session {
    /// Token that the client presents to authenticate requests.
    access_token: AccessToken,

    /// Account that owns the session.
    account: AccountId,

    /// When the session was created.
    login_time: OffsetDateTime,
}

impl Session {
    /// Creates a new session from its parts.
    pub(crate) fn new(
        access_token: AccessToken,
        account: AccountId,
        login_time: OffsetDateTime,
    ) -> Self {
        Self { access_token, account, login_time }
    }

    /// Consumes the session and returns its access token.
    pub(crate) fn take_access_token(self) -> AccessToken {
        self.access_token
    }
}
