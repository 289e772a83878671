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

//! The `Account` data type and its building blocks.

use crate::model::HashedPassword;
use derive_getters::Getters;
use derive_more::{Display, From};
use rideshare_core::model::{EmailAddress, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length of first names and surnames per the schema.
const MAX_NAME_LENGTH: usize = 64;

/// Identifier of an account, assigned by the database.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Returns the raw numeric value of the identifier.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

/// Role of an account, which determines what the account is allowed to do.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to all accounts and rides.
    Admin,

    /// Can manage any ride and route but only its own account.
    Moderator,

    /// Regular account.
    User,
}

impl Role {
    /// Returns the textual representation of the role as stored in the database.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Moderator => "MODERATOR",
            Role::User => "USER",
        }
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MODERATOR" => Ok(Role::Moderator),
            "USER" => Ok(Role::User),
            _ => Err(ModelError(format!("Unknown role '{}'", s))),
        }
    }
}

/// A first name or surname.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct PersonName(String);

impl PersonName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(ModelError("Name cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_NAME_LENGTH {
            return Err(ModelError("Name is too long".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        PersonName::new(s)
    }
}

impl From<PersonName> for String {
    fn from(name: PersonName) -> Self {
        name.0
    }
}

#[cfg(test)]
impl From<&'static str> for PersonName {
    fn from(s: &'static str) -> Self {
        PersonName::new(s).expect("Hardcoded names must be valid")
    }
}

/// Properties of an account that clients provide when creating or updating it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AccountDetails {
    /// Email address, unique across all accounts.
    pub(crate) email: EmailAddress,

    /// First name of the account holder.
    pub(crate) first_name: PersonName,

    /// Surname of the account holder.
    pub(crate) surname: PersonName,

    /// Requested role, which is only honored for administrators.
    pub(crate) role: Option<Role>,
}

/// A registered account.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Account {
    /// Identifier of the account.
    id: AccountId,

    /// Email address of the account, used to log in.
    email: EmailAddress,

    /// First name of the account holder.
    first_name: PersonName,

    /// Surname of the account holder.
    surname: PersonName,

    /// Hash of the password of the account.
    #[serde(skip)]
    password: HashedPassword,

    /// Role of the account.
    role: Role,
}

impl Account {
    /// Creates a new account from its parts.
    pub(crate) fn new(
        id: AccountId,
        email: EmailAddress,
        first_name: PersonName,
        surname: PersonName,
        password: HashedPassword,
        role: Role,
    ) -> Self {
        Self { id, email, first_name, surname, password, role }
    }

    /// Replaces the client-provided details of the account.  The role is only replaced if the
    /// details carry one.
    pub(crate) fn with_details(mut self, details: AccountDetails) -> Self {
        self.email = details.email;
        self.first_name = details.first_name;
        self.surname = details.surname;
        if let Some(role) = details.role {
            self.role = role;
        }
        self
    }

    /// Replaces the password hash of the account.
    pub(crate) fn with_password(mut self, password: HashedPassword) -> Self {
        self.password = password;
        self
    }

    /// Returns the principal that represents this account when it makes requests.
    pub(crate) fn principal(&self) -> Principal {
        Principal { id: self.id, role: self.role }
    }
}

/// The authenticated caller of an operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Principal {
    /// Identifier of the caller's account.
    pub(crate) id: AccountId,

    /// Role of the caller's account.
    pub(crate) role: Role,
}

impl Principal {
    /// Returns true if the caller has full administrative rights.
    pub(crate) fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the caller can manage rides and routes owned by others.
    pub(crate) fn is_elevated(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Moderator)
    }
}
