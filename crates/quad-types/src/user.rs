//! Authenticated-user identity records.
//!
//! `AuthUser` is owned by the session store; every other component holds
//! only transient read copies. The record round-trips through durable
//! storage, so it keeps both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

use crate::names::assemble_name;
use crate::wire::{lenient_opt_i64, lenient_opt_string};

/// Identity record for the signed-in user.
///
/// The boundary is loose about numeric fields (numbers sometimes arrive
/// as strings) and about the campus affiliation, which shows up either
/// as a numeric `campus_id` or as a `campus` string that may itself hold
/// a number. Deserialization is lenient; resolution happens via
/// [`AuthUser::campus_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthUser {
    #[serde(alias = "id", deserialize_with = "lenient_opt_i64")]
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub campus: Option<String>,
    #[serde(deserialize_with = "lenient_opt_i64")]
    pub campus_id: Option<i64>,
}

impl AuthUser {
    /// Resolves the user's campus to a numeric id.
    ///
    /// Prefers the explicit `campus_id` field, then falls back to parsing
    /// the `campus` string as a number.
    pub fn campus_id(&self) -> Option<i64> {
        if let Some(id) = self.campus_id {
            return Some(id);
        }
        self.campus.as_deref()?.trim().parse().ok()
    }

    /// Full display name from first/middle/last parts.
    ///
    /// Empty or missing parts are dropped; when every part is empty the
    /// name resolves to `"Unknown User"`.
    pub fn full_name(&self) -> String {
        assemble_name([
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        ])
        .unwrap_or_else(|| "Unknown User".to_string())
    }

    /// Uppercased initials of [`AuthUser::full_name`] (one letter per word).
    pub fn initials(&self) -> String {
        self.full_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Short name for navigation chrome (first + last), `"User"` fallback.
    pub fn display_name(&self) -> String {
        assemble_name([self.first_name.as_deref(), self.last_name.as_deref()])
            .unwrap_or_else(|| "User".to_string())
    }
}

/// Credentials sent to the authentication boundary.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response from the authentication boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub user: AuthUser,
    pub token: String,
}

/// Partial profile mutation sent to `PUT /auth/profile`.
///
/// Only the fields that are present are serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
}
