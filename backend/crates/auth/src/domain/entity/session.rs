//! Session Entity
//!
//! Cached snapshot of the signed-in user, stored in the cache under the
//! bare user id and carried through the request pipeline by the access
//! guard. Holds only what protected handlers need; the password hash
//! never leaves the directory.

use serde::{Deserialize, Serialize};

use crate::domain::entity::User;
use crate::domain::value_object::{Email, UserId};

/// Session entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// User this session belongs to
    pub id: UserId,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: Email,
    /// Verification state at sign-in time
    pub verified: bool,
}

impl Session {
    /// Build a session snapshot from a user record
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            verified: user.verified,
        }
    }

    /// Cache key for this session (the bare user id)
    pub fn cache_key(&self) -> String {
        self.id.to_string()
    }
}
