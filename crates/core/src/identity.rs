//! Identity claims and role checks.
//!
//! The identity collaborator yields authenticated claims; authorization is
//! an explicit role claim rather than an email comparison. Only one admin
//! account is seeded, which keeps parity with the original single-admin
//! model while leaving room for more roles later.

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Well-known role names.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

/// A role carried in a user's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Member => ROLE_MEMBER,
        }
    }
}

/// Claims yielded by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: RecordId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl UserClaims {
    /// Claims for a regular member.
    pub fn member(user_id: impl Into<RecordId>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            roles: vec![Role::Member],
        }
    }

    /// Claims for the seeded administrator account.
    pub fn seed_admin(user_id: impl Into<RecordId>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            roles: vec![Role::Admin, Role::Member],
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}
