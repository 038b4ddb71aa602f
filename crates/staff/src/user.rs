//! Staff user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{Entity, UserId, ValidationErrors};

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
    /// User is active and can receive assignments and notifications.
    #[default]
    Active,
    /// User is deactivated; kept for history only.
    Suspended,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Staff User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// A back-office user.
///
/// # Invariants
/// - `username` is non-empty (uniqueness is enforced by the store).
/// - A suspended user is never picked as a notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    id: UserId,
    details: UserDetails,
    status: UserStatus,
    joined_at: DateTime<Utc>,
}

impl StaffUser {
    pub fn register(id: UserId, details: UserDetails, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if details.username.trim().is_empty() {
            errors.field("username", "Username cannot be empty.");
        }
        errors.into_result(Self {
            id,
            details: UserDetails {
                username: details.username.trim().to_string(),
                ..details
            },
            status: UserStatus::Active,
            joined_at: now,
        })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.details.username
    }

    pub fn details(&self) -> &UserDetails {
        &self.details
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_staff(&self) -> bool {
        self.details.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.details.is_superuser
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    pub fn suspend(&mut self) {
        self.status = UserStatus::Suspended;
    }

    pub fn reactivate(&mut self) {
        self.status = UserStatus::Active;
    }

    /// `"First Last"`, trimmed; used as the denormalized project manager name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
            .trim()
            .to_string()
    }
}

impl Entity for StaffUser {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
