use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{Entity, NotificationId, UserId};

/// An in-app message, optionally addressed to a user and linking to a page.
///
/// Unaddressed notifications (`user == None`) are visible to everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user: Option<UserId>,
    message: String,
    link: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        user: Option<UserId>,
        message: impl Into<String>,
        link: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            message: message.into(),
            link,
            is_read: false,
            created_at: now,
        }
    }

    pub fn id_typed(&self) -> NotificationId {
        self.id
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `user` should see this notification.
    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.user.is_none_or(|u| u == user)
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    pub fn mark_unread(&mut self) {
        self.is_read = false;
    }
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unread_and_toggles() {
        let mut n = Notification::new(NotificationId::new(), None, "hello", None, Utc::now());
        assert!(!n.is_read());
        n.mark_read();
        assert!(n.is_read());
        n.mark_unread();
        assert!(!n.is_read());
    }

    #[test]
    fn unaddressed_notifications_are_visible_to_all() {
        let alice = UserId::new();
        let bob = UserId::new();
        let broadcast = Notification::new(NotificationId::new(), None, "all", None, Utc::now());
        let direct = Notification::new(NotificationId::new(), Some(alice), "you", None, Utc::now());

        assert!(broadcast.is_visible_to(bob));
        assert!(direct.is_visible_to(alice));
        assert!(!direct.is_visible_to(bob));
    }
}
