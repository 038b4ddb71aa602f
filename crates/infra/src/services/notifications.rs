use serde::Serialize;

use eventstock_core::{NotificationId, UserId};
use eventstock_notifications::Notification;

use crate::error::{ServiceError, ServiceResult};
use crate::store::Store;

/// A user's notification feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationFeed {
    /// Addressed to the user or to nobody, newest first.
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

pub struct NotificationService<S> {
    store: S,
}

impl<S: Store> NotificationService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn feed(&self, user: UserId) -> ServiceResult<NotificationFeed> {
        let mut notifications = self.store.read(|t| {
            t.notifications
                .values()
                .filter(|n| n.is_visible_to(user))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        notifications.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id_typed().cmp(&a.id_typed()))
        });
        let unread = notifications.iter().filter(|n| !n.is_read()).count();
        Ok(NotificationFeed {
            notifications,
            unread,
        })
    }

    pub fn mark_read(&self, id: NotificationId) -> ServiceResult<Notification> {
        self.update(id, Notification::mark_read)
    }

    pub fn mark_unread(&self, id: NotificationId) -> ServiceResult<Notification> {
        self.update(id, Notification::mark_unread)
    }

    fn update(&self, id: NotificationId, f: impl FnOnce(&mut Notification)) -> ServiceResult<Notification> {
        self.store.transaction(|t| {
            let notification = t
                .notifications
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("notification", id))?;
            f(notification);
            Ok(notification.clone())
        })
    }
}
