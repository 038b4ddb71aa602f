//! In-app notifications and who receives them.

pub mod link;
pub mod notification;
pub mod recipient;

pub use link::{LinkError, booking_link};
pub use notification::Notification;
pub use recipient::{PrivilegeOrderResolver, RecipientResolver};
