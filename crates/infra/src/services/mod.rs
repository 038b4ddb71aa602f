//! Application services over the entity store.

pub mod bookings;
pub mod catalog;
pub mod notifications;
pub mod quotes;

pub use bookings::BookingService;
pub use catalog::{CatalogService, CategoryView};
pub use notifications::{NotificationFeed, NotificationService};
pub use quotes::QuoteService;
