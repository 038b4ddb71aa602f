//! `eventstock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every other crate
//! (no storage, no IO).

pub mod entity;
pub mod error;
pub mod id;
pub mod range;
pub mod validation;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{BookingId, CategoryId, ClientId, ItemId, NotificationId, QuoteRequestId, SupplierId, UserId};
pub use range::{DateRange, local_date};
pub use validation::{ErrorTarget, FieldError, ValidationErrors};
pub use value_object::ValueObject;
