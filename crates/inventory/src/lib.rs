//! Inventory domain module.
//!
//! Item types, their category hierarchy and SKU generation, implemented purely
//! as deterministic domain logic (no IO, no storage). How many units of an
//! item are free on a given date depends on bookings and lives in
//! `eventstock-bookings::availability`.

pub mod category;
pub mod item;
pub mod sku;

pub use category::{Category, CategoryDetails, category_path, would_create_cycle};
pub use item::{DimensionUnit, Dimensions, Item, ItemDetails, ItemSource, Pricing};
pub use sku::Sku;
