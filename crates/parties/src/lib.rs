//! Parties domain module (clients and suppliers).
//!
//! This crate contains business rules for the people and companies the
//! business deals with, implemented purely as deterministic domain logic (no
//! IO, no storage). Uniqueness rules that need a view of every record (client
//! email, supplier name) are enforced by the store-backed services in infra.

pub mod client;
pub mod contact;
pub mod supplier;

pub use client::{Client, ClientDetails};
pub use contact::ContactInfo;
pub use supplier::{Supplier, SupplierDetails};
