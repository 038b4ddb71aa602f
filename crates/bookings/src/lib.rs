//! Bookings domain module.
//!
//! Events, rentals and quote requests, their status state machines, line
//! items, the availability engine and the time-driven status rules. All of
//! it is pure domain logic; persistence and orchestration live in
//! `eventstock-infra`.

pub mod availability;
pub mod booking;
pub mod lifecycle;
pub mod line;
pub mod quote;
pub mod reference;
pub mod status;
pub mod sweep;

#[cfg(test)]
mod test_support;

pub use availability::AvailabilityEngine;
pub use booking::{
    Booking, BookingDraft, BookingKind, BookingType, EventDetails, EventDraft, EventService,
    KindDraft, LogisticsDetails, RentalDetails, RentalDraft, Stop, ValidatedBooking,
};
pub use lifecycle::{BookingContext, validate_booking};
pub use line::{ItemLookup, LineItem, LineRequest};
pub use quote::{QuoteDraft, QuoteRequest};
pub use reference::ReferenceNumber;
pub use status::{BookingStatus, EventStatus, RentalStatus};
pub use sweep::{SWEEP_RULES, StatusChange, SweepNotice, SweepRule, sweep};
