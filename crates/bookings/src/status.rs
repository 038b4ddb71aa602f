//! Booking status state machines.
//!
//! ```text
//! Event:   PLANNED ──► ACTIVE ──► COMPLETED
//!             └──────────┴──────► CANCELLED
//!
//! Rental:  BOOKED ──► OUT ──► OVERDUE
//!            └────────┴─────────┴──► RETURNED | CANCELLED
//! ```
//!
//! Manual edits may only follow the arrows (or keep the current status).
//! The status sweep drives PLANNED→ACTIVE→COMPLETED and BOOKED→OUT→OVERDUE
//! and never touches a terminal booking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Cancelled)
    }

    /// Statuses whose line items hold stock.
    pub fn reserves_stock(self) -> bool {
        matches!(self, EventStatus::Planned | EventStatus::Active)
    }

    pub fn can_transition_to(self, next: EventStatus) -> bool {
        use EventStatus::*;
        self == next
            || matches!(
                (self, next),
                (Planned, Active) | (Active, Completed) | (Planned | Active, Cancelled)
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Planned => "PLANNED",
            EventStatus::Active => "ACTIVE",
            EventStatus::Completed => "COMPLETED",
            EventStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    #[default]
    Booked,
    Out,
    Returned,
    Overdue,
    Cancelled,
}

impl RentalStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RentalStatus::Returned | RentalStatus::Cancelled)
    }

    /// Statuses whose line items hold stock over the rental window.
    pub fn reserves_stock(self) -> bool {
        matches!(self, RentalStatus::Booked | RentalStatus::Out | RentalStatus::Overdue)
    }

    pub fn can_transition_to(self, next: RentalStatus) -> bool {
        use RentalStatus::*;
        self == next
            || matches!(
                (self, next),
                (Booked, Out) | (Out, Overdue) | (Booked | Out | Overdue, Returned | Cancelled)
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RentalStatus::Booked => "BOOKED",
            RentalStatus::Out => "OUT",
            RentalStatus::Returned => "RETURNED",
            RentalStatus::Overdue => "OVERDUE",
            RentalStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Status of either booking kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum BookingStatus {
    Event(EventStatus),
    Rental(RentalStatus),
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Event(s) => s.as_str(),
            BookingStatus::Rental(s) => s.as_str(),
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            BookingStatus::Event(s) => s.is_terminal(),
            BookingStatus::Rental(s) => s.is_terminal(),
        }
    }
}

macro_rules! impl_status_display {
    ($($t:ty),*) => {$(
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

impl_status_display!(EventStatus, RentalStatus, BookingStatus);
