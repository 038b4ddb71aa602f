//! Events and rentals.
//!
//! Both kinds share the same header fields, a closed date range and a set of
//! line items. They differ in their status state machine and a handful of
//! kind-specific fields, captured by [`BookingKind`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{
    BookingId, ClientId, DateRange, DomainError, DomainResult, Entity, ItemId, UserId,
};

use crate::line::{LineItem, LineRequest};
use crate::reference::ReferenceNumber;
use crate::status::{BookingStatus, EventStatus, RentalStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Event,
    Rental,
}

impl BookingType {
    /// URL path segment for booking detail pages.
    pub fn path_segment(self) -> &'static str {
        match self {
            BookingType::Event => "events",
            BookingType::Rental => "rentals",
        }
    }
}

impl core::fmt::Display for BookingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            BookingType::Event => "Event",
            BookingType::Rental => "Rental",
        })
    }
}

/// Address and contact for one leg of a logistics job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub address: Option<String>,
    pub contact: Option<String>,
}

/// Transport-only job details for events that do not draw on stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsDetails {
    pub description_of_goods: Option<String>,
    pub pickup: Stop,
    pub delivery: Stop,
    pub return_pickup: Stop,
    pub return_delivery: Stop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum EventService {
    /// Regular event drawing items from stock.
    #[default]
    Inventory,
    /// Logistics-only job. Never carries line items.
    LogisticsOnly(LogisticsDetails),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: String,
    pub location: String,
    pub status: EventStatus,
    pub service: EventService,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalDetails {
    pub status: RentalStatus,
    pub delivery_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingKind {
    Event(EventDetails),
    Rental(RentalDetails),
}

// ─────────────────────────────────────────────────────────────────────────────
// Drafts (caller input)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    pub location: String,
    /// `None` keeps the current status (or starts at PLANNED).
    pub status: Option<EventStatus>,
    pub service: EventService,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalDraft {
    pub delivery_location: Option<String>,
    /// Ignored on creation: new rentals always start BOOKED.
    pub status: Option<RentalStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindDraft {
    Event(EventDraft),
    Rental(RentalDraft),
}

impl KindDraft {
    pub fn booking_type(&self) -> BookingType {
        match self {
            KindDraft::Event(_) => BookingType::Event,
            KindDraft::Rental(_) => BookingType::Rental,
        }
    }
}

/// A create or edit submission for an event or rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub client: ClientId,
    pub project_manager: Option<UserId>,
    pub subcontractor_name: Option<String>,
    pub notes: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: KindDraft,
    #[serde(default)]
    pub lines: Vec<LineRequest>,
}

/// A draft that passed every check, ready to be applied.
///
/// Only produced by [`crate::lifecycle::validate_booking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub(crate) client: ClientId,
    pub(crate) project_manager: Option<UserId>,
    pub(crate) project_manager_name: Option<String>,
    pub(crate) subcontractor_name: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) period: DateRange,
    pub(crate) kind: BookingKind,
    pub(crate) lines: Vec<LineItem>,
}

impl ValidatedBooking {
    /// Display name copied from the selected project manager.
    pub fn with_project_manager_name(mut self, name: Option<String>) -> Self {
        self.project_manager_name = name;
        self
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn period(&self) -> &DateRange {
        &self.period
    }

    pub fn status(&self) -> BookingStatus {
        status_of(&self.kind)
    }

    pub fn kind(&self) -> &BookingKind {
        &self.kind
    }

    pub fn is_logistics_only(&self) -> bool {
        is_logistics(&self.kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    reference: ReferenceNumber,
    client: ClientId,
    project_manager: Option<UserId>,
    project_manager_name: Option<String>,
    subcontractor_name: Option<String>,
    notes: Option<String>,
    period: DateRange,
    kind: BookingKind,
    lines: Vec<LineItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn create(
        id: BookingId,
        reference: ReferenceNumber,
        validated: ValidatedBooking,
        now: DateTime<Utc>,
    ) -> Self {
        let ValidatedBooking {
            client,
            project_manager,
            project_manager_name,
            subcontractor_name,
            notes,
            period,
            kind,
            lines,
        } = validated;
        Self {
            id,
            reference,
            client,
            project_manager,
            project_manager_name,
            subcontractor_name,
            notes,
            period,
            kind,
            lines,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field. The reference number is kept.
    pub fn apply(&mut self, validated: ValidatedBooking, now: DateTime<Utc>) {
        self.client = validated.client;
        self.project_manager = validated.project_manager;
        self.project_manager_name = validated.project_manager_name;
        self.subcontractor_name = validated.subcontractor_name;
        self.notes = validated.notes;
        self.period = validated.period;
        self.kind = validated.kind;
        self.lines = validated.lines;
        self.updated_at = now;
    }

    pub fn id_typed(&self) -> BookingId {
        self.id
    }

    pub fn reference(&self) -> &ReferenceNumber {
        &self.reference
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    pub fn project_manager(&self) -> Option<UserId> {
        self.project_manager
    }

    pub fn project_manager_name(&self) -> Option<&str> {
        self.project_manager_name.as_deref()
    }

    pub fn subcontractor_name(&self) -> Option<&str> {
        self.subcontractor_name.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn period(&self) -> &DateRange {
        &self.period
    }

    pub fn kind(&self) -> &BookingKind {
        &self.kind
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn booking_type(&self) -> BookingType {
        match self.kind {
            BookingKind::Event(_) => BookingType::Event,
            BookingKind::Rental(_) => BookingType::Rental,
        }
    }

    pub fn status(&self) -> BookingStatus {
        status_of(&self.kind)
    }

    pub fn event(&self) -> Option<&EventDetails> {
        match &self.kind {
            BookingKind::Event(details) => Some(details),
            BookingKind::Rental(_) => None,
        }
    }

    pub fn rental(&self) -> Option<&RentalDetails> {
        match &self.kind {
            BookingKind::Rental(details) => Some(details),
            BookingKind::Event(_) => None,
        }
    }

    pub fn is_logistics_only(&self) -> bool {
        is_logistics(&self.kind)
    }

    /// Event name, or "Rental {reference}" for rentals.
    pub fn title(&self) -> String {
        match &self.kind {
            BookingKind::Event(details) => details.name.clone(),
            BookingKind::Rental(_) => format!("Rental {}", self.reference),
        }
    }

    /// Units of `item` on this booking.
    pub fn quantity_of(&self, item: ItemId) -> u64 {
        self.lines
            .iter()
            .filter(|l| l.item == item)
            .map(|l| u64::from(l.quantity))
            .sum()
    }

    /// Whether the line items hold stock over the booking's range.
    pub fn reserves_stock(&self) -> bool {
        match &self.kind {
            BookingKind::Event(details) => details.status.reserves_stock(),
            BookingKind::Rental(details) => details.status.reserves_stock(),
        }
    }

    /// Rental still not returned after its end instant.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.rental()
            .is_some_and(|r| !r.status.is_terminal() && self.period.ended_before(now))
    }

    /// Clear the project manager after the user is removed. The copied
    /// display name is kept.
    pub fn detach_project_manager(&mut self) {
        self.project_manager = None;
    }

    /// Manual status change. Returns the previous status.
    pub fn set_status(&mut self, next: BookingStatus, now: DateTime<Utc>) -> DomainResult<BookingStatus> {
        let previous = self.status();
        let allowed = match (&self.kind, next) {
            (BookingKind::Event(details), BookingStatus::Event(next)) => {
                details.status.can_transition_to(next)
            }
            (BookingKind::Rental(details), BookingStatus::Rental(next)) => {
                details.status.can_transition_to(next)
            }
            _ => {
                return Err(DomainError::validation(format!(
                    "{next} is not a valid {} status.",
                    self.booking_type()
                )));
            }
        };
        if !allowed {
            return Err(DomainError::conflict(format!(
                "Cannot change status from {previous} to {next}."
            )));
        }
        self.force_status(next, now);
        Ok(previous)
    }

    /// Unchecked status write used by the status sweep.
    pub(crate) fn force_status(&mut self, next: BookingStatus, now: DateTime<Utc>) {
        match (&mut self.kind, next) {
            (BookingKind::Event(details), BookingStatus::Event(s)) => details.status = s,
            (BookingKind::Rental(details), BookingStatus::Rental(s)) => details.status = s,
            _ => return,
        }
        self.updated_at = now;
    }
}

fn is_logistics(kind: &BookingKind) -> bool {
    matches!(
        kind,
        BookingKind::Event(EventDetails {
            service: EventService::LogisticsOnly(_),
            ..
        })
    )
}

fn status_of(kind: &BookingKind) -> BookingStatus {
    match kind {
        BookingKind::Event(details) => BookingStatus::Event(details.status),
        BookingKind::Rental(details) => BookingStatus::Rental(details.status),
    }
}

impl Entity for Booking {
    type Id = BookingId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Booking {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.title(), self.reference)
    }
}
