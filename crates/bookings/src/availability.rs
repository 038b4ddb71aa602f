//! Availability engine.
//!
//! Computes how many units of an item are committed over a date range or on
//! a calendar day, derived entirely from existing bookings. Nothing is
//! cached: every answer reflects the bookings the engine was built over.
//!
//! Two views exist and they deliberately differ:
//! - **range view** ([`AvailabilityEngine::assigned_in_range`]) is the
//!   booking gate: any overlapping PLANNED/ACTIVE event or
//!   BOOKED/OUT/OVERDUE rental holds its units.
//! - **day view** ([`AvailabilityEngine::assigned_on_date`]) is the
//!   dashboard figure: rentals count on a day while BOOKED/OUT and
//!   overlapping it, plus OUT/OVERDUE rentals whose end already passed.

use chrono::{FixedOffset, NaiveDate};

use eventstock_core::{BookingId, DateRange, ItemId};
use eventstock_inventory::Item;

use crate::booking::{Booking, BookingKind};
use crate::status::{EventStatus, RentalStatus};

pub struct AvailabilityEngine<'a> {
    bookings: Vec<&'a Booking>,
}

impl<'a> AvailabilityEngine<'a> {
    pub fn new(bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        Self {
            bookings: bookings.into_iter().collect(),
        }
    }

    /// Units of `item` held by stock-reserving bookings overlapping `range`,
    /// ignoring the booking `exclude` (the one being edited).
    pub fn assigned_in_range(
        &self,
        item: ItemId,
        range: &DateRange,
        exclude: Option<BookingId>,
    ) -> u64 {
        self.bookings
            .iter()
            .filter(|b| Some(b.id_typed()) != exclude)
            .filter(|b| b.reserves_stock() && b.period().overlaps(range))
            .map(|b| b.quantity_of(item))
            .sum()
    }

    /// Units of an owned item not held by other bookings over `range`,
    /// floored at zero.
    pub fn free_in_range(&self, item: &Item, range: &DateRange, exclude: Option<BookingId>) -> u64 {
        u64::from(item.initial_quantity())
            .saturating_sub(self.assigned_in_range(item.id_typed(), range, exclude))
    }

    /// Whether `needed` more units of `item` fit over `range`.
    ///
    /// Non-positive requests are always available. Client-supplied items
    /// are brought by the client and never limited by stock.
    pub fn is_available(
        &self,
        item: &Item,
        needed: i64,
        range: &DateRange,
        exclude: Option<BookingId>,
    ) -> bool {
        if needed <= 0 || !item.is_owned() {
            return true;
        }
        let assigned = self.assigned_in_range(item.id_typed(), range, exclude);
        let potential = i128::from(item.initial_quantity()) - i128::from(assigned);
        potential >= i128::from(needed)
    }

    /// Units of `item` out or committed on the local calendar day `date`.
    pub fn assigned_on_date(&self, item: ItemId, date: NaiveDate, offset: FixedOffset) -> u64 {
        let day = DateRange::calendar_day(date, offset);
        self.bookings
            .iter()
            .filter(|b| counts_on_day(b, &day))
            .map(|b| b.quantity_of(item))
            .sum()
    }

    /// `max(0, initial_quantity - assigned_on_date)`.
    pub fn available_quantity(&self, item: &Item, date: NaiveDate, offset: FixedOffset) -> u64 {
        u64::from(item.initial_quantity())
            .saturating_sub(self.assigned_on_date(item.id_typed(), date, offset))
    }

    /// Units of every item on bookings active during `date`: PLANNED/ACTIVE
    /// events and BOOKED/OUT rentals overlapping the day.
    pub fn total_assigned_on_date(&self, date: NaiveDate, offset: FixedOffset) -> u64 {
        let day = DateRange::calendar_day(date, offset);
        self.bookings
            .iter()
            .filter(|b| b.period().overlaps(&day))
            .filter(|b| match b.kind() {
                BookingKind::Event(e) => e.status.reserves_stock(),
                BookingKind::Rental(r) => {
                    matches!(r.status, RentalStatus::Booked | RentalStatus::Out)
                }
            })
            .flat_map(|b| b.lines())
            .map(|l| u64::from(l.quantity))
            .sum()
    }
}

fn counts_on_day(booking: &Booking, day: &DateRange) -> bool {
    match booking.kind() {
        BookingKind::Event(e) => {
            matches!(e.status, EventStatus::Planned | EventStatus::Active)
                && booking.period().overlaps(day)
        }
        BookingKind::Rental(r) => {
            let current = matches!(r.status, RentalStatus::Booked | RentalStatus::Out)
                && booking.period().overlaps(day);
            let late = matches!(r.status, RentalStatus::Out | RentalStatus::Overdue)
                && booking.period().ended_before(day.start());
            current || late
        }
    }
}
