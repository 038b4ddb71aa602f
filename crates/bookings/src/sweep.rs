//! Time-driven status rules.
//!
//! [`sweep`] applies the rules in [`SWEEP_RULES`] order. Each rule sees the
//! statuses left by the previous ones. Within a rule, bookings are visited
//! by start instant then creation time. Reminder rules have no memory of
//! earlier runs: a booking still matching tomorrow's date on the next run is
//! reminded again.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use eventstock_core::{BookingId, local_date};

use crate::booking::{Booking, BookingKind};
use crate::status::{BookingStatus, EventStatus, RentalStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepRule {
    /// PLANNED event whose range contains now → ACTIVE.
    ActivateEvents,
    /// ACTIVE event that ended → COMPLETED.
    CompleteEvents,
    /// PLANNED event starting tomorrow.
    UpcomingEventReminders,
    /// ACTIVE event ending tomorrow.
    EndingEventReminders,
    /// BOOKED rental whose range contains now → OUT.
    DispatchRentals,
    /// OUT rental past its end → OVERDUE.
    FlagOverdueRentals,
    /// BOOKED rental starting tomorrow.
    UpcomingRentalReminders,
    /// OUT or OVERDUE rental due back tomorrow.
    ReturnReminders,
}

pub const SWEEP_RULES: [SweepRule; 8] = [
    SweepRule::ActivateEvents,
    SweepRule::CompleteEvents,
    SweepRule::UpcomingEventReminders,
    SweepRule::EndingEventReminders,
    SweepRule::DispatchRentals,
    SweepRule::FlagOverdueRentals,
    SweepRule::UpcomingRentalReminders,
    SweepRule::ReturnReminders,
];

struct Clock {
    now: DateTime<Utc>,
    tomorrow: NaiveDate,
    offset: FixedOffset,
}

impl SweepRule {
    /// Status written when the rule fires, `None` for reminders.
    pub fn target(self) -> Option<BookingStatus> {
        match self {
            SweepRule::ActivateEvents => Some(BookingStatus::Event(EventStatus::Active)),
            SweepRule::CompleteEvents => Some(BookingStatus::Event(EventStatus::Completed)),
            SweepRule::DispatchRentals => Some(BookingStatus::Rental(RentalStatus::Out)),
            SweepRule::FlagOverdueRentals => Some(BookingStatus::Rental(RentalStatus::Overdue)),
            _ => None,
        }
    }

    fn matches(self, booking: &Booking, clock: &Clock) -> bool {
        let period = booking.period();
        match (self, booking.kind()) {
            (SweepRule::ActivateEvents, BookingKind::Event(e)) => {
                e.status == EventStatus::Planned && period.contains(clock.now)
            }
            (SweepRule::CompleteEvents, BookingKind::Event(e)) => {
                e.status == EventStatus::Active && period.ended_before(clock.now)
            }
            (SweepRule::UpcomingEventReminders, BookingKind::Event(e)) => {
                e.status == EventStatus::Planned && period.start_date(clock.offset) == clock.tomorrow
            }
            (SweepRule::EndingEventReminders, BookingKind::Event(e)) => {
                e.status == EventStatus::Active && period.end_date(clock.offset) == clock.tomorrow
            }
            (SweepRule::DispatchRentals, BookingKind::Rental(r)) => {
                r.status == RentalStatus::Booked && period.contains(clock.now)
            }
            (SweepRule::FlagOverdueRentals, BookingKind::Rental(r)) => {
                r.status == RentalStatus::Out && period.ended_before(clock.now)
            }
            (SweepRule::UpcomingRentalReminders, BookingKind::Rental(r)) => {
                r.status == RentalStatus::Booked && period.start_date(clock.offset) == clock.tomorrow
            }
            (SweepRule::ReturnReminders, BookingKind::Rental(r)) => {
                matches!(r.status, RentalStatus::Out | RentalStatus::Overdue)
                    && period.end_date(clock.offset) == clock.tomorrow
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: BookingStatus,
    pub to: BookingStatus,
}

/// One thing the sweep did to (or noticed about) a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepNotice {
    pub booking: BookingId,
    pub rule: SweepRule,
    pub change: Option<StatusChange>,
}

impl SweepNotice {
    /// Notification text. `client` is the client's display name.
    pub fn message(&self, booking: &Booking, client: &str, offset: FixedOffset) -> String {
        let reference = booking.reference();
        let name = booking.event().map(|e| e.name.as_str()).unwrap_or_default();
        let start = booking.period().start().with_timezone(&offset).format("%Y-%m-%d %H:%M");
        let end = booking.period().end().with_timezone(&offset).format("%Y-%m-%d %H:%M");

        match (self.rule, self.change) {
            (SweepRule::ActivateEvents | SweepRule::CompleteEvents, Some(change)) => {
                format!("Event '{name}' (Ref: {reference}) status changed to {}.", change.to)
            }
            (SweepRule::DispatchRentals | SweepRule::FlagOverdueRentals, Some(change)) => format!(
                "Rental (Ref: {reference}) for client '{client}' status changed to {}.",
                change.to
            ),
            (SweepRule::UpcomingEventReminders, _) => format!(
                "Upcoming Event Reminder: '{name}' (Ref: {reference}) for client '{client}' is scheduled to start on {start}."
            ),
            (SweepRule::EndingEventReminders, _) => format!(
                "Event Nearing Completion: '{name}' (Ref: {reference}) for client '{client}' is scheduled to end on {end}."
            ),
            (SweepRule::UpcomingRentalReminders, _) => format!(
                "Upcoming Rental Reminder: Rental (Ref: {reference}) for client '{client}' is scheduled for pickup on {start}."
            ),
            (SweepRule::ReturnReminders, _) => format!(
                "Rental Nearing Return: Rental (Ref: {reference}) for client '{client}' is due for return on {end}."
            ),
            (rule, None) => format!("{booking}: {rule:?}"),
        }
    }
}

/// Run every rule once over `bookings`, mutating statuses in place.
pub fn sweep(bookings: &mut [Booking], now: DateTime<Utc>, offset: FixedOffset) -> Vec<SweepNotice> {
    let clock = Clock {
        now,
        tomorrow: local_date(now + Duration::days(1), offset),
        offset,
    };

    let mut order: Vec<usize> = (0..bookings.len()).collect();
    order.sort_by_key(|&i| (bookings[i].period().start(), bookings[i].created_at(), bookings[i].id_typed()));

    let mut notices = Vec::new();
    for rule in SWEEP_RULES {
        for &i in &order {
            let booking = &mut bookings[i];
            if !rule.matches(booking, &clock) {
                continue;
            }
            let change = rule.target().map(|to| {
                let from = booking.status();
                booking.force_status(to, now);
                StatusChange { from, to }
            });
            notices.push(SweepNotice {
                booking: booking.id_typed(),
                rule,
                change,
            });
        }
    }
    notices
}
