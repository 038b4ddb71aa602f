//! Booking lifecycle: create, edit, delete and manual status changes for
//! events and rentals.
//!
//! Every write validates against the bookings as they are inside the same
//! store transaction, so the stock check and the commit cannot interleave
//! with another writer.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{debug, info, warn};

use eventstock_bookings::{
    AvailabilityEngine, Booking, BookingContext, BookingDraft, BookingStatus, BookingType,
    ValidatedBooking, validate_booking,
};
use eventstock_core::{BookingId, DateRange, ItemId, UserId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{Store, Tables, upsert};

pub struct BookingService<S> {
    store: S,
    offset: FixedOffset,
}

impl<S: Store> BookingService<S> {
    /// `offset` is the business time zone used for calendar days.
    pub fn new(store: S, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// Whether `needed` units of `item` are free over `[start, end]`,
    /// ignoring `exclude`.
    pub fn is_available(
        &self,
        item: ItemId,
        needed: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> ServiceResult<bool> {
        let range = DateRange::new(start, end)?;
        self.store.read(|t| -> ServiceResult<_> {
            let item = t
                .items
                .get(&item)
                .ok_or_else(|| ServiceError::not_found("item", item))?;
            let engine = AvailabilityEngine::new(t.bookings.values());
            Ok(engine.is_available(item, needed, &range, exclude))
        })?
    }

    /// Units of `item` committed over `[start, end]`, ignoring `exclude`.
    pub fn assigned_in_range(
        &self,
        item: ItemId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> ServiceResult<u64> {
        let range = DateRange::new(start, end)?;
        Ok(self.store.read(|t| {
            AvailabilityEngine::new(t.bookings.values()).assigned_in_range(item, &range, exclude)
        })?)
    }

    /// Units of `item` out or committed on the local calendar day `date`.
    pub fn assigned_on_date(&self, item: ItemId, date: NaiveDate) -> ServiceResult<u64> {
        Ok(self.store.read(|t| {
            AvailabilityEngine::new(t.bookings.values()).assigned_on_date(item, date, self.offset)
        })?)
    }

    /// Units of `item` free on the local calendar day `date`, never negative.
    pub fn available_quantity(&self, item: ItemId, date: NaiveDate) -> ServiceResult<u64> {
        self.store.read(|t| -> ServiceResult<_> {
            let item = t
                .items
                .get(&item)
                .ok_or_else(|| ServiceError::not_found("item", item))?;
            Ok(AvailabilityEngine::new(t.bookings.values()).available_quantity(item, date, self.offset))
        })?
    }

    pub fn create_booking(&self, draft: BookingDraft) -> ServiceResult<Booking> {
        self.store.transaction(|t| {
            let validated = self.validate(t, &draft, None)?;
            let now = Utc::now();
            let booking = Booking::create(BookingId::new(), t.next_booking_reference(now), validated, now);
            info!(
                booking_id = %booking.id_typed(),
                reference = %booking.reference(),
                kind = %booking.booking_type(),
                lines = booking.lines().len(),
                "booking created"
            );
            upsert(&mut t.bookings, booking.clone());
            Ok(booking)
        })
    }

    pub fn edit_booking(&self, id: BookingId, draft: BookingDraft) -> ServiceResult<Booking> {
        self.store.transaction(|t| {
            let existing = t
                .bookings
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("booking", id))?;
            let validated = self.validate(t, &draft, Some(&existing))?;

            let dropped = existing.lines().len();
            if dropped > 0 && validated.is_logistics_only() && !existing.is_logistics_only() {
                warn!(
                    booking_id = %id,
                    reference = %existing.reference(),
                    dropped,
                    "event switched to logistics-only: line items removed"
                );
            }
            if existing.status() != validated.status() {
                info!(
                    booking_id = %id,
                    from = %existing.status(),
                    to = %validated.status(),
                    "booking status changed on edit"
                );
            }

            let booking = t
                .bookings
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("booking", id))?;
            booking.apply(validated, Utc::now());
            debug!(booking_id = %id, "booking updated");
            Ok(booking.clone())
        })
    }

    /// Delete a booking and its line items.
    pub fn delete_booking(&self, id: BookingId) -> ServiceResult<()> {
        self.store.transaction(|t| {
            let booking = t
                .bookings
                .remove(&id)
                .ok_or_else(|| ServiceError::not_found("booking", id))?;
            info!(booking_id = %id, reference = %booking.reference(), "booking deleted");
            Ok(())
        })
    }

    /// Manual status change, validated against the state machine.
    pub fn set_status(&self, id: BookingId, status: BookingStatus) -> ServiceResult<Booking> {
        self.store.transaction(|t| {
            let booking = t
                .bookings
                .get_mut(&id)
                .ok_or_else(|| ServiceError::not_found("booking", id))?;
            let previous = booking.set_status(status, Utc::now())?;
            info!(booking_id = %id, from = %previous, to = %status, "booking status set");
            Ok(booking.clone())
        })
    }

    pub fn booking(&self, id: BookingId) -> ServiceResult<Booking> {
        self.store
            .read(|t| t.bookings.get(&id).cloned())?
            .ok_or_else(|| ServiceError::not_found("booking", id))
    }

    /// Bookings of one kind, latest start first.
    pub fn list(&self, kind: BookingType) -> ServiceResult<Vec<Booking>> {
        let mut bookings = self.store.read(|t| {
            t.bookings
                .values()
                .filter(|b| b.booking_type() == kind)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        bookings.sort_by(|a, b| b.period().start().cmp(&a.period().start()));
        Ok(bookings)
    }

    fn validate(
        &self,
        t: &Tables,
        draft: &BookingDraft,
        existing: Option<&Booking>,
    ) -> ServiceResult<ValidatedBooking> {
        if !t.clients.contains_key(&draft.client) {
            return Err(ServiceError::not_found("client", draft.client));
        }
        let manager_name = project_manager_name(t, draft.project_manager)?;

        let engine = AvailabilityEngine::new(t.bookings.values());
        let ctx = BookingContext {
            items: &t.items,
            engine: &engine,
            offset: self.offset,
        };
        let validated = validate_booking(draft, existing, &ctx)?;
        Ok(validated.with_project_manager_name(manager_name))
    }
}

/// `"First Last"` of the selected project manager.
pub(crate) fn project_manager_name(t: &Tables, manager: Option<UserId>) -> ServiceResult<Option<String>> {
    match manager {
        None => Ok(None),
        Some(id) => t
            .users
            .get(&id)
            .map(|u| Some(u.full_name()))
            .ok_or_else(|| ServiceError::not_found("user", id)),
    }
}
