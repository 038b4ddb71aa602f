//! Booking validation: header fields, status moves, line rows and stock.
//!
//! Validation never stops at the first problem. Everything that can be
//! checked is checked, so the caller gets one message per offending field
//! or row.

use chrono::{DateTime, FixedOffset, Utc};

use eventstock_core::{DateRange, ValidationErrors};

use crate::availability::AvailabilityEngine;
use crate::booking::{
    Booking, BookingDraft, BookingKind, EventDetails, EventService, KindDraft, RentalDetails,
    ValidatedBooking,
};
use crate::line::{ItemLookup, LineItem, LineRequest, prepare_lines};
use crate::status::RentalStatus;

/// Everything validation reads besides the draft itself.
pub struct BookingContext<'a, L: ItemLookup> {
    pub items: &'a L,
    pub engine: &'a AvailabilityEngine<'a>,
    /// Business time zone, used to render dates in messages.
    pub offset: FixedOffset,
}

/// Shared start/end check for bookings and quotes.
pub fn validate_period(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    errors: &mut ValidationErrors,
) -> Option<DateRange> {
    match DateRange::new(start, end) {
        Ok(range) => Some(range),
        Err(err) => {
            errors.field_error("end_date", &err);
            None
        }
    }
}

/// Trim and drop blank optional text.
pub fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn required_text(
    value: &str,
    field: &str,
    label: &str,
    max: usize,
    errors: &mut ValidationErrors,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.field(field, format!("{label} cannot be empty."));
    } else if value.chars().count() > max {
        errors.field(field, format!("{label} cannot exceed {max} characters."));
    }
    value.to_string()
}

/// Validate a create (`existing == None`) or edit submission.
pub fn validate_booking<L: ItemLookup>(
    draft: &BookingDraft,
    existing: Option<&Booking>,
    ctx: &BookingContext<'_, L>,
) -> Result<ValidatedBooking, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(existing) = existing {
        if existing.booking_type() != draft.kind.booking_type() {
            errors.non_field(format!(
                "A {} cannot be turned into a {}.",
                existing.booking_type(),
                draft.kind.booking_type()
            ));
            return Err(errors);
        }
    }

    let period = validate_period(draft.start, draft.end, &mut errors);
    let kind = validate_kind(&draft.kind, existing, &mut errors);

    let lines = match &kind {
        BookingKind::Event(EventDetails {
            service: EventService::LogisticsOnly(_),
            ..
        }) => Vec::new(),
        _ => {
            let reserves = match &kind {
                BookingKind::Event(e) => e.status.reserves_stock(),
                BookingKind::Rental(r) => r.status.reserves_stock(),
            };
            validate_lines(
                &draft.lines,
                period.as_ref().filter(|_| reserves),
                existing,
                ctx,
                &mut errors,
            )
        }
    };

    let Some(period) = period else {
        return Err(errors);
    };

    errors.into_result(ValidatedBooking {
        client: draft.client,
        project_manager: draft.project_manager,
        project_manager_name: None,
        subcontractor_name: optional_text(&draft.subcontractor_name),
        notes: optional_text(&draft.notes),
        period,
        kind,
        lines,
    })
}

fn validate_kind(
    draft: &KindDraft,
    existing: Option<&Booking>,
    errors: &mut ValidationErrors,
) -> BookingKind {
    match draft {
        KindDraft::Event(event) => {
            let name = required_text(&event.name, "name", "Event name", 200, errors);
            let location = required_text(&event.location, "location", "Location", 255, errors);
            let current = existing.and_then(Booking::event).map(|e| e.status);
            let status = match (current, event.status) {
                (None, requested) => requested.unwrap_or_default(),
                (Some(current), None) => current,
                (Some(current), Some(next)) => {
                    if !current.can_transition_to(next) {
                        errors.field(
                            "status",
                            format!("Cannot change status from {current} to {next}."),
                        );
                    }
                    next
                }
            };
            BookingKind::Event(EventDetails {
                name,
                location,
                status,
                service: normalize_service(&event.service),
            })
        }
        KindDraft::Rental(rental) => {
            let current = existing.and_then(Booking::rental).map(|r| r.status);
            let status = match (current, rental.status) {
                (None, _) => RentalStatus::Booked,
                (Some(current), None) => current,
                (Some(current), Some(next)) => {
                    if !current.can_transition_to(next) {
                        errors.field(
                            "status",
                            format!("Cannot change status from {current} to {next}."),
                        );
                    }
                    next
                }
            };
            BookingKind::Rental(RentalDetails {
                status,
                delivery_location: optional_text(&rental.delivery_location),
            })
        }
    }
}

fn normalize_service(service: &EventService) -> EventService {
    match service {
        EventService::Inventory => EventService::Inventory,
        EventService::LogisticsOnly(details) => {
            let mut details = details.clone();
            details.description_of_goods = optional_text(&details.description_of_goods);
            for stop in [
                &mut details.pickup,
                &mut details.delivery,
                &mut details.return_pickup,
                &mut details.return_delivery,
            ] {
                stop.address = optional_text(&stop.address);
                stop.contact = optional_text(&stop.contact);
            }
            EventService::LogisticsOnly(details)
        }
    }
}

/// Row checks plus the stock check against `period` (skipped when `None`).
fn validate_lines<L: ItemLookup>(
    rows: &[LineRequest],
    period: Option<&DateRange>,
    existing: Option<&Booking>,
    ctx: &BookingContext<'_, L>,
    errors: &mut ValidationErrors,
) -> Vec<LineItem> {
    let accepted = prepare_lines(rows, ctx.items, errors);
    let exclude = existing.map(Booking::id_typed);

    let mut lines = Vec::with_capacity(accepted.len());
    for row in accepted {
        if let Some(range) = period {
            if let Some(item) = ctx.items.find_item(&row.line.item) {
                if !ctx
                    .engine
                    .is_available(item, i64::from(row.line.quantity), range, exclude)
                {
                    errors.line(
                        row.index,
                        Some("quantity"),
                        format!(
                            "Not enough '{}' available ({} currently free) for the selected dates [{} - {}].",
                            item.name(),
                            ctx.engine.free_in_range(item, range, exclude),
                            range.start().with_timezone(&ctx.offset).format("%Y-%m-%d %H:%M"),
                            range.end().with_timezone(&ctx.offset).format("%Y-%m-%d %H:%M"),
                        ),
                    );
                    continue;
                }
            }
        }
        lines.push(row.line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::booking::{EventDraft, LogisticsDetails, RentalDraft};
    use crate::status::EventStatus;
    use crate::test_support::{at, event, item, rental};
    use eventstock_core::{ClientId, ErrorTarget, ItemId};
    use eventstock_inventory::Item;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn catalog(items: &[&Item]) -> BTreeMap<ItemId, Item> {
        items.iter().map(|i| (i.id_typed(), (*i).clone())).collect()
    }

    fn event_draft(start: DateTime<Utc>, end: DateTime<Utc>, lines: Vec<LineRequest>) -> BookingDraft {
        BookingDraft {
            client: ClientId::new(),
            project_manager: None,
            subcontractor_name: Some("  ".into()),
            notes: None,
            start,
            end,
            kind: KindDraft::Event(EventDraft {
                name: "Launch".into(),
                location: "Pier 4".into(),
                status: None,
                service: EventService::Inventory,
            }),
            lines,
        }
    }

    #[test]
    fn valid_event_defaults_to_planned() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let engine = AvailabilityEngine::new([]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let draft = event_draft(at(1, 8), at(2, 20), vec![LineRequest::new(tent.id_typed(), 5)]);
        let validated = validate_booking(&draft, None, &ctx).unwrap();

        assert_eq!(validated.lines().len(), 1);
        assert_eq!(validated.subcontractor_name, None);
        assert_eq!(
            validated.status(),
            crate::status::BookingStatus::Event(EventStatus::Planned)
        );
    }

    #[test]
    fn collects_period_and_row_errors_together() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let engine = AvailabilityEngine::new([]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let mut draft = event_draft(
            at(3, 8),
            at(2, 20),
            vec![LineRequest { item: Some(tent.id_typed()), quantity: None, delete: false }],
        );
        if let KindDraft::Event(e) = &mut draft.kind {
            e.name = String::new();
        }
        let errors = validate_booking(&draft, None, &ctx).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.target == ErrorTarget::Field { name: "end_date".into() }));
        assert!(errors.iter().any(|e| e.target == ErrorTarget::Field { name: "name".into() }));
        assert_eq!(errors.for_line(0).count(), 1);
    }

    #[test]
    fn rejects_overbooking_with_free_count_in_message() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let other = event(EventStatus::Planned, at(1, 8), at(3, 20), &[(&tent, 3)]);
        let engine = AvailabilityEngine::new([&other]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let draft = event_draft(at(2, 8), at(2, 20), vec![LineRequest::new(tent.id_typed(), 3)]);
        let errors = validate_booking(&draft, None, &ctx).unwrap_err();
        let message = &errors.for_line(0).next().unwrap().message;

        assert!(message.starts_with("Not enough 'Tent' available (2 currently free)"));
        assert!(message.ends_with("[2025-06-02 08:00 - 2025-06-02 20:00]."));
    }

    #[test]
    fn edit_excludes_own_quantities() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let existing = event(EventStatus::Planned, at(1, 8), at(3, 20), &[(&tent, 5)]);
        let engine = AvailabilityEngine::new([&existing]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let draft = event_draft(at(1, 8), at(3, 20), vec![LineRequest::new(tent.id_typed(), 5)]);
        assert!(validate_booking(&draft, Some(&existing), &ctx).is_ok());
    }

    #[test]
    fn edit_rejects_illegal_status_move() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let existing = event(EventStatus::Completed, at(1, 8), at(3, 20), &[]);
        let engine = AvailabilityEngine::new([&existing]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let mut draft = event_draft(at(1, 8), at(3, 20), vec![]);
        if let KindDraft::Event(e) = &mut draft.kind {
            e.status = Some(EventStatus::Planned);
        }
        let errors = validate_booking(&draft, Some(&existing), &ctx).unwrap_err();
        assert!(errors.iter().any(|e| e.target == ErrorTarget::Field { name: "status".into() }));
    }

    #[test]
    fn logistics_only_events_drop_their_lines() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let engine = AvailabilityEngine::new([]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let mut draft = event_draft(at(1, 8), at(3, 20), vec![LineRequest::new(tent.id_typed(), 50)]);
        if let KindDraft::Event(e) = &mut draft.kind {
            e.service = EventService::LogisticsOnly(LogisticsDetails {
                description_of_goods: Some("Pallets".into()),
                ..LogisticsDetails::default()
            });
        }
        let validated = validate_booking(&draft, None, &ctx).unwrap();
        assert!(validated.lines().is_empty());
    }

    #[test]
    fn new_rentals_always_start_booked() {
        let items: BTreeMap<ItemId, Item> = BTreeMap::new();
        let engine = AvailabilityEngine::new([]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let mut draft = event_draft(at(1, 8), at(3, 20), vec![]);
        draft.kind = KindDraft::Rental(RentalDraft {
            delivery_location: None,
            status: Some(RentalStatus::Returned),
        });
        let validated = validate_booking(&draft, None, &ctx).unwrap();
        assert_eq!(
            validated.status(),
            crate::status::BookingStatus::Rental(RentalStatus::Booked)
        );
    }

    #[test]
    fn kind_cannot_change_on_edit() {
        let items: BTreeMap<ItemId, Item> = BTreeMap::new();
        let existing = rental(RentalStatus::Booked, at(1, 8), at(3, 20), &[]);
        let engine = AvailabilityEngine::new([&existing]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let draft = event_draft(at(1, 8), at(3, 20), vec![]);
        assert!(validate_booking(&draft, Some(&existing), &ctx).is_err());
    }

    #[test]
    fn cancelling_skips_stock_check() {
        let tent = item("Tent", 5);
        let items = catalog(&[&tent]);
        let existing = event(EventStatus::Planned, at(1, 8), at(3, 20), &[(&tent, 2)]);
        let hog = event(EventStatus::Planned, at(1, 8), at(3, 20), &[(&tent, 5)]);
        let engine = AvailabilityEngine::new([&existing, &hog]);
        let ctx = BookingContext { items: &items, engine: &engine, offset: utc() };

        let mut draft = event_draft(at(1, 8), at(3, 20), vec![LineRequest::new(tent.id_typed(), 2)]);
        if let KindDraft::Event(e) = &mut draft.kind {
            e.status = Some(EventStatus::Cancelled);
        }
        assert!(validate_booking(&draft, Some(&existing), &ctx).is_ok());
    }
}
