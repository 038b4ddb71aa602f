//! Shared fixtures for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use eventstock_core::{BookingId, ClientId, DateRange, ItemId};
use eventstock_inventory::{Item, ItemDetails, ItemSource, Sku};

use crate::booking::{
    Booking, BookingKind, EventDetails, EventService, RentalDetails, ValidatedBooking,
};
use crate::line::LineItem;
use crate::reference::ReferenceNumber;
use crate::status::{EventStatus, RentalStatus};

/// 2025-06-`day` at `hour`:00 UTC.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

pub fn item(name: &str, quantity: u32) -> Item {
    let id = ItemId::new();
    Item::create(
        id,
        Sku::generate(Some("Stock"), 1),
        ItemDetails {
            name: name.into(),
            initial_quantity: quantity,
            ..ItemDetails::default()
        },
        at(1, 0),
    )
    .unwrap()
}

pub fn client_supplied(name: &str) -> Item {
    let id = ItemId::new();
    Item::create(
        id,
        Sku::generate(None, 1),
        ItemDetails {
            name: name.into(),
            item_source: ItemSource::ClientSupplied,
            ..ItemDetails::default()
        },
        at(1, 0),
    )
    .unwrap()
}

fn booking(kind: BookingKind, start: DateTime<Utc>, end: DateTime<Utc>, lines: &[(&Item, u32)]) -> Booking {
    let validated = ValidatedBooking {
        client: ClientId::new(),
        project_manager: None,
        project_manager_name: None,
        subcontractor_name: None,
        notes: None,
        period: DateRange::new(start, end).unwrap(),
        kind,
        lines: lines
            .iter()
            .map(|(item, quantity)| LineItem {
                item: item.id_typed(),
                quantity: *quantity,
            })
            .collect(),
    };
    Booking::create(BookingId::new(), ReferenceNumber::for_booking(at(1, 0)), validated, at(1, 0))
}

pub fn event(
    status: EventStatus,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    lines: &[(&Item, u32)],
) -> Booking {
    booking(
        BookingKind::Event(EventDetails {
            name: "Gala".into(),
            location: "Hall A".into(),
            status,
            service: EventService::Inventory,
        }),
        start,
        end,
        lines,
    )
}

pub fn rental(
    status: RentalStatus,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    lines: &[(&Item, u32)],
) -> Booking {
    booking(
        BookingKind::Rental(RentalDetails {
            status,
            delivery_location: None,
        }),
        start,
        end,
        lines,
    )
}
