//! Shared fixtures for service-level tests.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use eventstock_bookings::{
    BookingDraft, EventDraft, EventService, KindDraft, LineRequest, RentalDraft,
};
use eventstock_core::{ClientId, ItemId, UserId};
use eventstock_inventory::{ItemDetails, ItemSource};
use eventstock_parties::ClientDetails;
use eventstock_staff::UserDetails;

use crate::reports::ReportService;
use crate::services::{BookingService, CatalogService, NotificationService, QuoteService};
use crate::store::InMemoryStore;

pub type Shared = Arc<InMemoryStore>;

pub struct Harness {
    pub store: Shared,
    pub catalog: CatalogService<Shared>,
    pub bookings: BookingService<Shared>,
    pub quotes: QuoteService<Shared>,
    pub notifications: NotificationService<Shared>,
    pub reports: ReportService<Shared>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let utc = FixedOffset::east_opt(0).unwrap();
        Self {
            catalog: CatalogService::new(store.clone()),
            bookings: BookingService::new(store.clone(), utc),
            quotes: QuoteService::new(store.clone(), utc),
            notifications: NotificationService::new(store.clone()),
            reports: ReportService::new(store.clone(), utc, 3),
            store,
        }
    }

    pub fn client(&self, name: &str) -> ClientId {
        self.catalog
            .create_client(ClientDetails {
                name: name.into(),
                ..ClientDetails::default()
            })
            .unwrap()
            .id_typed()
    }

    pub fn item(&self, name: &str, quantity: u32) -> ItemId {
        self.catalog
            .create_item(ItemDetails {
                name: name.into(),
                initial_quantity: quantity,
                ..ItemDetails::default()
            })
            .unwrap()
            .id_typed()
    }

    pub fn client_supplied(&self, name: &str) -> ItemId {
        self.catalog
            .create_item(ItemDetails {
                name: name.into(),
                item_source: ItemSource::ClientSupplied,
                ..ItemDetails::default()
            })
            .unwrap()
            .id_typed()
    }

    pub fn user(&self, username: &str, superuser: bool) -> UserId {
        self.catalog
            .register_user(UserDetails {
                username: username.into(),
                first_name: "Sam".into(),
                last_name: "Reyes".into(),
                is_staff: true,
                is_superuser: superuser,
                ..UserDetails::default()
            })
            .unwrap()
            .id_typed()
    }
}

/// 2025-06-`day` at `hour`:00 UTC.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn rows(lines: &[(ItemId, i64)]) -> Vec<LineRequest> {
    lines.iter().map(|(item, qty)| LineRequest::new(*item, *qty)).collect()
}

pub fn event_draft(
    client: ClientId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    lines: &[(ItemId, i64)],
) -> BookingDraft {
    BookingDraft {
        client,
        project_manager: None,
        subcontractor_name: None,
        notes: None,
        start,
        end,
        kind: KindDraft::Event(EventDraft {
            name: "Summer gala".into(),
            location: "Hall A".into(),
            status: None,
            service: EventService::Inventory,
        }),
        lines: rows(lines),
    }
}

pub fn rental_draft(
    client: ClientId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    lines: &[(ItemId, i64)],
) -> BookingDraft {
    BookingDraft {
        client,
        project_manager: None,
        subcontractor_name: None,
        notes: None,
        start,
        end,
        kind: KindDraft::Rental(RentalDraft::default()),
        lines: rows(lines),
    }
}
