use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use eventstock_bookings::{BookingDraft, BookingStatus, KindDraft, LineRequest, RentalDraft, RentalStatus};
use eventstock_infra::{
    AppConfig, BookingService, CatalogService, InMemoryStore, NotificationService, StatusSweeper,
    load_snapshot, save_snapshot,
};
use eventstock_inventory::ItemDetails;
use eventstock_notifications::PrivilegeOrderResolver;
use eventstock_parties::ClientDetails;
use eventstock_staff::UserDetails;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

struct TempFile(PathBuf);

impl TempFile {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("eventstock-it-{}", uuid::Uuid::new_v4())).join("data.json"))
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Some(dir) = self.0.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

#[test]
fn state_survives_a_snapshot_and_sweeps_after_reload() {
    let file = TempFile::new();
    let utc = FixedOffset::east_opt(0).unwrap();

    let store = Arc::new(InMemoryStore::new());
    let catalog = CatalogService::new(store.clone());
    let bookings = BookingService::new(store.clone(), utc);

    let admin = catalog
        .register_user(UserDetails {
            username: "admin".into(),
            is_superuser: true,
            ..UserDetails::default()
        })
        .unwrap();
    let client = catalog
        .create_client(ClientDetails {
            name: "Acme".into(),
            ..ClientDetails::default()
        })
        .unwrap();
    let tents = catalog
        .create_item(ItemDetails {
            name: "Tent".into(),
            initial_quantity: 4,
            ..ItemDetails::default()
        })
        .unwrap();
    let rental = bookings
        .create_booking(BookingDraft {
            client: client.id_typed(),
            project_manager: None,
            subcontractor_name: None,
            notes: None,
            start: at(10, 8),
            end: at(11, 18),
            kind: KindDraft::Rental(RentalDraft::default()),
            lines: vec![LineRequest::new(tents.id_typed(), 4)],
        })
        .unwrap();

    save_snapshot(&file.0, &store.snapshot().unwrap()).unwrap();

    let reloaded = Arc::new(InMemoryStore::from_tables(load_snapshot(&file.0).unwrap()));
    assert_eq!(reloaded.snapshot().unwrap(), store.snapshot().unwrap());

    let config = AppConfig {
        site_url: Some("https://stock.example.com/".into()),
        ..AppConfig::default()
    };
    let report = StatusSweeper::from_config(reloaded.clone(), PrivilegeOrderResolver, &config)
        .run(at(10, 9))
        .unwrap();
    assert_eq!(report.rentals_updated, 1);

    let reloaded_bookings = BookingService::new(reloaded.clone(), utc);
    assert_eq!(
        reloaded_bookings.booking(rental.id_typed()).unwrap().status(),
        BookingStatus::Rental(RentalStatus::Out)
    );
    assert!(
        !reloaded_bookings
            .is_available(tents.id_typed(), 1, at(11, 0), at(11, 1), None)
            .unwrap()
    );

    let feed = NotificationService::new(reloaded).feed(admin.id_typed()).unwrap();
    assert!(feed.notifications.iter().all(|n| {
        n.link()
            .is_some_and(|l| l == format!("https://stock.example.com/bookings/rentals/{}/", rental.id_typed()))
    }));
    assert_eq!(feed.unread, report.notifications_created);
}

#[test]
fn missing_snapshot_starts_empty() {
    let file = TempFile::new();
    let tables = load_snapshot(&file.0).unwrap();
    assert!(tables.bookings.is_empty());
    assert!(tables.items.is_empty());
}
