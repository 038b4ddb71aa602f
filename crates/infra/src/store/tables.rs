use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventstock_bookings::{Booking, QuoteRequest, ReferenceNumber};
use eventstock_core::{
    BookingId, Entity, CategoryId, ClientId, ItemId, NotificationId, QuoteRequestId, SupplierId, UserId,
};
use eventstock_inventory::{Category, Item};
use eventstock_notifications::Notification;
use eventstock_parties::{Client, Supplier};
use eventstock_staff::StaffUser;

/// Every persisted record, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub clients: BTreeMap<ClientId, Client>,
    pub suppliers: BTreeMap<SupplierId, Supplier>,
    pub categories: BTreeMap<CategoryId, Category>,
    pub items: BTreeMap<ItemId, Item>,
    pub users: BTreeMap<UserId, StaffUser>,
    pub bookings: BTreeMap<BookingId, Booking>,
    pub quotes: BTreeMap<QuoteRequestId, QuoteRequest>,
    pub notifications: BTreeMap<NotificationId, Notification>,
    /// Last number handed out for SKUs.
    pub sku_sequence: u64,
}

impl Tables {
    /// Next SKU number. Never reused, even after deletes.
    pub fn next_sku_number(&mut self) -> u64 {
        self.sku_sequence += 1;
        self.sku_sequence
    }

    /// Whether any booking or quote already carries `reference`.
    pub fn reference_taken(&self, reference: &ReferenceNumber) -> bool {
        self.bookings.values().any(|b| b.reference() == reference)
            || self.quotes.values().any(|q| q.reference() == reference)
    }

    /// Fresh booking reference, unique across bookings and quotes.
    pub fn next_booking_reference(&self, now: DateTime<Utc>) -> ReferenceNumber {
        ReferenceNumber::unique(|| ReferenceNumber::for_booking(now), |r| self.reference_taken(r))
    }

    /// Fresh quote reference, unique across bookings and quotes.
    pub fn next_quote_reference(&self, now: DateTime<Utc>) -> ReferenceNumber {
        ReferenceNumber::unique(|| ReferenceNumber::for_quote(now), |r| self.reference_taken(r))
    }

    /// Client display name, or `"Unknown client"` when the record is gone.
    pub fn client_label(&self, client: ClientId) -> String {
        self.clients
            .get(&client)
            .map(|c| c.display_name())
            .unwrap_or_else(|| "Unknown client".to_string())
    }

    /// Bookings whose line items mention `item`.
    pub fn bookings_using(&self, item: ItemId) -> impl Iterator<Item = &Booking> {
        self.bookings
            .values()
            .filter(move |b| b.lines().iter().any(|l| l.item == item))
    }
}

/// Insert or replace `record` under its own id.
pub fn upsert<E: Entity>(table: &mut BTreeMap<E::Id, E>, record: E) {
    table.insert(record.id().clone(), record);
}
