//! Read-only reports: monthly summary and the operations dashboard.
//!
//! Reports are plain serializable structs; rendering them (PDF, spreadsheet,
//! HTML) is left to the caller.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use eventstock_bookings::{AvailabilityEngine, Booking, BookingStatus, BookingType, EventStatus, RentalStatus};
use eventstock_core::{BookingId, ClientId, ItemId, UserId, local_date};
use eventstock_inventory::Item;

use crate::error::ServiceResult;
use crate::store::{Store, Tables};

const UPCOMING_DAYS: i64 = 7;
const ENDING_SOON_DAYS: i64 = 3;
const UPCOMING_LIMIT: usize = 5;
const OVERDUE_LIMIT: usize = 10;
const LOW_STOCK_LIMIT: usize = 10;
const RECENT_LIMIT: usize = 5;

/// `None` means "all" for year and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub project_manager: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub id: BookingId,
    pub reference: String,
    pub title: String,
    pub client: String,
    pub project_manager: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: ClientId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUsage {
    pub item: ItemId,
    pub name: String,
    pub sku: String,
    /// Distinct bookings listing the item.
    pub times_used: usize,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub regular_events: Vec<BookingSummary>,
    pub logistics_services: Vec<BookingSummary>,
    pub rentals: Vec<BookingSummary>,
    pub new_clients: Vec<ClientSummary>,
    pub new_client_count: usize,
    /// Most used first (total quantity, then name).
    pub item_usage: Vec<ItemUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub item: ItemId,
    pub name: String,
    pub sku: String,
    pub available: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub total_item_types: usize,
    pub total_quantity_owned: u64,
    pub total_assigned_today: u64,
    pub total_clients: usize,
    pub upcoming_events: Vec<BookingSummary>,
    pub upcoming_rentals: Vec<BookingSummary>,
    pub events_ending_soon: Vec<BookingSummary>,
    pub rentals_ending_soon: Vec<BookingSummary>,
    pub overdue_rentals: Vec<BookingSummary>,
    pub low_stock_items: Vec<LowStockItem>,
    pub recent_items: Vec<ItemId>,
    pub recent_clients: Vec<ClientId>,
}

pub struct ReportService<S> {
    store: S,
    offset: FixedOffset,
    low_stock_threshold: u32,
}

impl<S: Store> ReportService<S> {
    pub fn new(store: S, offset: FixedOffset, low_stock_threshold: u32) -> Self {
        Self {
            store,
            offset,
            low_stock_threshold,
        }
    }

    /// Bookings by start month, new clients by creation month, item usage.
    /// The project manager filter applies to the booking lists only.
    pub fn monthly_summary(&self, filter: MonthlyFilter) -> ServiceResult<MonthlySummary> {
        let offset = self.offset;
        Ok(self.store.read(|t| {
            let in_period = |instant: DateTime<Utc>| {
                let date = local_date(instant, offset);
                filter.year.is_none_or(|y| date.year() == y)
                    && filter.month.is_none_or(|m| date.month() == m)
            };
            let dated: Vec<&Booking> = sorted_by_start(t.bookings.values())
                .into_iter()
                .filter(|b| in_period(b.period().start()))
                .collect();
            let managed = |b: &&Booking| {
                filter
                    .project_manager
                    .is_none_or(|pm| b.project_manager() == Some(pm))
            };

            let regular_events = dated
                .iter()
                .copied()
                .filter(|b| b.booking_type() == BookingType::Event && !b.is_logistics_only())
                .filter(managed)
                .map(|b| summarize(t, b))
                .collect();
            let logistics_services = dated
                .iter()
                .copied()
                .filter(|b| b.is_logistics_only())
                .filter(managed)
                .map(|b| summarize(t, b))
                .collect();
            let rentals = dated
                .iter()
                .copied()
                .filter(|b| b.booking_type() == BookingType::Rental)
                .filter(managed)
                .map(|b| summarize(t, b))
                .collect();

            let mut new_clients: Vec<ClientSummary> = t
                .clients
                .values()
                .filter(|c| in_period(c.created_at()))
                .map(|c| ClientSummary {
                    id: c.id_typed(),
                    name: c.display_name(),
                    created_at: c.created_at(),
                })
                .collect();
            new_clients.sort_by_key(|c| c.created_at);

            MonthlySummary {
                regular_events,
                logistics_services,
                rentals,
                new_client_count: new_clients.len(),
                new_clients,
                item_usage: item_usage(t, &dated),
            }
        })?)
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> ServiceResult<Dashboard> {
        let offset = self.offset;
        let threshold = u64::from(self.low_stock_threshold);
        Ok(self.store.read(|t| {
            let today = local_date(now, offset);
            let week_out = today + Duration::days(UPCOMING_DAYS);
            let soon = today + Duration::days(ENDING_SOON_DAYS);
            let engine = AvailabilityEngine::new(t.bookings.values());
            let by_start = sorted_by_start(t.bookings.values());
            let mut by_end = by_start.clone();
            by_end.sort_by_key(|b| b.period().end());

            let start_within = |b: &Booking, to: NaiveDate| {
                let d = b.period().start_date(offset);
                today <= d && d <= to
            };
            let end_date = |b: &Booking| b.period().end_date(offset);
            let upcoming_events = pick(t, &by_start, UPCOMING_LIMIT, |b| {
                b.status() == BookingStatus::Event(EventStatus::Planned) && start_within(b, week_out)
            });
            let upcoming_rentals = pick(t, &by_start, UPCOMING_LIMIT, |b| {
                b.status() == BookingStatus::Rental(RentalStatus::Booked) && start_within(b, week_out)
            });
            let events_ending_soon = pick(t, &by_end, usize::MAX, |b| {
                b.status() == BookingStatus::Event(EventStatus::Active)
                    && (today..=soon).contains(&end_date(b))
            });
            let rentals_ending_soon = pick(t, &by_end, usize::MAX, |b| {
                matches!(
                    b.status(),
                    BookingStatus::Rental(RentalStatus::Out | RentalStatus::Booked)
                ) && b.period().end() >= now
                    && end_date(b) <= soon
            });
            let overdue_rentals = pick(t, &by_end, OVERDUE_LIMIT, |b| b.is_overdue(now));

            let mut stocked: Vec<&Item> = t.items.values().filter(|i| i.initial_quantity() > 0).collect();
            stocked.sort_by(|a, b| a.name().cmp(b.name()));
            let low_stock_items = stocked
                .into_iter()
                .map(|i| (i, engine.available_quantity(i, today, offset)))
                .filter(|(_, available)| *available <= threshold)
                .take(LOW_STOCK_LIMIT)
                .map(|(i, available)| LowStockItem {
                    item: i.id_typed(),
                    name: i.name().to_string(),
                    sku: i.sku().to_string(),
                    available,
                })
                .collect();

            let mut recent_items: Vec<&Item> = t.items.values().collect();
            recent_items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            let mut recent_clients: Vec<_> = t.clients.values().collect();
            recent_clients.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

            Dashboard {
                total_item_types: t.items.len(),
                total_quantity_owned: t.items.values().map(|i| u64::from(i.initial_quantity())).sum(),
                total_assigned_today: engine.total_assigned_on_date(today, offset),
                total_clients: t.clients.len(),
                upcoming_events,
                upcoming_rentals,
                events_ending_soon,
                rentals_ending_soon,
                overdue_rentals,
                low_stock_items,
                recent_items: recent_items.iter().take(RECENT_LIMIT).map(|i| i.id_typed()).collect(),
                recent_clients: recent_clients.iter().take(RECENT_LIMIT).map(|c| c.id_typed()).collect(),
            }
        })?)
    }
}

fn sorted_by_start<'a>(bookings: impl Iterator<Item = &'a Booking>) -> Vec<&'a Booking> {
    let mut sorted: Vec<&Booking> = bookings.collect();
    sorted.sort_by_key(|b| (b.period().start(), b.created_at()));
    sorted
}

fn pick(
    t: &Tables,
    bookings: &[&Booking],
    limit: usize,
    keep: impl Fn(&Booking) -> bool,
) -> Vec<BookingSummary> {
    bookings
        .iter()
        .copied()
        .filter(|b| keep(b))
        .take(limit)
        .map(|b| summarize(t, b))
        .collect()
}

fn summarize(t: &Tables, booking: &Booking) -> BookingSummary {
    BookingSummary {
        id: booking.id_typed(),
        reference: booking.reference().to_string(),
        title: booking.title(),
        client: t.client_label(booking.client()),
        project_manager: booking.project_manager_name().map(str::to_string),
        start: booking.period().start(),
        end: booking.period().end(),
        status: booking.status(),
    }
}

/// Usage across non-logistics events and rentals.
fn item_usage(t: &Tables, bookings: &[&Booking]) -> Vec<ItemUsage> {
    let mut usage: BTreeMap<ItemId, (BTreeSet<BookingId>, u64)> = BTreeMap::new();
    for booking in bookings.iter().filter(|b| !b.is_logistics_only()) {
        for line in booking.lines() {
            let entry = usage.entry(line.item).or_default();
            entry.0.insert(booking.id_typed());
            entry.1 += u64::from(line.quantity);
        }
    }

    let mut rows: Vec<ItemUsage> = usage
        .into_iter()
        .filter_map(|(id, (used_by, total))| {
            let item = t.items.get(&id)?;
            Some(ItemUsage {
                item: id,
                name: item.name().to_string(),
                sku: item.sku().to_string(),
                times_used: used_by.len(),
                total_quantity: total,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_quantity
            .cmp(&a.total_quantity)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::ServiceError;
    use crate::test_support::{Harness, at, event_draft, rental_draft};
    use eventstock_bookings::{BookingDraft, EventService, KindDraft, LogisticsDetails};

    fn with_event_status(mut draft: BookingDraft, status: EventStatus) -> BookingDraft {
        if let KindDraft::Event(e) = &mut draft.kind {
            e.status = Some(status);
        }
        draft
    }

    #[test]
    fn dashboard_collects_todays_work() {
        let h = Harness::new();
        let acme = h.client("Acme");
        let chairs = h.item("Chair", 10);
        let tables = h.item("Table", 2);

        let planned = h
            .bookings
            .create_booking(event_draft(acme, at(12, 9), at(13, 18), &[(chairs, 4)]))
            .unwrap();
        let running = h
            .bookings
            .create_booking(with_event_status(
                event_draft(acme, at(9, 9), at(11, 18), &[(chairs, 3)]),
                EventStatus::Active,
            ))
            .unwrap();
        let upcoming_rental = h
            .bookings
            .create_booking(rental_draft(acme, at(11, 9), at(20, 9), &[(tables, 2)]))
            .unwrap();
        let late = h
            .bookings
            .create_booking(rental_draft(acme, at(1, 9), at(5, 9), &[(chairs, 1)]))
            .unwrap();

        let dash = h.reports.dashboard(at(10, 12)).unwrap();

        assert_eq!(dash.total_item_types, 2);
        assert_eq!(dash.total_quantity_owned, 12);
        assert_eq!(dash.total_clients, 1);
        assert_eq!(dash.total_assigned_today, 3);

        let ids = |rows: &[BookingSummary]| rows.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&dash.upcoming_events), vec![planned.id_typed()]);
        assert_eq!(ids(&dash.upcoming_rentals), vec![upcoming_rental.id_typed()]);
        assert_eq!(ids(&dash.events_ending_soon), vec![running.id_typed()]);
        assert!(dash.rentals_ending_soon.is_empty());
        assert_eq!(ids(&dash.overdue_rentals), vec![late.id_typed()]);
        assert_eq!(dash.overdue_rentals[0].client, "Acme");

        let low: Vec<&str> = dash.low_stock_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(low, vec!["Table"]);
        assert_eq!(dash.low_stock_items[0].available, 2);
        assert_eq!(dash.recent_items.len(), 2);
    }

    #[test]
    fn dashboard_on_an_empty_store() {
        let h = Harness::new();
        let dash = h.reports.dashboard(at(10, 12)).unwrap();
        assert_eq!(dash.total_item_types, 0);
        assert_eq!(dash.total_assigned_today, 0);
        assert!(dash.low_stock_items.is_empty());
        assert!(dash.upcoming_events.is_empty());
    }

    #[test]
    fn missing_client_renders_as_unknown() {
        let h = Harness::new();
        let acme = h.client("Acme");
        let chairs = h.item("Chair", 10);
        h.bookings
            .create_booking(event_draft(acme, at(12, 9), at(13, 18), &[(chairs, 1)]))
            .unwrap();
        h.store
            .transaction(|t| {
                t.clients.remove(&acme);
                Ok::<_, ServiceError>(())
            })
            .unwrap();

        let dash = h.reports.dashboard(at(10, 12)).unwrap();
        assert_eq!(dash.upcoming_events[0].client, "Unknown client");
        let summary = h.reports.monthly_summary(MonthlyFilter::default()).unwrap();
        assert_eq!(summary.regular_events[0].client, "Unknown client");
    }

    #[test]
    fn monthly_summary_groups_by_start_month() {
        let h = Harness::new();
        let acme = h.client("Acme");
        let pm = h.user("sam", false);
        let chairs = h.item("Chair", 10);
        let tables = h.item("Table", 2);

        let mut managed = event_draft(acme, at(12, 9), at(13, 18), &[(chairs, 4)]);
        managed.project_manager = Some(pm);
        h.bookings.create_booking(managed).unwrap();

        let mut logistics = event_draft(acme, at(20, 9), at(20, 18), &[]);
        if let KindDraft::Event(e) = &mut logistics.kind {
            e.service = EventService::LogisticsOnly(LogisticsDetails::default());
        }
        h.bookings.create_booking(logistics).unwrap();

        h.bookings
            .create_booking(rental_draft(acme, at(14, 9), at(16, 9), &[(chairs, 2), (tables, 1)]))
            .unwrap();

        let july = Utc.with_ymd_and_hms(2025, 7, 3, 9, 0, 0).unwrap();
        h.bookings
            .create_booking(event_draft(acme, july, july + Duration::hours(8), &[(chairs, 5)]))
            .unwrap();

        let june = MonthlyFilter {
            year: Some(2025),
            month: Some(6),
            project_manager: None,
        };
        let summary = h.reports.monthly_summary(june).unwrap();
        assert_eq!(summary.regular_events.len(), 1);
        assert_eq!(summary.logistics_services.len(), 1);
        assert_eq!(summary.rentals.len(), 1);
        assert_eq!(summary.regular_events[0].project_manager.as_deref(), Some("Sam Reyes"));

        let usage: Vec<(&str, usize, u64)> = summary
            .item_usage
            .iter()
            .map(|u| (u.name.as_str(), u.times_used, u.total_quantity))
            .collect();
        assert_eq!(usage, vec![("Chair", 2, 6), ("Table", 1, 1)]);

        let by_pm = h
            .reports
            .monthly_summary(MonthlyFilter {
                project_manager: Some(pm),
                ..june
            })
            .unwrap();
        assert_eq!(by_pm.regular_events.len(), 1);
        assert!(by_pm.logistics_services.is_empty());
        assert!(by_pm.rentals.is_empty());
        assert_eq!(by_pm.item_usage, summary.item_usage);
    }

    #[test]
    fn new_clients_follow_creation_date() {
        let h = Harness::new();
        h.client("Acme");
        h.client("Globex");

        let all = h.reports.monthly_summary(MonthlyFilter::default()).unwrap();
        assert_eq!(all.new_client_count, 2);
        let mut names: Vec<&str> = all.new_clients.iter().map(|c| c.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Acme", "Globex"]);

        let long_ago = MonthlyFilter {
            year: Some(2001),
            ..MonthlyFilter::default()
        };
        assert_eq!(h.reports.monthly_summary(long_ago).unwrap().new_client_count, 0);
    }
}
