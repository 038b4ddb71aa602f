//! Status sweep runner.
//!
//! One [`StatusSweeper::run`] call applies the time-driven status rules to
//! every booking and records an in-app notification per status change and
//! per reminder. Everything happens in a single store transaction.
//!
//! The caller decides how often to run it (cron, systemd timer, ...). Runs
//! are not idempotent for reminders: a booking still due tomorrow is
//! reminded again on the next run.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use eventstock_bookings::{Booking, BookingStatus, BookingType, RentalStatus, SweepNotice, sweep};
use eventstock_core::{BookingId, NotificationId};
use eventstock_notifications::{Notification, RecipientResolver, booking_link};
use eventstock_staff::StaffUser;

use crate::config::AppConfig;
use crate::error::ServiceResult;
use crate::store::{Store, upsert};

/// Counters for one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub events_updated: usize,
    pub rentals_updated: usize,
    pub notifications_created: usize,
}

pub struct StatusSweeper<S, R> {
    store: S,
    resolver: R,
    site_url: Option<String>,
    offset: FixedOffset,
}

impl<S: Store, R: RecipientResolver> StatusSweeper<S, R> {
    pub fn new(store: S, resolver: R, site_url: Option<String>, offset: FixedOffset) -> Self {
        Self {
            store,
            resolver,
            site_url,
            offset,
        }
    }

    pub fn from_config(store: S, resolver: R, config: &AppConfig) -> Self {
        Self::new(store, resolver, config.site_url.clone(), config.offset())
    }

    pub fn run(&self, now: DateTime<Utc>) -> ServiceResult<SweepReport> {
        if self.site_url.is_none() {
            warn!("site_url is not configured; notification links will be relative");
        }

        let report = self.store.transaction(|t| {
            let mut bookings: Vec<Booking> = t.bookings.values().cloned().collect();
            let notices = sweep(&mut bookings, now, self.offset);

            let by_id: BTreeMap<BookingId, &Booking> =
                bookings.iter().map(|b| (b.id_typed(), b)).collect();
            let recipient = {
                let users: Vec<&StaffUser> = t.users.values().collect();
                self.resolver.resolve(&users)
            };

            let mut report = SweepReport::default();
            let mut created = Vec::with_capacity(notices.len());
            for notice in &notices {
                let Some(booking) = by_id.get(&notice.booking) else {
                    continue;
                };
                self.log_notice(notice, booking);
                if notice.change.is_some() {
                    match booking.booking_type() {
                        BookingType::Event => report.events_updated += 1,
                        BookingType::Rental => report.rentals_updated += 1,
                    }
                }
                let client = t.client_label(booking.client());
                created.push(Notification::new(
                    NotificationId::new(),
                    recipient,
                    notice.message(booking, &client, self.offset),
                    self.link_for(booking),
                    now,
                ));
            }

            for booking in bookings {
                if t.bookings.get(&booking.id_typed()) != Some(&booking) {
                    upsert(&mut t.bookings, booking);
                }
            }
            report.notifications_created = created.len();
            for notification in created {
                upsert(&mut t.notifications, notification);
            }
            Ok::<_, crate::error::ServiceError>(report)
        })?;

        info!(
            events_updated = report.events_updated,
            rentals_updated = report.rentals_updated,
            notifications_created = report.notifications_created,
            "status sweep finished"
        );
        Ok(report)
    }

    fn link_for(&self, booking: &Booking) -> Option<String> {
        let path = format!(
            "/bookings/{}/{}/",
            booking.booking_type().path_segment(),
            booking.id_typed()
        );
        match booking_link(self.site_url.as_deref(), &path) {
            Ok(link) => Some(link),
            Err(err) => {
                error!(reference = %booking.reference(), error = %err, "could not build notification link");
                None
            }
        }
    }

    fn log_notice(&self, notice: &SweepNotice, booking: &Booking) {
        let Some(change) = notice.change else {
            return;
        };
        if change.to == BookingStatus::Rental(RentalStatus::Overdue) {
            warn!(
                booking_id = %booking.id_typed(),
                reference = %booking.reference(),
                from = %change.from,
                to = %change.to,
                "rental overdue"
            );
        } else {
            info!(
                booking_id = %booking.id_typed(),
                reference = %booking.reference(),
                from = %change.from,
                to = %change.to,
                "booking status advanced"
            );
        }
    }
}
