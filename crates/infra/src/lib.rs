//! Infrastructure layer: entity store, application services, the status
//! sweep runner, reports and configuration.

pub mod config;
pub mod error;
pub mod reports;
pub mod scheduler;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use error::{Blocker, ConflictInfo, ServiceError, ServiceResult};
pub use reports::{Dashboard, MonthlyFilter, MonthlySummary, ReportService};
pub use scheduler::{StatusSweeper, SweepReport};
pub use services::{
    BookingService, CatalogService, CategoryView, NotificationFeed, NotificationService,
    QuoteService,
};
pub use store::{InMemoryStore, Store, StoreError, Tables, load_snapshot, save_snapshot};
