//! `eventstock-staff`: the staff user directory.
//!
//! Authentication is handled elsewhere; this crate only models the user
//! records the booking core refers to (project managers, notification
//! recipients).

pub mod user;

pub use user::{StaffUser, UserDetails, UserStatus};
