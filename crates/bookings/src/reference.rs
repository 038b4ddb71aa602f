use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Human-facing booking reference, e.g. `BKG-20250314-3FA9C1`.
///
/// Assigned once at creation and never regenerated on edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    pub const BOOKING_PREFIX: &'static str = "BKG";
    pub const QUOTE_PREFIX: &'static str = "REQ";

    /// `{prefix}-{YYYYMMDD}-{6 upper-case hex chars}` using the creation date.
    pub fn generate(prefix: &str, now: DateTime<Utc>) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self(format!(
            "{prefix}-{}-{}",
            now.format("%Y%m%d"),
            token[..6].to_uppercase()
        ))
    }

    pub fn for_booking(now: DateTime<Utc>) -> Self {
        Self::generate(Self::BOOKING_PREFIX, now)
    }

    pub fn for_quote(now: DateTime<Utc>) -> Self {
        Self::generate(Self::QUOTE_PREFIX, now)
    }

    /// Draw from `next` until a reference that is not `taken` comes up.
    pub fn unique(mut next: impl FnMut() -> Self, taken: impl Fn(&Self) -> bool) -> Self {
        loop {
            let candidate = next();
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
