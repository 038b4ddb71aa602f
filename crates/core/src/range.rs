//! Closed date-time ranges and calendar-day helpers.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A closed interval `[start, end]` of instants.
///
/// # Invariants
/// - `end >= start` (enforced by every constructor, including deserialization).
/// - Both boundaries are inclusive: a range ending at instant `t` overlaps a
///   range starting at `t`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DomainError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl ValueObject for DateRange {}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::validation(
                "End date cannot be before the start date.",
            ));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar day `date` in the business time zone, from
    /// 00:00:00 to 23:59:59.999999 local time.
    pub fn calendar_day(date: NaiveDate, offset: FixedOffset) -> Self {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let start = Utc.from_utc_datetime(
            &(local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))),
        );
        let end = start + Duration::days(1) - Duration::microseconds(1);
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Closed-interval overlap: `self.end >= other.start && self.start <= other.end`.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.end >= other.start && self.start <= other.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Whether the range ended strictly before `instant`.
    pub fn ended_before(&self, instant: DateTime<Utc>) -> bool {
        self.end < instant
    }

    pub fn start_date(&self, offset: FixedOffset) -> NaiveDate {
        local_date(self.start, offset)
    }

    pub fn end_date(&self, offset: FixedOffset) -> NaiveDate {
        local_date(self.end, offset)
    }
}

/// Calendar date of `instant` in the business time zone.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}
