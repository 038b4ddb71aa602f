//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// instances with the same values are interchangeable. `DateRange` is the
/// main example in this workspace: two bookings over the same window share an
/// equal range even though the bookings themselves are distinct entities.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
