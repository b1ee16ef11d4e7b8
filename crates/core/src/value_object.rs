//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; identity
/// doesn't matter. `EmailAddress` is a value object, `User` is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
