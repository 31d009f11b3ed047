//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared entirely by their attribute
/// values — two customizations with the same spice flag and sauce intensity
/// are interchangeable. To "modify" one, create a new value.
///
/// The supertraits keep value objects cheap to copy, comparable by value,
/// and debuggable in assertions and logs.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
