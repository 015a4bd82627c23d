//! Entity trait: identity that outlives attribute values.

/// Entity marker + minimal interface.
///
/// Entities living inside an aggregate (order items, lines) are reached only
/// through their root, but keep their own identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
