//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identifier of its own; two instances holding the same
/// attributes are interchangeable. Instances are never modified in place: a
/// different value is a new instance.
///
/// `Money` and a shipping address are the typical examples. An order item, by
/// contrast, is an [`Entity`](crate::Entity): two items with identical product,
/// quantity and price are still different lines.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Dimensions { width_mm: u32, height_mm: u32 }
///
/// impl ValueObject for Dimensions {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
