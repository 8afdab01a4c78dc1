//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products are identified by SKU and orders by order id; both keep that
/// identity for their whole lifetime while every other attribute may change.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
