//! Error types for the `rando-grant` crate.

use rando_types::ItemId;

/// Errors raised while dispatching a grant effect.
///
/// The bookkeeping shared by every grant (tracker entry, save flag) has
/// already happened when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrantError {
    /// The effect needs the item definition but the catalog has none.
    #[error("item not in catalog: {0}")]
    UnknownItem(ItemId),

    /// The item definition lacks a field the effect reads.
    #[error("item {item} has no {field}")]
    MissingField {
        /// The granted item.
        item: ItemId,
        /// The missing definition field.
        field: &'static str,
    },

    /// An additive grant for an item outside every additive family.
    #[error("item {0} is not in an additive family")]
    NotInFamily(ItemId),
}
