//! Error types for pre-placement sampling.

/// Errors raised while sampling the pre-placement state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplerError {
    /// A loadout tier that must contribute at least one item had no
    /// candidates in the catalog.
    #[error("no candidates left for loadout tier {tier}")]
    EmptyPool {
        /// Tier name.
        tier: &'static str,
    },

    /// Start randomization is on but no start passes the safety filter.
    #[error("no starting location is safe for the current settings")]
    NoSafeStart,

    /// Neither the configured start nor the fallback exists in the catalog.
    #[error("starting location not in catalog: {0}")]
    UnknownStart(String),
}
