//! YAML catalog parsing.
//!
//! The default catalog is compiled into the binary from
//! `data/catalog.yaml`. Items whose `kind` is not a known grant kind are
//! logged at `error` and left out; every other malformed entry fails the
//! whole parse.

use std::collections::BTreeMap;

use rando_types::{Catalog, GrantKind, ItemDef, ItemId, LocationDef, StartDef};
use serde::Deserialize;
use tracing::{error, info, warn};

/// The catalog shipped with the crate.
pub const DEFAULT_CATALOG: &str = include_str!("../data/catalog.yaml");

/// Errors that can occur when building the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The document is not valid YAML or has the wrong shape.
    #[error("failed to parse catalog YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// One item entry is malformed.
    #[error("malformed catalog item #{index}: {source}")]
    Item {
        /// Position of the entry in `items`.
        index: usize,
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The background parse task panicked or was cancelled.
    #[error("catalog parse task failed: {message}")]
    Join {
        /// Description of the join failure.
        message: String,
    },
}

/// Raw document shape. Items stay untyped until their kind is checked.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    items: Vec<serde_yml::Value>,
    #[serde(default)]
    locations: Vec<LocationDef>,
    #[serde(default)]
    starts: Vec<StartDef>,
    #[serde(default)]
    additive_families: BTreeMap<String, Vec<ItemId>>,
}

/// Parse a catalog document.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, CatalogError> {
    let raw: RawCatalog = serde_yml::from_str(yaml)?;

    let mut items = Vec::with_capacity(raw.items.len());
    for (index, value) in raw.items.into_iter().enumerate() {
        let kind_name = value.get("kind").and_then(serde_yml::Value::as_str).unwrap_or_default();
        if let Err(e) = kind_name.parse::<GrantKind>() {
            let name = value.get("name").and_then(serde_yml::Value::as_str).unwrap_or("?");
            error!(item = name, error = %e, "Skipping catalog item");
            continue;
        }
        let def: ItemDef = serde_yml::from_value(value).map_err(|source| CatalogError::Item { index, source })?;
        items.push(def);
    }

    let catalog = Catalog::new(items, raw.locations, raw.starts, raw.additive_families);
    check_references(&catalog);
    info!(
        items = catalog.item_count(),
        locations = catalog.locations().count(),
        starts = catalog.starts().count(),
        "Catalog parsed"
    );
    Ok(catalog)
}

/// Warn about locations whose vanilla item is not in the catalog.
fn check_references(catalog: &Catalog) {
    for location in catalog.locations() {
        if catalog.item(&location.vanilla_item).is_none() {
            warn!(
                location = %location.name,
                item = %location.vanilla_item,
                "Location refers to an unknown item"
            );
        }
    }
}
