/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Node label synthesis from property data.
//!
//! A node's label is either its base label, or, when its type has display
//! properties configured, one `key: value` line per configured property.

use std::collections::{BTreeMap, HashMap};

use super::PropertyValue;

/// Default number of characters kept from a property value before truncation.
pub const DEFAULT_VALUE_LIMIT: usize = 40;

const ELLIPSIS: &str = "...";

/// Per-type ordered property keys to surface in node labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    by_type: HashMap<String, Vec<String>>,
    value_limit: usize,
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self::with_value_limit(DEFAULT_VALUE_LIMIT)
    }

    pub fn with_value_limit(value_limit: usize) -> Self {
        Self {
            by_type: HashMap::new(),
            value_limit,
        }
    }

    /// Configure `keys` for `node_type`. An empty list removes the entry so
    /// nodes of that type fall back to their base label.
    pub fn set(&mut self, node_type: &str, keys: Vec<String>) {
        if keys.is_empty() {
            self.by_type.remove(node_type);
        } else {
            self.by_type.insert(node_type.to_string(), keys);
        }
    }

    pub fn keys_for(&self, node_type: &str) -> Option<&[String]> {
        self.by_type.get(node_type).map(Vec::as_slice)
    }

    pub fn set_value_limit(&mut self, value_limit: usize) {
        self.value_limit = value_limit;
    }

    pub fn value_limit(&self) -> usize {
        self.value_limit
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the display label of a node.
pub fn synthesize(
    node_type: &str,
    properties: &BTreeMap<String, PropertyValue>,
    fallback_label: &str,
    display_config: &DisplayConfig,
) -> String {
    let Some(keys) = display_config.keys_for(node_type) else {
        return fallback_label.to_string();
    };

    keys.iter()
        .map(|key| {
            let value = properties
                .get(key)
                .map(|property| property.label.as_str())
                .unwrap_or_default();
            format!(
                "{key}: {}",
                truncate_with_ellipsis(value, display_config.value_limit)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep the first `limit` characters of `text`, marking a cut with `...`.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}{ELLIPSIS}", &text[..byte_index]),
        None => text.to_string(),
    }
}
