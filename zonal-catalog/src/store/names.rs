//! Proper-name directory.
//!
//! The host supplies a designation-to-name map at initialization; the
//! directory keeps only the entries carrying this catalog's designation
//! prefix and answers exact lookups during decoding.

use std::collections::HashMap;

use crate::query::designation::DESIGNATION_PREFIX;

/// Proper names keyed by canonical designation, e.g. `UCAC4 451-012345`.
#[derive(Debug, Default, Clone)]
pub struct NameDirectory {
    names: HashMap<String, String>,
}

impl NameDirectory {
    /// Build from a host-supplied map, keeping only this catalog's entries.
    pub fn from_host(source: &HashMap<String, String>) -> Self {
        let prefix = format!("{} ", DESIGNATION_PREFIX);
        let names = source
            .iter()
            .filter(|(designation, _)| designation.starts_with(&prefix))
            .map(|(d, n)| (d.clone(), n.clone()))
            .collect();
        Self { names }
    }

    pub fn get(&self, designation: &str) -> Option<&str> {
        self.names.get(designation).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
