//! Alias table: known alternate spellings and historical names of districts.
//!
//! The table maps a normalized variant name (as it appears in rainfall
//! datasets) to one or more canonical names (as they appear in the boundary
//! dataset). A variant with more than one target describes a district that
//! was later split; the reconciler flags those instead of apportioning.
//!
//! The table is built once at startup (built-in defaults, optionally
//! extended from the config file) and passed by reference into the
//! reconciler. It is never mutated during a run.

use super::normalize::normalize_name;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// Built-in aliases
// ---------------------------------------------------------------------------

/// Renames and splits known to differ between IMD district rainfall tables
/// and the Survey of India district boundaries for Maharashtra and Goa.
///
/// Left side: name used by the rainfall data. Right side: boundary name(s).
pub static DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("Ahilyanagar", &["Ahmadnagar"]),
    ("Chhatrapati Sambhaji Nagar", &["Aurangabad"]),
    ("Chatrapati Sambhaji Nagar", &["Aurangabad"]), // common misspelling in IMD sheets
    ("Dharashiv", &["Osmanabad"]),
    ("Raigad", &["Raigarh"]),
    ("Sholapur", &["Solapur"]),
    ("Beed", &["Bid"]),
    // Rainfall tables report "Goa" and "South Goa"; the boundaries carry
    // "North Goa" and "South Goa".
    ("Goa", &["North Goa"]),
    // Reported as a single figure for the whole island.
    ("Mumbai", &["Mumbai City", "Mumbai Suburban"]),
];

// ---------------------------------------------------------------------------
// Config representation
// ---------------------------------------------------------------------------

/// Right-hand side of an alias entry in TOML: a single canonical name or a
/// list of them.
///
/// ```toml
/// [aliases.entries]
/// "Ahilyanagar" = "Ahmadnagar"
/// "Mumbai" = ["Mumbai City", "Mumbai Suburban"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AliasTarget {
    One(String),
    Many(Vec<String>),
}

impl AliasTarget {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AliasTarget::One(name) => vec![name],
            AliasTarget::Many(names) => names,
        }
    }
}

// ---------------------------------------------------------------------------
// Alias table
// ---------------------------------------------------------------------------

/// An alias entry whose canonical target(s) do not exist in the boundary
/// dataset. Usually means the boundary file was updated and the alias is no
/// longer needed, or the target is misspelled.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StaleAlias {
    pub variant: String,
    pub missing_targets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    /// normalized variant -> canonical names as written by the maintainer
    entries: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// An empty table: only direct matches will succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table from [`DEFAULT_ALIASES`].
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for (variant, targets) in DEFAULT_ALIASES {
            table.insert(variant, targets.iter().map(|t| t.to_string()).collect());
        }
        table
    }

    /// Adds or replaces an alias. The variant is normalized on insertion;
    /// empty target lists are ignored.
    pub fn insert(&mut self, variant: &str, targets: Vec<String>) {
        let key = normalize_name(variant);
        if key.is_empty() || targets.is_empty() {
            return;
        }
        self.entries.insert(key, targets);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_alias(mut self, variant: &str, targets: &[&str]) -> Self {
        self.insert(variant, targets.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Merges config-file entries over this table. Later entries win.
    pub fn extend_from(&mut self, entries: BTreeMap<String, AliasTarget>) {
        for (variant, target) in entries {
            self.insert(&variant, target.into_vec());
        }
    }

    /// Canonical names for an already-normalized variant.
    pub fn lookup(&self, normalized_variant: &str) -> Option<&[String]> {
        self.entries.get(normalized_variant).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Entries with at least one target whose normalized form is not in
    /// `known_canonical` (a set of normalized boundary names).
    pub fn stale_entries(&self, known_canonical: &HashSet<String>) -> Vec<StaleAlias> {
        self.iter()
            .filter_map(|(variant, targets)| {
                let missing: Vec<String> = targets
                    .iter()
                    .filter(|t| !known_canonical.contains(&normalize_name(t)))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    None
                } else {
                    Some(StaleAlias {
                        variant: variant.to_string(),
                        missing_targets: missing,
                    })
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
