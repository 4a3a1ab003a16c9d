//! District-name reconciliation.
//!
//! Matches free-text rainfall records to boundary features:
//!
//!   normalize → direct match → alias match → unresolved
//!
//! Every in-scope boundary feature comes out as exactly one
//! [`ResolvedDistrict`], with or without a rainfall value. Problems with
//! individual records never abort the run; they are collected into
//! [`Diagnostics`] so the alias table can be corrected. Only an empty
//! boundary set or an empty month is fatal.
//!
//! Submodules:
//! - `normalize`: name normalization.
//! - `aliases`: the alias table and its built-in entries.

pub mod aliases;
pub mod normalize;

pub use aliases::{AliasTable, AliasTarget, StaleAlias};
pub use normalize::normalize_name;

use crate::classify::{self, Category};
use crate::logging::{self, Stage};
use crate::model::{BoundaryFeature, FatalInputError, FeatureId, Month, RainfallRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One boundary feature after reconciliation.
///
/// `rainfall_mm` is `None` when no record matched, or when the value was
/// withheld because of a collision or a split-district alias.
/// `geometry` is the feature's own polygon, carried through for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDistrict {
    pub feature_id: FeatureId,
    pub canonical_name: String,
    pub state: String,
    pub rainfall_mm: Option<f64>,
    #[serde(skip)]
    pub geometry: serde_json::Value,
}

impl ResolvedDistrict {
    pub fn has_data(&self) -> bool {
        self.rainfall_mm.is_some()
    }

    pub fn category(&self) -> Category {
        classify::classify(self.rainfall_mm)
    }

    pub fn color(&self) -> &'static str {
        classify::color_for(self.category())
    }

    /// Label for tooltips: distinguishes "No data" from a value that is
    /// simply below the Moderate threshold.
    pub fn display_label(&self) -> &'static str {
        match (self.rainfall_mm, self.category()) {
            (None, _) => "No data",
            (Some(_), Category::Unclassified) => "Below threshold",
            (Some(_), category) => category.label(),
        }
    }
}

/// A record whose name matched nothing, directly or through an alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedName {
    /// Name exactly as it appeared in the rainfall data.
    pub district_name: String,
    pub normalized: String,
    pub rainfall_mm: f64,
    /// Set when an alias existed but pointed at names absent from the
    /// boundary dataset.
    pub note: Option<String>,
}

/// A record that maps onto more than one boundary feature. The value is not
/// apportioned; none of the candidate features receive it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousSplit {
    pub district_name: String,
    pub rainfall_mm: f64,
    pub candidates: Vec<String>,
    pub feature_ids: Vec<FeatureId>,
}

/// A record dropped because its value is negative or not a finite number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutOfRange {
    pub district_name: String,
    pub rainfall_mm: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub district_name: String,
    pub rainfall_mm: f64,
}

/// Two or more records resolved to the same feature. The feature's value is
/// withheld rather than overwritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collision {
    pub feature_id: FeatureId,
    pub canonical_name: String,
    pub contributors: Vec<Contribution>,
}

/// A feature left without a rainfall value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoData {
    pub feature_id: FeatureId,
    pub canonical_name: String,
    pub state: String,
}

/// Everything that went wrong short of a fatal error.
///
/// `unresolved` (name mismatch) and `no_data` (feature without a value) are
/// separate on purpose: a feature can lack data simply because the rainfall
/// table has no row for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub unresolved: Vec<UnresolvedName>,
    pub ambiguous: Vec<AmbiguousSplit>,
    pub out_of_range: Vec<OutOfRange>,
    pub collisions: Vec<Collision>,
    pub no_data: Vec<NoData>,
    pub stale_aliases: Vec<StaleAlias>,
    /// Records skipped because they belong to a different month.
    pub other_month_records: usize,
}

impl Diagnostics {
    /// True when every record matched exactly one feature and every feature
    /// got a value.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
            && self.ambiguous.is_empty()
            && self.out_of_range.is_empty()
            && self.collisions.is_empty()
            && self.no_data.is_empty()
    }

    /// Number of record-level warnings (unresolved, ambiguous, out of range,
    /// collisions).
    pub fn warning_count(&self) -> usize {
        self.unresolved.len() + self.ambiguous.len() + self.out_of_range.len() + self.collisions.len()
    }
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub month: Month,
    /// One entry per in-scope boundary feature, in boundary order.
    pub districts: Vec<ResolvedDistrict>,
    pub diagnostics: Diagnostics,
}

impl Reconciliation {
    /// The strict numeric mapping: only features with a value.
    pub fn values(&self) -> BTreeMap<FeatureId, f64> {
        self.districts
            .iter()
            .filter_map(|d| d.rainfall_mm.map(|mm| (d.feature_id.clone(), mm)))
            .collect()
    }

    pub fn get(&self, feature_id: &str) -> Option<&ResolvedDistrict> {
        self.districts.iter().find(|d| d.feature_id.as_str() == feature_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ResolvedDistrict> {
        let wanted = normalize_name(name);
        self.districts
            .iter()
            .find(|d| normalize_name(&d.canonical_name) == wanted)
    }

    /// Count of districts per category, lowest category first.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&c| (c, self.districts.iter().filter(|d| d.category() == c).count()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving one record name against the boundary index.
#[derive(Debug, Clone, PartialEq)]
pub enum NameMatch {
    /// Normalized name equals a canonical name.
    Direct(usize),
    /// Alias table led to exactly one feature.
    Alias(usize),
    /// Several features are plausible; no value can be assigned.
    Ambiguous {
        candidates: Vec<String>,
        indices: Vec<usize>,
    },
    Unresolved {
        note: Option<String>,
    },
}

/// Normalized canonical name -> indices of boundary features carrying it.
pub type CanonicalIndex = HashMap<String, Vec<usize>>;

pub fn build_index(features: &[&BoundaryFeature]) -> CanonicalIndex {
    let mut index: CanonicalIndex = HashMap::new();
    for (i, feature) in features.iter().enumerate() {
        index
            .entry(normalize_name(&feature.canonical_name))
            .or_default()
            .push(i);
    }
    index
}

/// Resolves one normalized record name. Pure: no logging, no state.
pub fn resolve_name(normalized: &str, index: &CanonicalIndex, aliases: &AliasTable) -> NameMatch {
    // Direct match.
    if let Some(hits) = index.get(normalized) {
        return match hits.as_slice() {
            [only] => NameMatch::Direct(*only),
            _ => NameMatch::Ambiguous {
                candidates: vec![normalized.to_string(); hits.len()],
                indices: hits.clone(),
            },
        };
    }

    // Alias match.
    let Some(targets) = aliases.lookup(normalized) else {
        return NameMatch::Unresolved { note: None };
    };

    let mut indices = Vec::new();
    let mut missing = Vec::new();
    for target in targets {
        match index.get(&normalize_name(target)) {
            Some(hits) => indices.extend(hits.iter().copied()),
            None => missing.push(target.as_str()),
        }
    }

    if indices.is_empty() {
        return NameMatch::Unresolved {
            note: Some(format!(
                "alias target(s) not in boundary dataset: {}",
                missing.join(", ")
            )),
        };
    }

    if targets.len() == 1 && indices.len() == 1 {
        NameMatch::Alias(indices[0])
    } else {
        NameMatch::Ambiguous {
            candidates: targets.to_vec(),
            indices,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Matches rainfall records to boundary features for a set of states.
///
/// Holds only borrowed, immutable configuration; one instance can reconcile
/// any number of months.
pub struct Reconciler<'a> {
    aliases: &'a AliasTable,
    /// Normalized state names in scope. Empty means every feature is in scope.
    states: Vec<String>,
    state_labels: Vec<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(aliases: &'a AliasTable, states: &[String]) -> Self {
        Reconciler {
            aliases,
            states: states.iter().map(|s| normalize_name(s)).collect(),
            state_labels: states.to_vec(),
        }
    }

    fn in_scope(&self, feature: &BoundaryFeature) -> bool {
        self.states.is_empty() || self.states.contains(&normalize_name(&feature.state))
    }

    /// Reconciles `records` for `month` against `features`.
    ///
    /// Fails only when no feature lies in the configured states or when no
    /// record belongs to `month`.
    pub fn reconcile(
        &self,
        features: &[BoundaryFeature],
        records: &[RainfallRecord],
        month: Month,
    ) -> Result<Reconciliation, FatalInputError> {
        let scoped: Vec<&BoundaryFeature> = features.iter().filter(|f| self.in_scope(f)).collect();
        if scoped.is_empty() {
            return Err(FatalInputError::EmptyBoundaries {
                states: self.state_labels.clone(),
            });
        }

        let (monthly, other): (Vec<&RainfallRecord>, Vec<&RainfallRecord>) =
            records.iter().partition(|r| r.month == month);
        if monthly.is_empty() {
            return Err(FatalInputError::EmptyRainfall { month });
        }

        let mut diagnostics = Diagnostics {
            other_month_records: other.len(),
            ..Diagnostics::default()
        };
        if !other.is_empty() {
            logging::debug(
                Stage::Reconcile,
                None,
                &format!("Skipped {} record(s) not in {}", other.len(), month),
            );
        }

        let index = build_index(&scoped);
        let mut assigned: Vec<Vec<Contribution>> = vec![Vec::new(); scoped.len()];

        for record in monthly {
            if let Some(reason) = out_of_range_reason(record.rainfall_mm) {
                logging::warn(
                    Stage::Reconcile,
                    Some(&record.district_name),
                    &format!("Dropped record: {}", reason),
                );
                diagnostics.out_of_range.push(OutOfRange {
                    district_name: record.district_name.clone(),
                    rainfall_mm: record.rainfall_mm,
                    reason,
                });
                continue;
            }

            let normalized = normalize_name(&record.district_name);
            match resolve_name(&normalized, &index, self.aliases) {
                NameMatch::Direct(i) | NameMatch::Alias(i) => {
                    assigned[i].push(Contribution {
                        district_name: record.district_name.clone(),
                        rainfall_mm: record.rainfall_mm,
                    });
                }
                NameMatch::Ambiguous { candidates, indices } => {
                    logging::warn(
                        Stage::Reconcile,
                        Some(&record.district_name),
                        &format!(
                            "Maps to {} districts ({}); value withheld",
                            indices.len(),
                            candidates.join(", ")
                        ),
                    );
                    diagnostics.ambiguous.push(AmbiguousSplit {
                        district_name: record.district_name.clone(),
                        rainfall_mm: record.rainfall_mm,
                        candidates,
                        feature_ids: indices.iter().map(|&i| scoped[i].feature_id.clone()).collect(),
                    });
                }
                NameMatch::Unresolved { note } => {
                    logging::warn(
                        Stage::Reconcile,
                        Some(&record.district_name),
                        note.as_deref().unwrap_or("No matching boundary feature"),
                    );
                    diagnostics.unresolved.push(UnresolvedName {
                        district_name: record.district_name.clone(),
                        normalized,
                        rainfall_mm: record.rainfall_mm,
                        note,
                    });
                }
            }
        }

        let mut districts = Vec::with_capacity(scoped.len());
        for (feature, contributions) in scoped.iter().zip(assigned) {
            let rainfall_mm = match contributions.as_slice() {
                [] => None,
                [single] => Some(single.rainfall_mm),
                _ => {
                    logging::warn(
                        Stage::Reconcile,
                        Some(&feature.canonical_name),
                        &format!("{} records resolve here; value withheld", contributions.len()),
                    );
                    diagnostics.collisions.push(Collision {
                        feature_id: feature.feature_id.clone(),
                        canonical_name: feature.canonical_name.clone(),
                        contributors: contributions,
                    });
                    None
                }
            };

            if rainfall_mm.is_none() {
                diagnostics.no_data.push(NoData {
                    feature_id: feature.feature_id.clone(),
                    canonical_name: feature.canonical_name.clone(),
                    state: feature.state.clone(),
                });
            }

            districts.push(ResolvedDistrict {
                feature_id: feature.feature_id.clone(),
                canonical_name: feature.canonical_name.clone(),
                state: feature.state.clone(),
                rainfall_mm,
                geometry: feature.geometry.clone(),
            });
        }

        let known: HashSet<String> = index.keys().cloned().collect();
        diagnostics.stale_aliases = self.aliases.stale_entries(&known);

        Ok(Reconciliation {
            month,
            districts,
            diagnostics,
        })
    }
}

fn out_of_range_reason(rainfall_mm: f64) -> Option<String> {
    if !rainfall_mm.is_finite() {
        Some("rainfall value is not a finite number".to_string())
    } else if rainfall_mm < 0.0 {
        Some(format!("negative rainfall value {} mm", rainfall_mm))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn june() -> Month {
        Month::new(2025, 6).unwrap()
    }

    fn feature(id: &str, name: &str) -> BoundaryFeature {
        BoundaryFeature::new(id, name, "Maharashtra")
    }

    fn record(name: &str, mm: f64) -> RainfallRecord {
        RainfallRecord::new(name, mm, june())
    }

    fn states() -> Vec<String> {
        vec!["Maharashtra".to_string(), "Goa".to_string()]
    }

    // --- Completeness -------------------------------------------------------

    #[test]
    fn test_one_resolved_district_per_feature() {
        let aliases = AliasTable::defaults();
        let features = vec![feature("m/1", "Pune"), feature("m/2", "Thane"), feature("m/3", "Bid")];
        let records = vec![record("PUNE", 80.0), record("Unknownpur", 10.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .expect("reconcile should succeed");

        assert_eq!(out.districts.len(), features.len());
        for f in &features {
            assert_eq!(
                out.districts.iter().filter(|d| d.feature_id == f.feature_id).count(),
                1,
                "feature '{}' should appear exactly once",
                f.feature_id
            );
        }
    }

    #[test]
    fn test_scenario_no_record_is_not_a_name_mismatch() {
        let aliases = AliasTable::new();
        let features = vec![feature("a", "A"), feature("b", "B")];
        let records = vec![record("A", 80.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();

        let a = out.get("a").unwrap();
        assert_eq!(a.category(), Category::Heavy);
        let b = out.get("b").unwrap();
        assert_eq!(b.rainfall_mm, None);
        assert_eq!(b.category(), Category::Unclassified);
        assert_eq!(b.display_label(), "No data");

        assert!(out.diagnostics.unresolved.is_empty());
        assert_eq!(out.diagnostics.no_data.len(), 1);
        assert_eq!(out.diagnostics.no_data[0].feature_id.as_str(), "b");
    }

    // --- Matching -----------------------------------------------------------

    #[test]
    fn test_direct_match_ignores_case_and_spacing() {
        let aliases = AliasTable::new();
        let features = vec![feature("m/1", "Mumbai Suburban")];
        let records = vec![record("  MUMBAI   SUBURBAN ", 300.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.values().get(&FeatureId::new("m/1")), Some(&300.0));
    }

    #[test]
    fn test_mumbai_city_needs_an_alias_to_match_the_district_suffix() {
        let features = vec![feature("m/1", "Mumbai City District")];
        let records = vec![record("Mumbai City", 250.0)];

        let without = AliasTable::new();
        let out = Reconciler::new(&without, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.diagnostics.unresolved.len(), 1);
        assert_eq!(out.diagnostics.unresolved[0].district_name, "Mumbai City");
        assert!(out.values().is_empty());

        let with = AliasTable::new().with_alias("Mumbai City", &["Mumbai City District"]);
        let out = Reconciler::new(&with, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert!(out.diagnostics.unresolved.is_empty());
        assert_eq!(out.get("m/1").and_then(|d| d.rainfall_mm), Some(250.0));
    }

    #[test]
    fn test_renamed_district_resolves_through_default_alias() {
        let aliases = AliasTable::defaults();
        let features = vec![feature("m/1", "Ahmadnagar"), feature("m/2", "Aurangabad")];
        let records = vec![
            record("AHILYANAGAR", 70.0),
            record("CHHATRAPATI SAMBHAJI NAGAR", 120.0),
        ];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.get("m/1").unwrap().category(), Category::Heavy);
        assert_eq!(out.get("m/2").unwrap().category(), Category::VeryHeavy);
        assert!(out.diagnostics.unresolved.is_empty());
    }

    #[test]
    fn test_direct_match_takes_priority_over_alias() {
        // "Raigad" is an alias for "Raigarh", but a boundary file that
        // already uses "Raigad" must match directly.
        let aliases = AliasTable::defaults();
        let features = vec![feature("m/1", "Raigad")];
        let records = vec![record("RAIGAD", 90.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.get("m/1").and_then(|d| d.rainfall_mm), Some(90.0));
    }

    #[test]
    fn test_split_district_is_flagged_and_withheld() {
        let aliases = AliasTable::defaults();
        let features = vec![feature("m/1", "Mumbai City"), feature("m/2", "Mumbai Suburban")];
        let records = vec![record("MUMBAI", 500.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();

        assert!(out.values().is_empty(), "split value must not be apportioned");
        assert_eq!(out.diagnostics.ambiguous.len(), 1);
        let split = &out.diagnostics.ambiguous[0];
        assert_eq!(split.district_name, "MUMBAI");
        assert_eq!(split.rainfall_mm, 500.0);
        assert_eq!(split.feature_ids.len(), 2);
        assert!(out.diagnostics.unresolved.is_empty());
    }

    #[test]
    fn test_alias_to_missing_target_is_unresolved_with_note() {
        let aliases = AliasTable::new().with_alias("Poona", &["Pune"]);
        let features = vec![feature("m/1", "Thane")];
        let records = vec![record("Poona", 40.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.diagnostics.unresolved.len(), 1);
        let note = out.diagnostics.unresolved[0].note.as_deref().unwrap_or("");
        assert!(note.contains("Pune"), "note should name the missing target, got '{}'", note);
        assert_eq!(out.diagnostics.stale_aliases.len(), 1);
    }

    // --- Collisions ---------------------------------------------------------

    #[test]
    fn test_two_records_on_one_feature_are_reported_not_overwritten() {
        let aliases = AliasTable::defaults();
        let features = vec![feature("m/1", "Bid")];
        let records = vec![record("Bid", 60.0), record("Beed", 70.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();

        assert_eq!(out.get("m/1").and_then(|d| d.rainfall_mm), None);
        assert_eq!(out.diagnostics.collisions.len(), 1);
        let names: Vec<_> = out.diagnostics.collisions[0]
            .contributors
            .iter()
            .map(|c| c.district_name.as_str())
            .collect();
        assert_eq!(names, vec!["Bid", "Beed"]);
    }

    // --- Out of range -------------------------------------------------------

    #[test]
    fn test_negative_value_is_dropped_into_diagnostics() {
        let aliases = AliasTable::new();
        let features = vec![feature("m/1", "Pune")];
        let records = vec![record("Pune", -5.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();

        assert!(out.values().is_empty());
        assert_eq!(out.get("m/1").unwrap().category(), Category::Unclassified);
        assert_eq!(out.diagnostics.out_of_range.len(), 1);
        assert_eq!(out.diagnostics.out_of_range[0].rainfall_mm, -5.0);
        assert!(out.diagnostics.unresolved.is_empty());
    }

    #[test]
    fn test_non_finite_value_is_dropped_into_diagnostics() {
        let aliases = AliasTable::new();
        let features = vec![feature("m/1", "Pune")];
        let records = vec![record("Pune", f64::NAN)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.diagnostics.out_of_range.len(), 1);
        assert!(out.diagnostics.out_of_range[0].reason.contains("finite"));
    }

    // --- Fatal inputs -------------------------------------------------------

    #[test]
    fn test_empty_month_is_fatal() {
        let aliases = AliasTable::new();
        let features = vec![feature("m/1", "Pune")];
        let july = Month::new(2025, 7).unwrap();
        let records = vec![RainfallRecord::new("Pune", 10.0, july)];

        let result = Reconciler::new(&aliases, &states()).reconcile(&features, &records, june());
        assert_eq!(result, Err(FatalInputError::EmptyRainfall { month: june() }));

        let result = Reconciler::new(&aliases, &states()).reconcile(&features, &[], june());
        assert!(matches!(result, Err(FatalInputError::EmptyRainfall { .. })));
    }

    #[test]
    fn test_empty_boundaries_is_fatal() {
        let aliases = AliasTable::new();
        let records = vec![record("Pune", 10.0)];
        let result = Reconciler::new(&aliases, &states()).reconcile(&[], &records, june());
        assert!(matches!(result, Err(FatalInputError::EmptyBoundaries { .. })));
    }

    #[test]
    fn test_features_outside_configured_states_are_out_of_scope() {
        let aliases = AliasTable::new();
        let features = vec![
            feature("m/1", "Pune"),
            BoundaryFeature::new("k/1", "Belgaum", "Karnataka"),
        ];
        let records = vec![record("Pune", 30.0)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.districts.len(), 1);
        assert!(out.get("k/1").is_none());

        let only_karnataka = Reconciler::new(&aliases, &["Goa".to_string()])
            .reconcile(&features[1..], &records, june());
        assert!(matches!(only_karnataka, Err(FatalInputError::EmptyBoundaries { .. })));
    }

    #[test]
    fn test_other_month_records_are_counted_not_matched() {
        let aliases = AliasTable::new();
        let features = vec![feature("m/1", "Pune")];
        let july = Month::new(2025, 7).unwrap();
        let records = vec![record("Pune", 30.0), RainfallRecord::new("Pune", 99.0, july)];

        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        assert_eq!(out.diagnostics.other_month_records, 1);
        assert!(out.diagnostics.collisions.is_empty());
        assert_eq!(out.get("m/1").and_then(|d| d.rainfall_mm), Some(30.0));
    }

    // --- Pure resolution ----------------------------------------------------

    #[test]
    fn test_resolve_name_pipeline_order() {
        let a = BoundaryFeature::new("m/1", "Solapur", "Maharashtra");
        let b = BoundaryFeature::new("m/2", "Osmanabad", "Maharashtra");
        let index = build_index(&[&a, &b]);
        let aliases = AliasTable::defaults();

        assert_eq!(resolve_name("solapur", &index, &aliases), NameMatch::Direct(0));
        assert_eq!(resolve_name("sholapur", &index, &aliases), NameMatch::Alias(0));
        assert_eq!(resolve_name("dharashiv", &index, &aliases), NameMatch::Alias(1));
        assert_eq!(
            resolve_name("atlantis", &index, &aliases),
            NameMatch::Unresolved { note: None }
        );
    }

    #[test]
    fn test_duplicate_canonical_names_are_ambiguous() {
        let a = BoundaryFeature::new("m/1", "Aurangabad", "Maharashtra");
        let b = BoundaryFeature::new("m/2", "AURANGABAD", "Maharashtra");
        let index = build_index(&[&a, &b]);
        let result = resolve_name("aurangabad", &index, &AliasTable::new());
        assert!(matches!(result, NameMatch::Ambiguous { ref indices, .. } if indices.len() == 2));
    }

    #[test]
    fn test_display_label_distinguishes_low_rain_from_no_data() {
        let mut d = ResolvedDistrict {
            feature_id: FeatureId::new("m/1"),
            canonical_name: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            rainfall_mm: Some(3.2),
            geometry: serde_json::Value::Null,
        };
        assert_eq!(d.display_label(), "Below threshold");
        assert_eq!(d.color(), classify::NEUTRAL_COLOR);
        d.rainfall_mm = Some(150.0);
        assert_eq!(d.display_label(), "Very Heavy");
        d.rainfall_mm = None;
        assert_eq!(d.display_label(), "No data");
    }

    #[test]
    fn test_category_counts_cover_all_districts() {
        let aliases = AliasTable::new();
        let features = vec![feature("1", "A"), feature("2", "B"), feature("3", "C")];
        let records = vec![record("A", 20.0), record("B", 210.0)];
        let out = Reconciler::new(&aliases, &states())
            .reconcile(&features, &records, june())
            .unwrap();
        let counts = out.category_counts();
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 3);
        assert!(counts.contains(&(Category::ExtremelyHeavy, 1)));
        assert!(counts.contains(&(Category::Moderate, 1)));
        assert!(counts.contains(&(Category::Unclassified, 1)));
    }
}
