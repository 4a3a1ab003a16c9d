/// District boundary GeoJSON loader
///
/// Reads a GeoJSON FeatureCollection of district polygons for one state.
/// Boundary files from different publishers name the district property
/// differently (`dtname`, `DISTRICT`, `NAME_2`, ...), so unless the config
/// pins one, the first string-valued candidate found on any feature is used
/// for the whole file.
///
/// Feature ids are prefixed with a slug of the state (`maharashtra/27`,
/// `goa/0`) and made unique with [`ensure_unique_ids`]: a clashing id gets a
/// `#2`, `#3`, ... suffix.

use super::{read_file, LoadError};
use crate::logging::{self, Stage};
use crate::model::{BoundaryFeature, FeatureId};
use crate::reconcile::normalize_name;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Property names tried, in order, when no name property is configured.
pub const NAME_PROPERTY_CANDIDATES: &[&str] = &["dtname", "district", "NAME_2", "Dist_Name", "Name"];

/// Property names tried, in order, for a stable feature id when the feature
/// has no top-level `id`.
pub const ID_PROPERTY_CANDIDATES: &[&str] = &["censuscode", "dtcode", "objectid"];

// ============================================================================
// GeoJSON shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Value,
}

// ============================================================================
// Property detection
// ============================================================================

/// Finds the district-name property among `properties`, matching candidate
/// names case-insensitively and requiring a string value.
pub fn find_name_property(properties: &Map<String, Value>) -> Option<String> {
    NAME_PROPERTY_CANDIDATES.iter().find_map(|candidate| {
        properties
            .iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(candidate) && value.is_string())
            .map(|(key, _)| key.clone())
    })
}

fn id_fragment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn feature_id_for(feature: &Feature, properties: &Map<String, Value>, index: usize) -> String {
    feature
        .id
        .as_ref()
        .and_then(id_fragment)
        .or_else(|| {
            ID_PROPERTY_CANDIDATES.iter().find_map(|candidate| {
                properties
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(candidate))
                    .and_then(|(_, value)| id_fragment(value))
            })
        })
        .unwrap_or_else(|| index.to_string())
}

/// `"Maharashtra"` → `"maharashtra"`, `"Dadra and Nagar Haveli"` →
/// `"dadra-and-nagar-haveli"`.
pub fn state_slug(state: &str) -> String {
    normalize_name(state).replace(' ', "-")
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses GeoJSON text into boundary features tagged with `state`.
///
/// `name_property` pins the district-name property; `None` enables
/// detection. Features whose name property is missing or blank are skipped
/// with a warning.
pub fn parse_boundaries_geojson(
    json: &str,
    state: &str,
    name_property: Option<&str>,
    source: &str,
) -> Result<Vec<BoundaryFeature>, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(json).map_err(|e| LoadError::Parse {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    let empty = Map::new();
    let name_key = match name_property {
        Some(key) => key.to_string(),
        None => collection
            .features
            .iter()
            .filter_map(|f| f.properties.as_ref())
            .find_map(find_name_property)
            .ok_or_else(|| LoadError::NoNameProperty {
                path: source.to_string(),
            })?,
    };
    logging::debug(
        Stage::Boundary,
        None,
        &format!("Using property '{}' for district names in {}", name_key, source),
    );

    let slug = state_slug(state);
    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let properties = feature.properties.as_ref().unwrap_or(&empty);
        let name = properties
            .get(&name_key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let Some(name) = name else {
            logging::warn(
                Stage::Boundary,
                None,
                &format!("Feature {} in {} has no '{}' value; skipped", index, source, name_key),
            );
            continue;
        };

        let id = format!("{}/{}", slug, feature_id_for(feature, properties, index));
        features.push(BoundaryFeature::new(id, name, state).with_geometry(feature.geometry.clone()));
    }

    ensure_unique_ids(&mut features);
    Ok(features)
}

/// Rewrites clashing feature ids so every id in `features` is unique. The
/// first feature keeps an id; later holders get `#2`, `#3`, ... appended.
/// Returns the number of ids rewritten.
pub fn ensure_unique_ids(features: &mut [BoundaryFeature]) -> usize {
    let mut used: HashSet<String> = HashSet::with_capacity(features.len());
    let mut rewritten = 0;

    for feature in features.iter_mut() {
        let base = feature.feature_id.as_str().to_string();
        if used.insert(base.clone()) {
            continue;
        }

        let mut n = 2;
        let mut candidate = format!("{}#{}", base, n);
        while used.contains(&candidate) {
            n += 1;
            candidate = format!("{}#{}", base, n);
        }
        logging::warn(
            Stage::Boundary,
            Some(&feature.canonical_name),
            &format!("Feature id '{}' already in use; using '{}'", base, candidate),
        );
        used.insert(candidate.clone());
        feature.feature_id = FeatureId::new(candidate);
        rewritten += 1;
    }

    rewritten
}

/// Loads boundary features for one state from a GeoJSON file.
pub fn load_boundaries(
    path: &str,
    state: &str,
    name_property: Option<&str>,
) -> Result<Vec<BoundaryFeature>, LoadError> {
    let text = read_file(path)?;
    let features = parse_boundaries_geojson(&text, state, name_property, path)?;
    logging::info(
        Stage::Boundary,
        None,
        &format!("Loaded {} {} districts from {}", features.len(), state, path),
    );
    Ok(features)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DISTRICTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"objectid": 1, "dtname": "Pune", "censuscode": 521},
                "geometry": {"type": "Polygon", "coordinates": [[[73.0, 18.0], [74.0, 18.0], [74.0, 19.0], [73.0, 18.0]]]}
            },
            {
                "type": "Feature",
                "id": "thane",
                "properties": {"objectid": 2, "dtname": " Thane "},
                "geometry": {"type": "Polygon", "coordinates": [[[72.8, 19.0], [73.5, 19.0], [73.5, 19.8], [72.8, 19.0]]]}
            }
        ]
    }"#;

    #[test]
    fn test_detects_name_property_and_ids() {
        let features = parse_boundaries_geojson(TWO_DISTRICTS, "Maharashtra", None, "test").unwrap();
        assert_eq!(features.len(), 2);

        assert_eq!(features[0].canonical_name, "Pune");
        assert_eq!(features[0].feature_id.as_str(), "maharashtra/521");
        assert_eq!(features[0].state, "Maharashtra");
        assert_eq!(features[0].geometry["type"], "Polygon");

        assert_eq!(features[1].canonical_name, "Thane");
        assert_eq!(features[1].feature_id.as_str(), "maharashtra/thane");
    }

    #[test]
    fn test_name_property_detection_is_case_insensitive_and_string_only() {
        let props: Map<String, Value> = serde_json::from_str(
            r#"{"OBJECTID": 4, "District": 7, "DTNAME": "Satara"}"#,
        )
        .unwrap();
        assert_eq!(find_name_property(&props), Some("DTNAME".to_string()));

        let props: Map<String, Value> = serde_json::from_str(r#"{"objectid": 4}"#).unwrap();
        assert_eq!(find_name_property(&props), None);
    }

    #[test]
    fn test_pinned_name_property_is_used() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"dtname": "Old", "new_name": "Palghar"}, "geometry": null}
        ]}"#;
        let features = parse_boundaries_geojson(json, "Maharashtra", Some("new_name"), "test").unwrap();
        assert_eq!(features[0].canonical_name, "Palghar");
        assert_eq!(features[0].feature_id.as_str(), "maharashtra/0");
    }

    #[test]
    fn test_feature_without_name_is_skipped() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"dtname": "North Goa"}, "geometry": null},
            {"type": "Feature", "properties": {"dtname": ""}, "geometry": null},
            {"type": "Feature", "properties": null, "geometry": null}
        ]}"#;
        let features = parse_boundaries_geojson(json, "Goa", None, "test").unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].feature_id.as_str(), "goa/0");
    }

    #[test]
    fn test_name_property_found_past_first_feature() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"objectid": 1}, "geometry": null},
            {"type": "Feature", "properties": {"objectid": 2, "dtname": "Satara"}, "geometry": null}
        ]}"#;
        let features = parse_boundaries_geojson(json, "Maharashtra", None, "test").unwrap();
        let names: Vec<_> = features.iter().map(|f| f.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Satara"]);
    }

    #[test]
    fn test_mixed_id_sources_never_share_an_id() {
        // censuscode 1 on the first feature, index 1 on the second.
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"dtname": "Thane", "censuscode": 1},
             "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
            {"type": "Feature", "properties": {"dtname": "Palghar"},
             "geometry": {"type": "Point", "coordinates": [9.0, 9.0]}}
        ]}"#;
        let features = parse_boundaries_geojson(json, "Maharashtra", None, "test").unwrap();
        let ids: Vec<_> = features.iter().map(|f| f.feature_id.as_str()).collect();
        assert_eq!(ids, vec!["maharashtra/1", "maharashtra/1#2"]);
        assert_eq!(features[1].canonical_name, "Palghar");
        assert_eq!(features[1].geometry["coordinates"][0], 9.0);
    }

    #[test]
    fn test_ensure_unique_ids_skips_suffixes_already_taken() {
        let mut features = vec![
            BoundaryFeature::new("goa/1", "North Goa", "Goa"),
            BoundaryFeature::new("goa/1#2", "South Goa", "Goa"),
            BoundaryFeature::new("goa/1", "Extra", "Goa"),
        ];
        assert_eq!(ensure_unique_ids(&mut features), 1);
        assert_eq!(features[2].feature_id.as_str(), "goa/1#3");

        let ids: HashSet<_> = features.iter().map(|f| f.feature_id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_missing_name_property_is_an_error() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"objectid": 1}, "geometry": null}
        ]}"#;
        let err = parse_boundaries_geojson(json, "Goa", None, "goa.geojson").unwrap_err();
        assert!(matches!(err, LoadError::NoNameProperty { .. }));
    }

    #[test]
    fn test_empty_collection_needs_a_pinned_name_property() {
        let json = r#"{"type": "FeatureCollection", "features": []}"#;
        let err = parse_boundaries_geojson(json, "Goa", None, "goa.geojson").unwrap_err();
        // Nothing to detect a name property from.
        assert!(matches!(err, LoadError::NoNameProperty { .. }));

        let features = parse_boundaries_geojson(json, "Goa", Some("dtname"), "goa.geojson").unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_state_slug() {
        assert_eq!(state_slug("Maharashtra"), "maharashtra");
        assert_eq!(state_slug(" Dadra and Nagar Haveli "), "dadra-and-nagar-haveli");
    }
}
