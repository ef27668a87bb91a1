use crate::feature::Feature;

// Keys that may carry a district's parent-state name, across providers.
const PARENT_STATE_KEYS: &[&str] = &["state", "statename", "state_name", "admin1Name", "NAME_1"];

/// Indices of the features belonging to `state`, for the district tier.
///
/// The shared district dataset covers the whole country, so the view narrows
/// it to one state's districts. Matching is exact-match-first:
/// 1. case-folded, trimmed equality;
/// 2. equality after stripping a trailing "state" qualifier from either side;
/// 3. substring containment, a deliberately loose last resort for provider
///    naming drift.
/// The substring rule is only consulted when no exact/qualifier match exists
/// anywhere in the set, so a state whose name embeds another's cannot shadow
/// the exact matches.
pub fn filter_by_state(features: &[Feature], state: &str) -> Vec<usize> {
    let target = canonical(state);
    let target_stripped = strip_state_qualifier(&target).to_string();

    let mut exact = Vec::new();
    let mut loose = Vec::new();

    for (index, feature) in features.iter().enumerate() {
        let Some(parent) = feature.string_property(PARENT_STATE_KEYS) else {
            continue;
        };
        let parent = canonical(parent);
        let parent_stripped = strip_state_qualifier(&parent);

        if parent == target || parent_stripped == target_stripped {
            exact.push(index);
        } else if parent.contains(target.as_str()) {
            loose.push(index);
        }
    }

    if exact.is_empty() { loose } else { exact }
}

fn canonical(s: &str) -> String {
    s.trim().to_lowercase()
}

fn strip_state_qualifier(s: &str) -> &str {
    s.strip_suffix("state").map_or(s, str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::filter_by_state;
    use crate::feature::{Feature, GeoPoint, Geometry};
    use serde_json::{Map, Value, json};

    fn district(state_prop: &str, value: &str) -> Feature {
        let properties: Map<String, Value> = json!({ state_prop: value })
            .as_object()
            .cloned()
            .unwrap_or_default();
        Feature {
            id: None,
            properties,
            geometry: Geometry::Point(GeoPoint::new(0.0, 0.0)),
        }
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let features = vec![
            district("state", "Lagos"),
            district("state", "KANO"),
            district("state", "lagos"),
        ];
        assert_eq!(filter_by_state(&features, "Lagos"), vec![0, 2]);
    }

    #[test]
    fn trailing_qualifier_is_tolerated() {
        let features = vec![
            district("statename", "Osun State"),
            district("statename", "Oyo State"),
        ];
        assert_eq!(filter_by_state(&features, "Osun"), vec![0]);
        // Qualifier on the query side too.
        assert_eq!(filter_by_state(&features, "Oyo State"), vec![1]);
    }

    #[test]
    fn exact_matches_suppress_substring_matches() {
        // "Niger" is a substring of "Niger Delta Zone"; the exact match must win alone.
        let features = vec![
            district("state", "Niger Delta Zone"),
            district("state", "Niger"),
        ];
        assert_eq!(filter_by_state(&features, "Niger"), vec![1]);
    }

    #[test]
    fn substring_is_the_last_resort() {
        let features = vec![
            district("NAME_1", "Cross River (south)"),
            district("NAME_1", "Benue"),
        ];
        assert_eq!(filter_by_state(&features, "Cross River"), vec![0]);
    }

    #[test]
    fn features_without_a_parent_key_never_match() {
        let features = vec![district("other", "Lagos")];
        assert!(filter_by_state(&features, "Lagos").is_empty());
    }
}
