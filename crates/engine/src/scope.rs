use dataset::Tier;

/// Continent-wide scope sentinel.
pub const AFRICA_SCOPE: &str = "africa";
/// Country scope sentinel. Any other scope string names a state.
pub const NIGERIA_SCOPE: &str = "nigeria";

pub const AFRICA_CENTER: [f64; 2] = [17.0, 3.0];
pub const NIGERIA_CENTER: [f64; 2] = [8.6753, 9.0820];

pub const AFRICA_SCALE: f64 = 360.0;
pub const NIGERIA_SCALE: f64 = 2_800.0;
/// Used only until the auto-fit for the filtered district set lands.
pub const DISTRICT_FALLBACK_SCALE: f64 = 8_000.0;

const AFRICA_DATASET_URL: &str =
    "https://raw.githubusercontent.com/codeforgermany/click_that_hood/main/public/data/africa.geojson";
const NIGERIA_STATES_URL: &str =
    "https://raw.githubusercontent.com/deldersveld/topojson/master/countries/nigeria/nigeria-states.json";
const NIGERIA_LGAS_URL: &str =
    "https://raw.githubusercontent.com/deldersveld/topojson/master/countries/nigeria/nigeria-lgas.json";

/// Where a scope's boundary data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub url: String,
    /// Object to extract when the payload is topology-encoded.
    pub topology_object: Option<String>,
}

impl DatasetRef {
    fn geojson(url: &str) -> Self {
        Self {
            url: url.to_string(),
            topology_object: None,
        }
    }

    fn topojson(url: &str, object: &str) -> Self {
        Self {
            url: url.to_string(),
            topology_object: Some(object.to_string()),
        }
    }
}

/// Everything the engine needs to know about a scope string.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeInfo {
    pub tier: Tier,
    pub dataset: DatasetRef,
    pub default_center: [f64; 2],
    /// Projection scale for the fixed regime; at the district tier this is
    /// only a placeholder until auto-fit completes.
    pub default_scale: f64,
}

/// Maps a scope string to its tier, dataset and default view.
pub fn resolve(scope: &str) -> ScopeInfo {
    let canon = scope.trim().to_lowercase();
    if canon == AFRICA_SCOPE {
        return ScopeInfo {
            tier: Tier::Continent,
            dataset: DatasetRef::geojson(AFRICA_DATASET_URL),
            default_center: AFRICA_CENTER,
            default_scale: AFRICA_SCALE,
        };
    }
    if canon == NIGERIA_SCOPE {
        return ScopeInfo {
            tier: Tier::Country,
            dataset: DatasetRef::topojson(NIGERIA_STATES_URL, "NGA_adm1"),
            default_center: NIGERIA_CENTER,
            default_scale: NIGERIA_SCALE,
        };
    }
    // The district dataset is one shared country-wide set; the engine
    // filters it to the requested state client-side.
    ScopeInfo {
        tier: Tier::District,
        dataset: DatasetRef::topojson(NIGERIA_LGAS_URL, "NGA_adm2"),
        default_center: state_centroid(&canon),
        default_scale: DISTRICT_FALLBACK_SCALE,
    }
}

/// Default [lon, lat] per state, used before the auto-fit completes.
/// Falls back to the national centroid for names not in the table.
pub fn state_centroid(state: &str) -> [f64; 2] {
    let canon = state.trim().to_lowercase();
    let key = canon.strip_suffix(" state").unwrap_or(&canon);
    for (name, center) in STATE_CENTROIDS {
        if *name == key {
            return *center;
        }
    }
    NIGERIA_CENTER
}

const STATE_CENTROIDS: &[(&str, [f64; 2])] = &[
    ("abia", [7.49, 5.45]),
    ("adamawa", [12.40, 9.33]),
    ("akwa ibom", [7.85, 4.91]),
    ("anambra", [6.93, 6.22]),
    ("bauchi", [9.84, 10.78]),
    ("bayelsa", [6.08, 4.77]),
    ("benue", [8.74, 7.34]),
    ("borno", [13.15, 11.88]),
    ("cross river", [8.60, 5.87]),
    ("delta", [5.68, 5.70]),
    ("ebonyi", [8.08, 6.26]),
    ("edo", [5.89, 6.64]),
    ("ekiti", [5.31, 7.72]),
    ("enugu", [7.38, 6.54]),
    ("federal capital territory", [7.49, 9.06]),
    ("fct", [7.49, 9.06]),
    ("gombe", [11.17, 10.36]),
    ("imo", [7.06, 5.57]),
    ("jigawa", [9.56, 12.23]),
    ("kaduna", [7.71, 10.38]),
    ("kano", [8.52, 11.89]),
    ("katsina", [7.62, 12.38]),
    ("kebbi", [4.20, 11.49]),
    ("kogi", [6.74, 7.73]),
    ("kwara", [4.55, 8.97]),
    ("lagos", [3.39, 6.52]),
    ("nasarawa", [8.20, 8.54]),
    ("niger", [5.47, 9.93]),
    ("ogun", [3.35, 6.98]),
    ("ondo", [5.20, 7.25]),
    ("osun", [4.54, 7.56]),
    ("oyo", [3.93, 8.12]),
    ("plateau", [9.52, 9.22]),
    ("rivers", [6.92, 4.84]),
    ("sokoto", [5.31, 13.05]),
    ("taraba", [10.77, 7.99]),
    ("yobe", [11.75, 12.29]),
    ("zamfara", [6.24, 12.12]),
];

#[cfg(test)]
mod tests {
    use super::{NIGERIA_CENTER, resolve, state_centroid};
    use dataset::Tier;

    #[test]
    fn sentinels_resolve_to_fixed_tiers() {
        let africa = resolve("africa");
        assert_eq!(africa.tier, Tier::Continent);
        assert!(africa.dataset.topology_object.is_none());

        let nigeria = resolve("Nigeria");
        assert_eq!(nigeria.tier, Tier::Country);
        assert_eq!(nigeria.default_center, NIGERIA_CENTER);
    }

    #[test]
    fn state_names_resolve_to_district_tier() {
        let info = resolve("Lagos");
        assert_eq!(info.tier, Tier::District);
        assert_eq!(info.default_center, [3.39, 6.52]);
        assert_eq!(info.dataset.topology_object.as_deref(), Some("NGA_adm2"));
    }

    #[test]
    fn centroid_lookup_tolerates_case_and_qualifier() {
        assert_eq!(state_centroid("OSUN"), [4.54, 7.56]);
        assert_eq!(state_centroid("Osun State"), [4.54, 7.56]);
        assert_eq!(state_centroid("Atlantis"), NIGERIA_CENTER);
    }
}
