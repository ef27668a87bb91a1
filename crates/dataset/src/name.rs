use crate::feature::Feature;

/// Granularity level of the active map scope.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Continent view: one feature per country.
    Continent,
    /// Country view: one feature per state.
    Country,
    /// One state's districts (LGAs).
    District,
}

// Candidate display-name keys per tier, most specific provider first.
// Boundary datasets for different tiers come from different providers with
// inconsistent schemas; a single fixed key would leave most features
// unlabeled and unpaintable.
const CONTINENT_NAME_KEYS: &[&str] = &["name", "NAME", "ADMIN", "admin", "sovereignt"];
const COUNTRY_NAME_KEYS: &[&str] = &["state", "admin1Name", "NAME_1", "shapeName", "name"];
const DISTRICT_NAME_KEYS: &[&str] = &["lga", "lga_name", "NAME_2", "shapeName", "name", "admin2Name"];

/// Canonical display/key name for one feature.
///
/// Probes the tier's candidate keys in order and returns the first non-empty
/// match, trimmed. Features with none of the candidates get a synthetic name
/// from their position in the rendered list, so they stay paintable and
/// hoverable.
pub fn resolve_name(feature: &Feature, tier: Tier, index: usize) -> String {
    let keys = match tier {
        Tier::Continent => CONTINENT_NAME_KEYS,
        Tier::Country => COUNTRY_NAME_KEYS,
        Tier::District => DISTRICT_NAME_KEYS,
    };
    if let Some(name) = feature.string_property(keys) {
        return name.to_string();
    }
    match tier {
        Tier::District => format!("LGA-{index}"),
        _ => format!("Region-{index}"),
    }
}
