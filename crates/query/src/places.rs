use std::collections::HashMap;
use std::fs;
use std::path::Path;

use common::ArtistRecord;
use tracing::error;

pub const COUNTRY_MAP_FILENAME: &str = "country_code_name_map.json";
pub const REGION_MAP_FILENAME: &str = "region_code_name_map.json";

/// Static code-to-name lookup tables used to enrich city labels.
///
/// Missing or unreadable map files degrade to empty maps; enrichment then
/// falls back to bare identifiers.
#[derive(Clone, Debug, Default)]
pub struct Places {
    countries: HashMap<String, String>,
    regions: HashMap<String, String>,
}

impl Places {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_maps(
        countries: HashMap<String, String>,
        regions: HashMap<String, String>,
    ) -> Self {
        Self { countries, regions }
    }

    /// Loads both lookup tables from a static-data directory.
    pub fn load(dir: &Path) -> Self {
        Self {
            countries: load_map(&dir.join(COUNTRY_MAP_FILENAME)),
            regions: load_map(&dir.join(REGION_MAP_FILENAME)),
        }
    }

    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.countries.get(code).map(String::as_str)
    }

    pub fn region_name(&self, code: &str) -> Option<&str> {
        self.regions.get(code).map(String::as_str)
    }

    /// Display key for an artist's city: `"{city} ({region}, {country})"`
    /// with unresolvable qualifiers omitted, bare city when neither code
    /// resolves.
    pub fn city_label(&self, artist: &ArtistRecord) -> String {
        let mut qualifiers = Vec::new();
        if let Some(region) = self.region_name(&artist.region_code) {
            qualifiers.push(region);
        }
        if let Some(country) = self.country_name(&artist.country_code) {
            qualifiers.push(country);
        }
        if qualifiers.is_empty() {
            artist.city.clone()
        } else {
            format!("{} ({})", artist.city, qualifiers.join(", "))
        }
    }
}

fn load_map(path: &Path) -> HashMap<String, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            error!("Failed to read lookup data {:?}: {}", path, err);
            return HashMap::new();
        }
    };
    match serde_json::from_str(&contents) {
        Ok(map) => map,
        Err(err) => {
            error!("Failed to parse lookup data {:?}: {}", path, err);
            HashMap::new()
        }
    }
}
