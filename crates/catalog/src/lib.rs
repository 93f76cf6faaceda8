use std::fs;
use std::path::Path;
use std::sync::Arc;

use common::{path_components, ArtistRecord, MediaRecord};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Immutable snapshot of the scanned media library.
///
/// Built once from the scanner's YAML output and never mutated afterwards;
/// reloads go through [`CatalogHandle::install`] so in-flight queries keep
/// observing a consistent view.
pub struct Catalog {
    records: Vec<MediaRecord>,
    artists: Vec<ArtistRecord>,
}

impl Catalog {
    /// Assembles a snapshot, associating each record with its artist's
    /// geographic metadata.
    pub fn from_parts(mut records: Vec<MediaRecord>, artists: Vec<ArtistRecord>) -> Self {
        associate_artists(&mut records, &artists);
        Self { records, artists }
    }

    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            artists: Vec::new(),
        }
    }

    /// Loads the scanner output, plus the artist table when configured.
    pub fn load(files_path: &Path, artists_path: Option<&Path>) -> Result<Self, CatalogError> {
        let records = load_records(files_path)?;
        let artists = match artists_path {
            Some(path) => load_artists(path)?,
            None => Vec::new(),
        };
        let catalog = Self::from_parts(records, artists);
        info!(
            "Loaded catalog: {} records, {} artists",
            catalog.records.len(),
            catalog.artists.len()
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn artists(&self) -> &[ArtistRecord] {
        &self.artists
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            records: self.records.len(),
            artists: self.artists.len(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogStats {
    pub records: usize,
    pub artists: usize,
}

/// Shared handle over the current catalog snapshot.
///
/// Readers grab a cheap `Arc` clone; a reload swaps the inner `Arc` in one
/// write-lock hold, so no query ever sees a half-updated catalog.
#[derive(Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.read())
    }

    pub fn install(&self, catalog: Catalog) {
        *self.inner.write() = Arc::new(catalog);
    }
}

#[derive(Deserialize)]
struct FilesDocument {
    mediafiles: Vec<MediaRecord>,
}

#[derive(Deserialize)]
struct ArtistsDocument {
    artists: Vec<ArtistRecord>,
}

pub fn load_records(path: &Path) -> Result<Vec<MediaRecord>, CatalogError> {
    let contents = fs::read_to_string(path)?;
    let document: FilesDocument = serde_yaml::from_str(&contents)?;
    Ok(document.mediafiles)
}

pub fn load_artists(path: &Path) -> Result<Vec<ArtistRecord>, CatalogError> {
    let contents = fs::read_to_string(path)?;
    let document: ArtistsDocument = serde_yaml::from_str(&contents)?;
    Ok(document.artists)
}

/// Copies geographic metadata from each record's owning artist.
///
/// A record belongs to the artist whose directory path is a prefix of the
/// record's file path on component boundaries. Raw substring matching
/// must not be used here: "/data/Music/M" is not a prefix of
/// "/data/Music/Municipal Waste/...".
fn associate_artists(records: &mut [MediaRecord], artists: &[ArtistRecord]) {
    if artists.is_empty() {
        return;
    }
    let mut unmatched = 0usize;
    for record in records.iter_mut() {
        match artists
            .iter()
            .find(|artist| is_component_prefix(&artist.path, &record.path))
        {
            Some(artist) => {
                record.country_code = artist.country_code.clone();
                record.region_code = artist.region_code.clone();
                record.city = artist.city.clone();
                record.language_code = artist.language_code.clone();
            }
            None => unmatched += 1,
        }
    }
    if unmatched > 0 {
        warn!(
            "No artist metadata matched for {} of {} records; their geographic fields stay empty",
            unmatched,
            records.len()
        );
    }
}

/// True when every component of `prefix` matches the corresponding leading
/// component of `path`.
fn is_component_prefix(prefix: &str, path: &str) -> bool {
    let mut path_parts = path_components(path);
    for want in path_components(prefix) {
        match path_parts.next() {
            Some(part) if part == want => {}
            _ => return false,
        }
    }
    true
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "io error: {}", err),
            CatalogError::Yaml(err) => write!(f, "yaml error: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Yaml(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_component_prefix, Catalog, CatalogHandle};
    use common::{ArtistRecord, MediaRecord};

    fn record(path: &str) -> MediaRecord {
        MediaRecord {
            path: path.to_string(),
            size: 0,
            format: "mp3".to_string(),
            title: "t".to_string(),
            artist: "a".to_string(),
            album_artist: String::new(),
            album: "x".to_string(),
            genre: "rock".to_string(),
            year: 2000,
            duration: 0,
            country_code: String::new(),
            region_code: String::new(),
            city: String::new(),
            language_code: String::new(),
        }
    }

    fn artist(path: &str, country: &str) -> ArtistRecord {
        ArtistRecord {
            name: "a".to_string(),
            path: path.to_string(),
            country_code: country.to_string(),
            region_code: "US-WA".to_string(),
            city: "Seattle".to_string(),
            language_code: "en".to_string(),
        }
    }

    #[test]
    fn component_prefix_requires_directory_boundary() {
        assert!(is_component_prefix(
            "/data/Music/Municipal Waste",
            "/data/Music/Municipal Waste/Hazardous Mutation [2005]/01.mp3"
        ));
        // Partial component must not match.
        assert!(!is_component_prefix(
            "/data/Music/M",
            "/data/Music/Municipal Waste/Hazardous Mutation [2005]/01.mp3"
        ));
        assert!(is_component_prefix("/data/Music/", "/data/Music/A/01.mp3"));
    }

    #[test]
    fn association_fills_geo_fields() {
        let catalog = Catalog::from_parts(
            vec![record("/data/Music/A/Album [2001]/01.mp3")],
            vec![artist("/data/Music/A", "US")],
        );
        let rec = &catalog.records()[0];
        assert_eq!(rec.country_code, "US");
        assert_eq!(rec.city, "Seattle");
    }

    #[test]
    fn unmatched_record_keeps_empty_geo_fields() {
        let catalog = Catalog::from_parts(
            vec![record("/data/Music/B/Album/01.mp3")],
            vec![artist("/data/Music/A", "US")],
        );
        let rec = &catalog.records()[0];
        assert_eq!(rec.country_code, "");
        assert_eq!(rec.city, "");
    }

    #[test]
    fn handle_swaps_snapshot_atomically() {
        let handle = CatalogHandle::new(Catalog::empty());
        let before = handle.snapshot();
        handle.install(Catalog::from_parts(vec![record("/m/a/b/01.mp3")], vec![]));
        // The old snapshot stays valid and unchanged.
        assert!(before.is_empty());
        assert_eq!(handle.snapshot().len(), 1);
    }
}
