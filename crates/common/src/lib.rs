use serde::{Deserialize, Serialize};

/// One scanned track as emitted by the media scanner.
///
/// `path` doubles as the unique identifier and the filesystem locator.
/// The geographic fields are not tag data; they are copied over from the
/// owning [`ArtistRecord`] when the catalog is assembled and stay empty
/// when no artist matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaRecord {
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub format: String,
    pub title: String,
    pub artist: String,
    #[serde(default, alias = "albumartist")]
    pub album_artist: String,
    pub album: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub duration: u32,
    #[serde(default, alias = "countrycode")]
    pub country_code: String,
    #[serde(default, alias = "regioncode")]
    pub region_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, alias = "languagecode")]
    pub language_code: String,
}

impl MediaRecord {
    /// Grouping key for album aggregation: `album_artist` when tagged,
    /// otherwise the track artist.
    pub fn grouping_artist(&self) -> &str {
        if self.album_artist.is_empty() {
            &self.artist
        } else {
            &self.album_artist
        }
    }
}

/// Artist metadata keyed by the artist's directory path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
    pub path: String,
    #[serde(default, alias = "countrycode")]
    pub country_code: String,
    #[serde(default, alias = "regioncode")]
    pub region_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, alias = "languagecode")]
    pub language_code: String,
}

/// One deduplicated album as shown in the album grid.
///
/// Identity is exactly the 4-tuple; two tracks of the same album collapse
/// to a single entry through set insertion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumInfo {
    pub artist: String,
    pub album: String,
    pub year: i32,
    pub cover_path: String,
}

/// Strips the final component of a slash-separated path.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Splits a slash-separated path into its non-empty components.
pub fn path_components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|part| !part.is_empty())
}
