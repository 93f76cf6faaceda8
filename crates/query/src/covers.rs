use std::path::{Path, PathBuf};

use common::parent_dir;

pub const COVER_FILENAME: &str = "cover.jpg";

/// Where cover art lives relative to the media files.
///
/// When `covers_root` differs from `media_root`, covers are kept in a
/// parallel directory tree and the media-root prefix of each track's
/// directory gets rewritten before the cover filename is appended.
#[derive(Clone, Debug)]
pub struct CoverConfig {
    pub media_root: String,
    pub covers_root: String,
}

impl CoverConfig {
    pub fn new(media_root: impl Into<String>, covers_root: impl Into<String>) -> Self {
        Self {
            media_root: media_root.into(),
            covers_root: covers_root.into(),
        }
    }
}

/// Derives the cover art location for a record path. Pure string
/// transform; existence checks are the caller's business.
pub fn cover_path(record_path: &str, config: &CoverConfig) -> String {
    let dir = parent_dir(record_path);
    let media_root = config.media_root.trim_end_matches('/');
    let covers_root = config.covers_root.trim_end_matches('/');

    let dir = if !covers_root.is_empty() && covers_root != media_root {
        match dir.strip_prefix(media_root) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                format!("{}{}", covers_root, rest)
            }
            _ => dir.to_string(),
        }
    } else {
        dir.to_string()
    };

    format!("{}/{}", dir, COVER_FILENAME)
}

/// Returns the first cover file that actually exists, retrying with a
/// `.webp` extension when the `.jpg` is absent.
pub fn existing_cover_path(cover_path: &str) -> Option<PathBuf> {
    let jpg = Path::new(cover_path);
    if jpg.is_file() {
        return Some(jpg.to_path_buf());
    }
    let webp = jpg.with_extension("webp");
    if webp.is_file() {
        return Some(webp);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{cover_path, CoverConfig};

    #[test]
    fn appends_cover_filename_next_to_the_track() {
        let config = CoverConfig::new("/data/Music", "/data/Music");
        assert_eq!(
            cover_path("/data/Music/Logic/Orville [2022]/01.mp3", &config),
            "/data/Music/Logic/Orville [2022]/cover.jpg"
        );
    }

    #[test]
    fn rewrites_media_root_to_covers_root() {
        let config = CoverConfig::new("/data/Music/", "/var/www/html/Covers/");
        assert_eq!(
            cover_path("/data/Music/Logic/Orville [2022]/01.mp3", &config),
            "/var/www/html/Covers/Logic/Orville [2022]/cover.jpg"
        );
    }

    #[test]
    fn leaves_paths_outside_the_media_root_alone() {
        let config = CoverConfig::new("/data/Music", "/covers");
        assert_eq!(
            cover_path("/mnt/other/Album/01.mp3", &config),
            "/mnt/other/Album/cover.jpg"
        );
    }

    #[test]
    fn does_not_rewrite_partial_root_components() {
        let config = CoverConfig::new("/data/Mus", "/covers");
        assert_eq!(
            cover_path("/data/Music/A/01.mp3", &config),
            "/data/Music/A/cover.jpg"
        );
    }
}
