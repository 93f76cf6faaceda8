use common::MediaRecord;
use rand::seq::IndexedRandom;

#[derive(Debug, PartialEq, Eq)]
pub enum PickError {
    Empty,
}

impl std::fmt::Display for PickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickError::Empty => write!(f, "no matching records to pick from"),
        }
    }
}

impl std::error::Error for PickError {}

/// Uniform random choice over the filtered set. Callers re-filter per
/// call; nothing about the pick is cached.
pub fn pick_one<'a>(records: &[&'a MediaRecord]) -> Result<&'a MediaRecord, PickError> {
    records
        .choose(&mut rand::rng())
        .copied()
        .ok_or(PickError::Empty)
}

#[cfg(test)]
mod tests {
    use super::{pick_one, PickError};
    use common::MediaRecord;

    fn record(title: &str) -> MediaRecord {
        MediaRecord {
            path: format!("/data/Music/a/x/{}.mp3", title),
            size: 0,
            format: "mp3".to_string(),
            title: title.to_string(),
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

    #[test]
    fn empty_set_is_an_error() {
        assert_eq!(pick_one(&[]).unwrap_err(), PickError::Empty);
    }

    #[test]
    fn singleton_set_is_deterministic() {
        let only = record("only");
        let picked = pick_one(&[&only]).unwrap();
        assert_eq!(picked.title, "only");
    }

    #[test]
    fn pick_comes_from_the_input_set() {
        let rows = vec![record("one"), record("two"), record("three")];
        let refs: Vec<&MediaRecord> = rows.iter().collect();
        for _ in 0..20 {
            let picked = pick_one(&refs).unwrap();
            assert!(rows.iter().any(|row| row.path == picked.path));
        }
    }
}
