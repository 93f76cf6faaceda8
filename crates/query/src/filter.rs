use std::borrow::Cow;

use catalog::Catalog;
use common::MediaRecord;
use tracing::debug;

use crate::args::{ArgKey, QueryArgs};

/// List-valued keys in the order they are checked against a record.
const LIST_FILTER_KEYS: [ArgKey; 10] = [
    ArgKey::Artist,
    ArgKey::AlbumArtist,
    ArgKey::Album,
    ArgKey::Genre,
    ArgKey::Title,
    ArgKey::Year,
    ArgKey::CountryCode,
    ArgKey::RegionCode,
    ArgKey::City,
    ArgKey::LanguageCode,
];

/// Applies all active predicates as a conjunction over the catalog.
///
/// Pure with respect to the snapshot: the same arguments against the same
/// catalog always produce the same result set.
pub fn filter_records<'a>(catalog: &'a Catalog, args: &QueryArgs) -> Vec<&'a MediaRecord> {
    debug!("filter_records args={}", args.summary());
    catalog
        .records()
        .iter()
        .filter(|record| matches(record, args))
        .collect()
}

fn matches(record: &MediaRecord, args: &QueryArgs) -> bool {
    // Year bounds are inclusive on both ends.
    if let Some(min_year) = args.min_year {
        if record.year < min_year {
            return false;
        }
    }
    if let Some(max_year) = args.max_year {
        if record.year > max_year {
            return false;
        }
    }

    for key in LIST_FILTER_KEYS {
        let Some(values) = args.list(key) else {
            continue;
        };
        // A key passed with no values constrains nothing; only a non-empty
        // list requires membership.
        if values.is_empty() {
            continue;
        }
        let field = field_value(record, key);
        if !contains_ignore_case(values, &field) {
            return false;
        }
    }
    true
}

fn field_value(record: &MediaRecord, key: ArgKey) -> Cow<'_, str> {
    match key {
        ArgKey::Artist => Cow::Borrowed(record.artist.as_str()),
        ArgKey::AlbumArtist => Cow::Borrowed(record.album_artist.as_str()),
        ArgKey::Album => Cow::Borrowed(record.album.as_str()),
        ArgKey::Genre => Cow::Borrowed(record.genre.as_str()),
        ArgKey::Title => Cow::Borrowed(record.title.as_str()),
        ArgKey::Year => Cow::Owned(record.year.to_string()),
        ArgKey::CountryCode => Cow::Borrowed(record.country_code.as_str()),
        ArgKey::RegionCode => Cow::Borrowed(record.region_code.as_str()),
        ArgKey::City => Cow::Borrowed(record.city.as_str()),
        ArgKey::LanguageCode => Cow::Borrowed(record.language_code.as_str()),
        // Scalar keys never reach the list dispatch.
        ArgKey::MinYear | ArgKey::MaxYear | ArgKey::Sort => Cow::Borrowed(""),
    }
}

fn contains_ignore_case(values: &[String], field: &str) -> bool {
    let field = field.to_lowercase();
    values.iter().any(|value| value.to_lowercase() == field)
}

#[cfg(test)]
mod tests {
    use super::filter_records;
    use crate::args::{ArgKey, QueryArgs};
    use catalog::Catalog;
    use common::{ArtistRecord, MediaRecord};

    fn record(artist: &str, album: &str, year: i32) -> MediaRecord {
        MediaRecord {
            path: format!("/data/Music/{}/{} [{}]/01.mp3", artist, album, year),
            size: 0,
            format: "mp3".to_string(),
            title: format!("{} track", album),
            artist: artist.to_string(),
            album_artist: String::new(),
            album: album.to_string(),
            genre: "Rock".to_string(),
            year,
            duration: 0,
            country_code: String::new(),
            region_code: String::new(),
            city: String::new(),
            language_code: String::new(),
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_parts(
            vec![
                record("A", "X", 2000),
                record("A", "X", 2000),
                record("B", "Y", 1990),
            ],
            vec![ArtistRecord {
                name: "A".to_string(),
                path: "/data/Music/A".to_string(),
                country_code: "US".to_string(),
                region_code: "US-WA".to_string(),
                city: "Seattle".to_string(),
                language_code: "en".to_string(),
            }],
        )
    }

    #[test]
    fn no_arguments_keeps_everything() {
        let catalog = test_catalog();
        assert_eq!(filter_records(&catalog, &QueryArgs::new()).len(), 3);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.min_year = Some(1990);
        assert_eq!(filter_records(&catalog, &args).len(), 3);
        args.min_year = Some(1991);
        assert_eq!(filter_records(&catalog, &args).len(), 2);
        let mut args = QueryArgs::new();
        args.max_year = Some(1990);
        assert_eq!(filter_records(&catalog, &args).len(), 1);
        args.max_year = Some(1989);
        assert!(filter_records(&catalog, &args).is_empty());
    }

    #[test]
    fn min_year_excludes_older_records() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.min_year = Some(1995);
        let filtered = filter_records(&catalog, &args);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|record| record.year == 2000));
    }

    #[test]
    fn list_membership_is_case_insensitive() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::Artist, vec!["a".to_string()]);
        assert_eq!(filter_records(&catalog, &args).len(), 2);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::Genre, Vec::new());
        assert_eq!(
            filter_records(&catalog, &args).len(),
            filter_records(&catalog, &QueryArgs::new()).len()
        );
    }

    #[test]
    fn year_list_matches_stringified_year() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::Year, vec!["1990".to_string()]);
        let filtered = filter_records(&catalog, &args);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].artist, "B");
    }

    #[test]
    fn geographic_filter_excludes_unresolved_records() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::CountryCode, vec!["US".to_string()]);
        let filtered = filter_records(&catalog, &args);
        // Artist B has no metadata, so its record fails the country filter.
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|record| record.artist == "A"));
    }

    #[test]
    fn adding_a_constraint_narrows_the_result() {
        let catalog = test_catalog();
        let mut base = QueryArgs::new();
        base.set_list(ArgKey::Genre, vec!["Rock".to_string()]);
        let wide = filter_records(&catalog, &base);

        let mut narrowed = base.clone();
        narrowed.set_list(ArgKey::Artist, vec!["A".to_string()]);
        let narrow = filter_records(&catalog, &narrowed);

        assert!(narrow.len() <= wide.len());
        for record in &narrow {
            assert!(wide.iter().any(|other| other.path == record.path));
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let catalog = test_catalog();
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::Genre, vec!["Rock".to_string()]);
        let first: Vec<String> = filter_records(&catalog, &args)
            .iter()
            .map(|record| record.path.clone())
            .collect();
        let second: Vec<String> = filter_records(&catalog, &args)
            .iter()
            .map(|record| record.path.clone())
            .collect();
        assert_eq!(first, second);
    }
}
