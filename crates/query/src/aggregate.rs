use std::collections::{HashMap, HashSet};

use common::{AlbumInfo, ArtistRecord, MediaRecord};
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::args::{ArgKey, QueryArgs, SortOrder};
use crate::covers::{cover_path, CoverConfig};
use crate::places::Places;
use crate::urls::quote_plus;

/// Occurrence counts in first-encounter order; the sort pass relies on
/// this being deterministic for a given input sequence.
fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: Iterator<Item = &'a str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    counts
}

fn sort_counts(counts: &mut Vec<(String, usize)>, sort: Option<SortOrder>) {
    match sort {
        Some(SortOrder::Name) => counts.sort_by(|a, b| a.0.cmp(&b.0)),
        Some(SortOrder::Random) => counts.shuffle(&mut rand::rng()),
        // Default: count descending; stable sort keeps encounter order
        // among ties.
        _ => counts.sort_by(|a, b| b.1.cmp(&a.1)),
    }
}

/// Genre to track count over the filtered set.
pub fn genre_counts(records: &[&MediaRecord], sort: Option<SortOrder>) -> Vec<(String, usize)> {
    let mut counts = value_counts(records.iter().map(|record| record.genre.as_str()));
    sort_counts(&mut counts, sort);
    counts
}

/// Artist to track count over the filtered set.
pub fn artist_counts(records: &[&MediaRecord], sort: Option<SortOrder>) -> Vec<(String, usize)> {
    let mut counts = value_counts(records.iter().map(|record| record.artist.as_str()));
    sort_counts(&mut counts, sort);
    counts
}

/// Country code to artist count over the artist table.
pub fn country_code_counts(
    artists: &[ArtistRecord],
    sort: Option<SortOrder>,
) -> Vec<(String, usize)> {
    let mut counts = value_counts(artists.iter().map(|artist| artist.country_code.as_str()));
    sort_counts(&mut counts, sort);
    counts
}

/// Region code to artist count over the artist table.
pub fn region_code_counts(
    artists: &[ArtistRecord],
    sort: Option<SortOrder>,
) -> Vec<(String, usize)> {
    let mut counts = value_counts(artists.iter().map(|artist| artist.region_code.as_str()));
    sort_counts(&mut counts, sort);
    counts
}

/// City to artist count over the artist table.
///
/// Keys are enriched through the lookup tables before counting, so two
/// identically named cities with different resolved qualifiers stay
/// separate entries.
pub fn city_counts(
    artists: &[ArtistRecord],
    places: &Places,
    sort: Option<SortOrder>,
) -> Vec<(String, usize)> {
    let labels: Vec<String> = artists.iter().map(|artist| places.city_label(artist)).collect();
    let mut counts = value_counts(labels.iter().map(String::as_str));
    sort_counts(&mut counts, sort);
    counts
}

/// One deduplicated `AlbumInfo` per distinct (artist, album, year, cover)
/// tuple in the filtered set, sorted and capped.
///
/// Truncation happens after sorting so the retained entries are
/// deterministic for any non-random sort mode. `max_results <= 0` means
/// unlimited.
pub fn albums(
    records: &[&MediaRecord],
    sort: Option<SortOrder>,
    covers: &CoverConfig,
    max_results: i64,
) -> Vec<AlbumInfo> {
    let mut seen: HashSet<AlbumInfo> = HashSet::new();
    let mut albums: Vec<AlbumInfo> = Vec::new();
    for record in records {
        let info = AlbumInfo {
            artist: record.grouping_artist().to_string(),
            album: record.album.clone(),
            year: record.year,
            cover_path: cover_path(&record.path, covers),
        };
        if seen.insert(info.clone()) {
            albums.push(info);
        }
    }

    match sort {
        Some(SortOrder::Artist) => albums.sort_by(|a, b| a.artist.cmp(&b.artist)),
        Some(SortOrder::Album) => albums.sort_by(|a, b| a.album.cmp(&b.album)),
        Some(SortOrder::Random) => albums.shuffle(&mut rand::rng()),
        // Default: most recent first.
        _ => albums.sort_by(|a, b| b.year.cmp(&a.year)),
    }

    if max_results > 0 && albums.len() > max_results as usize {
        albums.truncate(max_results as usize);
    }
    albums
}

/// Orders the filtered tracks for display.
///
/// When the query already scopes to one album or a specific artist, the
/// catalog's track-within-album order is left as encountered.
pub fn tracks<'a>(mut records: Vec<&'a MediaRecord>, args: &QueryArgs) -> Vec<&'a MediaRecord> {
    let scoped = args.has_list(ArgKey::Album)
        || args.has_list(ArgKey::Artist)
        || args.has_list(ArgKey::AlbumArtist);
    if scoped {
        return records;
    }
    match args.sort {
        Some(SortOrder::Random) => records.shuffle(&mut rand::rng()),
        _ => records.sort_by(|a, b| b.year.cmp(&a.year)),
    }
    records
}

/// One word-cloud term plus the view it navigates to.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CloudEntry {
    pub text: String,
    pub url: String,
}

fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let distinct: HashSet<&str> = values.collect();
    let mut out: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    out.sort();
    out
}

/// Distinct genres in the filtered set, each linking to the artist cloud
/// scoped to that genre.
pub fn genre_cloud(records: &[&MediaRecord]) -> Vec<CloudEntry> {
    distinct_sorted(records.iter().map(|record| record.genre.as_str()))
        .into_iter()
        .map(|genre| CloudEntry {
            url: format!("/artists-cloud?genre={}", quote_plus(&genre)),
            text: genre,
        })
        .collect()
}

/// Distinct artists in the filtered set, each linking to that artist's
/// track list.
pub fn artist_cloud(records: &[&MediaRecord]) -> Vec<CloudEntry> {
    distinct_sorted(records.iter().map(|record| record.artist.as_str()))
        .into_iter()
        .map(|artist| CloudEntry {
            url: format!("/tracks?artist={}", quote_plus(&artist)),
            text: artist,
        })
        .collect()
}
