//! Filter, sort, and aggregate queries over a loaded media catalog.
//!
//! The web layer decodes request parameters into [`QueryArgs`], runs them
//! through [`filter_records`], and feeds the filtered slice to the
//! aggregation functions; nothing in here touches the network or mutates
//! the catalog.

pub mod aggregate;
pub mod args;
pub mod covers;
pub mod filter;
pub mod pick;
pub mod places;
pub mod urls;

pub use aggregate::{
    albums, artist_cloud, artist_counts, city_counts, country_code_counts, genre_cloud,
    genre_counts, region_code_counts, tracks, CloudEntry,
};
pub use args::{ArgError, ArgKey, ArgKind, QueryArgs, SortOrder};
pub use covers::{cover_path, existing_cover_path, CoverConfig, COVER_FILENAME};
pub use filter::filter_records;
pub use pick::{pick_one, PickError};
pub use places::Places;
pub use urls::quote_plus;
