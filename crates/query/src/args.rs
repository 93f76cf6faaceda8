use std::collections::HashMap;

/// Recognized query parameter keys.
///
/// Wire names are case-sensitive; list-valued keys may repeat or carry a
/// `[]` suffix the way HTML form arrays do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgKey {
    Genre,
    Artist,
    AlbumArtist,
    Album,
    Title,
    Year,
    CountryCode,
    RegionCode,
    City,
    LanguageCode,
    MinYear,
    MaxYear,
    Sort,
}

/// What shape of value a key decodes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    StrList,
    ScalarInt,
    ScalarSort,
}

impl ArgKey {
    pub const ALL: [ArgKey; 13] = [
        ArgKey::Genre,
        ArgKey::Artist,
        ArgKey::AlbumArtist,
        ArgKey::Album,
        ArgKey::Title,
        ArgKey::Year,
        ArgKey::CountryCode,
        ArgKey::RegionCode,
        ArgKey::City,
        ArgKey::LanguageCode,
        ArgKey::MinYear,
        ArgKey::MaxYear,
        ArgKey::Sort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArgKey::Genre => "genre",
            ArgKey::Artist => "artist",
            ArgKey::AlbumArtist => "albumartist",
            ArgKey::Album => "album",
            ArgKey::Title => "title",
            ArgKey::Year => "year",
            ArgKey::CountryCode => "countryCode",
            ArgKey::RegionCode => "regionCode",
            ArgKey::City => "city",
            ArgKey::LanguageCode => "languageCode",
            ArgKey::MinYear => "minYear",
            ArgKey::MaxYear => "maxYear",
            ArgKey::Sort => "sort",
        }
    }

    pub fn kind(self) -> ArgKind {
        match self {
            ArgKey::MinYear | ArgKey::MaxYear => ArgKind::ScalarInt,
            ArgKey::Sort => ArgKind::ScalarSort,
            _ => ArgKind::StrList,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Name,
    Count,
    Year,
    Artist,
    Album,
    Random,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "count" => Some(Self::Count),
            "year" => Some(Self::Year),
            "artist" => Some(Self::Artist),
            "album" => Some(Self::Album),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Count => "count",
            Self::Year => "year",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Random => "random",
        }
    }
}

/// Decoded query arguments, built fresh per request.
#[derive(Clone, Debug, Default)]
pub struct QueryArgs {
    lists: HashMap<ArgKey, Vec<String>>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub sort: Option<SortOrder>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes raw query-string pairs into typed arguments.
    ///
    /// Repeated list keys accumulate, `key[]` is accepted as an alias of
    /// `key`, unrecognized keys are ignored, and empty scalar values are
    /// treated as absent.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self, ArgError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut args = Self::new();
        for (raw_key, raw_value) in pairs {
            let name = raw_key.as_ref();
            let name = name.strip_suffix("[]").unwrap_or(name);
            let Some(key) = ArgKey::from_name(name) else {
                continue;
            };
            let value = raw_value.as_ref();
            match key.kind() {
                ArgKind::StrList => {
                    args.lists.entry(key).or_default().push(value.to_string());
                }
                ArgKind::ScalarInt => {
                    if value.is_empty() {
                        continue;
                    }
                    let parsed = value.parse::<i32>().map_err(|_| ArgError::InvalidInt {
                        key: key.name(),
                        value: value.to_string(),
                    })?;
                    match key {
                        ArgKey::MinYear => args.min_year = Some(parsed),
                        ArgKey::MaxYear => args.max_year = Some(parsed),
                        _ => {}
                    }
                }
                ArgKind::ScalarSort => {
                    if value.is_empty() {
                        continue;
                    }
                    args.sort = Some(
                        SortOrder::parse(value)
                            .ok_or_else(|| ArgError::InvalidSort(value.to_string()))?,
                    );
                }
            }
        }
        Ok(args)
    }

    /// The value list for a key, when the key was passed at all.
    pub fn list(&self, key: ArgKey) -> Option<&[String]> {
        self.lists.get(&key).map(|values| values.as_slice())
    }

    /// Whether a list key appeared in the query, regardless of value count.
    pub fn has_list(&self, key: ArgKey) -> bool {
        self.lists.contains_key(&key)
    }

    pub fn set_list(&mut self, key: ArgKey, values: Vec<String>) {
        self.lists.insert(key, values);
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.sort.is_none()
    }

    /// Compact `[key=value,...]` rendering for log lines.
    pub fn summary(&self) -> String {
        let mut out = String::from("[");
        for key in ArgKey::ALL {
            if let Some(values) = self.lists.get(&key) {
                out.push_str(key.name());
                out.push('=');
                out.push_str(&values.join("|"));
                out.push(',');
            }
        }
        if let Some(min_year) = self.min_year {
            out.push_str(&format!("minYear={},", min_year));
        }
        if let Some(max_year) = self.max_year {
            out.push_str(&format!("maxYear={},", max_year));
        }
        if let Some(sort) = self.sort {
            out.push_str(&format!("sort={},", sort.label()));
        }
        out.push(']');
        out
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ArgError {
    InvalidInt { key: &'static str, value: String },
    InvalidSort(String),
}

impl std::fmt::Display for ArgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgError::InvalidInt { key, value } => {
                write!(f, "invalid integer for {}: {}", key, value)
            }
            ArgError::InvalidSort(value) => write!(f, "invalid sort order: {}", value),
        }
    }
}

impl std::error::Error for ArgError {}

#[cfg(test)]
mod tests {
    use super::{ArgError, ArgKey, ArgKind, QueryArgs, SortOrder};

    #[test]
    fn kinds_cover_the_key_table() {
        assert_eq!(ArgKey::Genre.kind(), ArgKind::StrList);
        assert_eq!(ArgKey::MinYear.kind(), ArgKind::ScalarInt);
        assert_eq!(ArgKey::Sort.kind(), ArgKind::ScalarSort);
    }

    #[test]
    fn decodes_repeated_and_suffixed_list_keys() {
        let args = QueryArgs::from_pairs(&[
            ("genre", "Rock"),
            ("genre", "Jazz"),
            ("artist[]", "Logic"),
        ])
        .unwrap();
        assert_eq!(
            args.list(ArgKey::Genre).unwrap(),
            &["Rock".to_string(), "Jazz".to_string()]
        );
        assert_eq!(args.list(ArgKey::Artist).unwrap(), &["Logic".to_string()]);
    }

    #[test]
    fn decodes_scalars() {
        let args =
            QueryArgs::from_pairs(&[("minYear", "1990"), ("maxYear", "2005"), ("sort", "album")])
                .unwrap();
        assert_eq!(args.min_year, Some(1990));
        assert_eq!(args.max_year, Some(2005));
        assert_eq!(args.sort, Some(SortOrder::Album));
    }

    #[test]
    fn rejects_bad_scalar_values() {
        let err = QueryArgs::from_pairs(&[("minYear", "nineteen")]).unwrap_err();
        assert_eq!(
            err,
            ArgError::InvalidInt {
                key: "minYear",
                value: "nineteen".to_string()
            }
        );
        let err = QueryArgs::from_pairs(&[("sort", "sideways")]).unwrap_err();
        assert_eq!(err, ArgError::InvalidSort("sideways".to_string()));
    }

    #[test]
    fn ignores_unknown_keys_and_empty_scalars() {
        let args = QueryArgs::from_pairs(&[("bogus", "1"), ("minYear", ""), ("sort", "")]).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn wire_names_are_case_sensitive() {
        // "countryCode" is camelCase on the wire while "albumartist" is not.
        assert_eq!(ArgKey::CountryCode.name(), "countryCode");
        assert_eq!(ArgKey::AlbumArtist.name(), "albumartist");
        let args = QueryArgs::from_pairs(&[("countrycode", "US")]).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn summary_renders_active_keys() {
        let mut args = QueryArgs::new();
        args.set_list(ArgKey::Genre, vec!["Rock".to_string()]);
        args.min_year = Some(1990);
        assert_eq!(args.summary(), "[genre=Rock,minYear=1990,]");
    }
}
