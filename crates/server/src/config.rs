use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use query::CoverConfig;
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaServerConfig {
    pub version: u32,
    /// Scanner output with the track catalog.
    pub files_path: String,
    /// Artist metadata table; empty disables geographic enrichment.
    pub artists_path: String,
    /// Directory holding the country/region code-to-name JSON maps.
    pub static_data_path: String,
    /// Root of the music library. Every file under it is servable, so
    /// keep it as narrow as possible.
    pub media_root: String,
    /// Parallel tree for cover art; empty means covers live next to the
    /// media files.
    pub covers_root: String,
    pub host: String,
    pub port: u16,
    pub max_results: i64,
    pub max_results_album_covers: i64,
}

impl Default for MediaServerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            files_path: "../mediascan/out/files.yaml".to_string(),
            artists_path: String::new(),
            static_data_path: "static/json_data".to_string(),
            media_root: "/data/".to_string(),
            covers_root: String::new(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_results: 0,
            max_results_album_covers: 500,
        }
    }
}

impl MediaServerConfig {
    pub fn cover_config(&self) -> CoverConfig {
        let covers_root = if self.covers_root.trim().is_empty() {
            self.media_root.clone()
        } else {
            self.covers_root.clone()
        };
        CoverConfig::new(self.media_root.clone(), covers_root)
    }

    pub fn artists_path(&self) -> Option<&str> {
        let trimmed = self.artists_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {}", err),
            ConfigError::Yaml(err) => write!(f, "yaml error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

pub fn config_path_from_env() -> PathBuf {
    match env::var("MEDIASERVER_CONFIG") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => default_config_path(),
    }
}

fn default_config_path() -> PathBuf {
    match env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join("mediaserver_config.yaml"))
            .unwrap_or_else(|| PathBuf::from("mediaserver_config.yaml")),
        Err(_) => PathBuf::from("mediaserver_config.yaml"),
    }
}

pub fn load_or_create_config(path: &Path) -> Result<(MediaServerConfig, bool), ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        let mut config: MediaServerConfig = serde_yaml::from_str(&contents)?;
        if config.version < CONFIG_VERSION {
            config.version = CONFIG_VERSION;
        }
        if config.port == 0 {
            config.port = 8080;
        }
        if config.host.trim().is_empty() {
            config.host = "0.0.0.0".to_string();
        }
        return Ok((config, false));
    }

    let config = MediaServerConfig::default();
    save_config(path, &config)?;
    Ok((config, true))
}

pub fn save_config(path: &Path, config: &MediaServerConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config)?;
    fs::write(path, contents)?;
    Ok(())
}

pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let raw = PathBuf::from(value);
    if raw.is_absolute() {
        return raw;
    }
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    base.join(raw)
}

#[cfg(test)]
mod tests {
    use super::MediaServerConfig;

    #[test]
    fn empty_covers_root_falls_back_to_media_root() {
        let config = MediaServerConfig {
            media_root: "/data/Music/".to_string(),
            covers_root: String::new(),
            ..MediaServerConfig::default()
        };
        let covers = config.cover_config();
        assert_eq!(covers.covers_root, "/data/Music/");
    }

    #[test]
    fn blank_artists_path_is_none() {
        let config = MediaServerConfig {
            artists_path: "  ".to_string(),
            ..MediaServerConfig::default()
        };
        assert!(config.artists_path().is_none());
    }
}
