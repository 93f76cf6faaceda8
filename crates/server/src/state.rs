use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use catalog::CatalogHandle;
use parking_lot::RwLock;
use query::Places;
use serde::Serialize;

use crate::config::MediaServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogHandle,
    pub places: Arc<Places>,
    pub config: Arc<RwLock<MediaServerConfig>>,
    pub config_path: PathBuf,
}

pub type JsonResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

impl From<(String, usize)> for CountEntry {
    fn from((name, count): (String, usize)) -> Self {
        Self { name, count }
    }
}

#[derive(Serialize)]
pub struct TrackResponse {
    pub path: String,
    pub cover_path: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: i32,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub records: usize,
    pub artists: usize,
}
