use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use catalog::Catalog;
use common::AlbumInfo;
use query::{
    albums, artist_cloud, artist_counts, city_counts, country_code_counts, cover_path,
    existing_cover_path, filter_records, genre_cloud, genre_counts, pick_one, region_code_counts,
    tracks, CloudEntry, PickError, QueryArgs,
};
use tracing::{debug, warn};

use crate::config::resolve_path;
use crate::state::{
    AppState, CountEntry, HealthResponse, JsonResult, ListResponse, ReloadResponse, TrackResponse,
};
use crate::utils::{file_response, json_error, json_error_response, path_under_root};

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tracks", get(get_tracks))
        .route("/api/track", get(get_random_track))
        .route("/api/albums", get(get_albums))
        .route("/api/genres", get(get_genres))
        .route("/api/artists", get(get_artists))
        .route("/api/countries", get(get_countries))
        .route("/api/regions", get(get_regions))
        .route("/api/cities", get(get_cities))
        .route("/api/genres-cloud", get(get_genres_cloud))
        .route("/api/artists-cloud", get(get_artists_cloud))
        .route("/api/reload", post(reload_catalog))
        .route("/getfile/*path", get(get_file))
        .route("/cover/*path", get(get_cover))
        .with_state(state)
}

type RawQuery = Query<Vec<(String, String)>>;

fn decode_args(
    pairs: &[(String, String)],
) -> Result<QueryArgs, (StatusCode, Json<crate::state::ErrorResponse>)> {
    QueryArgs::from_pairs(pairs)
        .map_err(|err| json_error(StatusCode::BAD_REQUEST, err.to_string()))
}

fn track_response(record: &common::MediaRecord, covers: &query::CoverConfig) -> TrackResponse {
    TrackResponse {
        path: record.path.clone(),
        cover_path: cover_path(&record.path, covers),
        title: record.title.clone(),
        artist: record.artist.clone(),
        album: record.album.clone(),
        genre: record.genre.clone(),
        year: record.year,
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_tracks(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<ListResponse<TrackResponse>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    let ordered = tracks(filtered, &args);
    let covers = state.config.read().cover_config();
    let items: Vec<TrackResponse> = ordered
        .iter()
        .map(|record| track_response(record, &covers))
        .collect();
    let total = items.len();
    Ok(Json(ListResponse { items, total }))
}

async fn get_random_track(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<TrackResponse> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    match pick_one(&filtered) {
        Ok(record) => {
            let covers = state.config.read().cover_config();
            Ok(Json(track_response(record, &covers)))
        }
        Err(PickError::Empty) => Err(json_error(
            StatusCode::NOT_FOUND,
            "no tracks match the given filters",
        )),
    }
}

async fn get_albums(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<ListResponse<AlbumInfo>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    let (covers, max_results) = {
        let config = state.config.read();
        (config.cover_config(), config.max_results_album_covers)
    };
    let items = albums(&filtered, args.sort, &covers, max_results);
    let total = items.len();
    Ok(Json(ListResponse { items, total }))
}

async fn get_genres(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CountEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    Ok(Json(counts_response(genre_counts(&filtered, args.sort))))
}

async fn get_artists(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CountEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    Ok(Json(counts_response(artist_counts(&filtered, args.sort))))
}

async fn get_countries(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CountEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    Ok(Json(counts_response(country_code_counts(
        snapshot.artists(),
        args.sort,
    ))))
}

async fn get_regions(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CountEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    Ok(Json(counts_response(region_code_counts(
        snapshot.artists(),
        args.sort,
    ))))
}

async fn get_cities(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CountEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    Ok(Json(counts_response(city_counts(
        snapshot.artists(),
        &state.places,
        args.sort,
    ))))
}

async fn get_genres_cloud(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CloudEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    Ok(Json(genre_cloud(&filtered)))
}

async fn get_artists_cloud(
    State(state): State<AppState>,
    Query(pairs): RawQuery,
) -> JsonResult<Vec<CloudEntry>> {
    let args = decode_args(&pairs)?;
    let snapshot = state.catalog.snapshot();
    let filtered = filter_records(&snapshot, &args);
    Ok(Json(artist_cloud(&filtered)))
}

async fn reload_catalog(State(state): State<AppState>) -> JsonResult<ReloadResponse> {
    let (files_path, artists_path) = {
        let config = state.config.read();
        (
            resolve_path(&state.config_path, &config.files_path),
            config
                .artists_path()
                .map(|value| resolve_path(&state.config_path, value)),
        )
    };
    match Catalog::load(&files_path, artists_path.as_deref()) {
        Ok(catalog) => {
            let stats = catalog.stats();
            state.catalog.install(catalog);
            Ok(Json(ReloadResponse {
                records: stats.records,
                artists: stats.artists,
            }))
        }
        Err(err) => Err(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("catalog reload failed: {}", err),
        )),
    }
}

async fn get_file(State(state): State<AppState>, AxumPath(path): AxumPath<String>) -> Response {
    let path = ensure_leading_slash(path);
    let media_root = state.config.read().media_root.clone();
    if !is_servable(&path, &media_root) {
        warn!(
            "Refusing to serve {} outside media root {}",
            path, media_root
        );
        return json_error_response(StatusCode::NOT_FOUND, "file not found");
    }
    debug!("Serving media file {}", path);
    serve_file(std::path::PathBuf::from(path)).await
}

async fn get_cover(State(state): State<AppState>, AxumPath(path): AxumPath<String>) -> Response {
    let path = ensure_leading_slash(path);
    let covers = state.config.read().cover_config();
    if !is_servable(&path, &covers.covers_root) && !is_servable(&path, &covers.media_root) {
        warn!("Refusing to serve cover {} outside configured roots", path);
        return json_error_response(StatusCode::NOT_FOUND, "cover not found");
    }
    match existing_cover_path(&path) {
        Some(resolved) => serve_file(resolved).await,
        None => json_error_response(StatusCode::NOT_FOUND, "cover not found"),
    }
}

async fn serve_file(path: std::path::PathBuf) -> Response {
    match tokio::fs::read(&path).await {
        Ok(data) => file_response(&path, data),
        Err(err) => {
            warn!("Failed to read {:?}: {}", path, err);
            json_error_response(StatusCode::NOT_FOUND, "file not found")
        }
    }
}

fn counts_response(counts: Vec<(String, usize)>) -> Vec<CountEntry> {
    counts.into_iter().map(CountEntry::from).collect()
}

fn ensure_leading_slash(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

fn is_servable(path: &str, root: &str) -> bool {
    if path.split('/').any(|part| part == "..") {
        return false;
    }
    path_under_root(path, root)
}
