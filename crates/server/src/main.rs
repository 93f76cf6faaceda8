mod api;
mod config;
mod state;
mod utils;

use std::sync::Arc;

use api::api_router;
use catalog::{Catalog, CatalogHandle};
use config::{config_path_from_env, load_or_create_config, resolve_path};
use parking_lot::RwLock;
use query::Places;
use state::AppState;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = config_path_from_env();
    let (config, created) = load_or_create_config(&config_path)?;
    if created {
        info!("Created default config at {:?}", config_path);
    } else {
        info!("Loaded config from {:?}", config_path);
    }

    let places = Places::load(&resolve_path(&config_path, &config.static_data_path));

    let files_path = resolve_path(&config_path, &config.files_path);
    let artists_path = config
        .artists_path()
        .map(|value| resolve_path(&config_path, value));
    let catalog = match Catalog::load(&files_path, artists_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(
                "Failed to load catalog from {:?} ({}); starting empty, POST /api/reload after fixing it",
                files_path, err
            );
            Catalog::empty()
        }
    };

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        catalog: CatalogHandle::new(catalog),
        places: Arc::new(places),
        config: Arc::new(RwLock::new(config)),
        config_path,
    };

    let app = api_router(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = match signal(SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(err) => {
                warn!("Failed to install terminate signal handler: {}", err);
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", err);
        }
    }

    info!("Shutdown signal received.");
}
