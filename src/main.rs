//! KYUCSA Content Backend
//!
//! Serves the association website's content and the admin dashboard's CRUD API,
//! storing collections in a local SQLite key-value table or a hosted REST table.

mod api;
mod auth;
mod browse;
mod chat;
mod config;
mod db;
mod errors;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, StoreBackendKind};
use models::{Announcement, Event, Partner, PresidentMessage, Project, Session};
use store::{ContentStore, LocalStorage, RemoteStorage, StorageBackend};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting KYUCSA Content Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_key.is_none() {
        tracing::warn!("No admin key configured (KYUCSA_ADMIN_KEY). Admin routes are open!");
    }

    // Initialize storage
    let backend: Arc<dyn StorageBackend> = match (config.backend, &config.remote) {
        (StoreBackendKind::Remote, Some(remote)) => {
            tracing::info!("Remote store: {}/{}", remote.url, remote.table);
            Arc::new(RemoteStorage::new(remote))
        }
        _ => {
            tracing::info!("Local store: {:?}", config.db_path);
            let pool = db::init_database(&config.db_path).await?;
            Arc::new(LocalStorage::new(pool))
        }
    };
    let store = Arc::new(ContentStore::new(backend));
    tracing::info!("Content store ready ({} backend)", store.backend_name());

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Public read route and admin write routes for one flat collection.
fn collection_routes<T: models::Record>(
    public: Router<AppState>,
    admin: Router<AppState>,
    path: &str,
) -> (Router<AppState>, Router<AppState>) {
    let public = public.route(path, get(api::list_records::<T>));
    let admin = admin
        .route(
            path,
            post(api::create_record::<T>).put(api::replace_records::<T>),
        )
        .route(
            &format!("{}/{{id}}", path),
            put(api::update_record::<T>).delete(api::delete_record::<T>),
        );
    (public, admin)
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_key = state.config.admin_key.clone();

    let public = Router::new()
        .route("/notes", get(api::list_notes))
        .route("/notes/browse", get(api::browse_notes))
        .route("/notes/{id}/download", post(api::download_note))
        .route("/leadership", get(api::get_leadership))
        .route("/leadership/{year}", get(api::get_term))
        .route("/settings", get(api::get_settings))
        .route("/chat", post(api::chat_reply));

    let admin = Router::new()
        .route("/notes", post(api::create_note).put(api::replace_notes))
        .route("/notes/{id}", put(api::update_note).delete(api::delete_note))
        .route("/leadership", put(api::replace_leadership))
        .route("/leadership/{year}", axum::routing::delete(api::delete_term))
        .route(
            "/leadership/{year}/president",
            put(api::set_president).delete(api::clear_president),
        )
        .route("/leadership/{year}/executives", post(api::add_executive))
        .route(
            "/leadership/{year}/executives/{id}",
            put(api::update_executive).delete(api::delete_executive),
        )
        .route("/settings", put(api::update_settings));

    let (public, admin) = collection_routes::<Project>(public, admin, "/projects");
    let (public, admin) = collection_routes::<Session>(public, admin, "/sessions");
    let (public, admin) = collection_routes::<Event>(public, admin, "/events");
    let (public, admin) = collection_routes::<Announcement>(public, admin, "/announcements");
    let (public, admin) = collection_routes::<Partner>(public, admin, "/partners");
    let (public, admin) = collection_routes::<PresidentMessage>(public, admin, "/messages");

    // Apply admin key middleware
    let admin = admin.layer(middleware::from_fn(move |req, next| {
        auth::admin_key_layer(admin_key.clone(), req, next)
    }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public.nest("/admin", admin))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
