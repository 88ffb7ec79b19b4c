use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use notes_api_rust::handlers::{auth, notes};
use notes_api_rust::middleware::jwt_auth_middleware;
use notes_api_rust::state::AppState;
use notes_api_rust::{config, database};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!("startup failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = config::config();
    tracing::info!("Starting notes API in {:?} mode", config.environment);

    anyhow::ensure!(
        !config.security.jwt_secret.is_empty(),
        "JWT_SECRET must be set"
    );

    let pool = database::connect()
        .await
        .context("database connection failed")?;

    database::schema::initialize_database(&pool)
        .await
        .context("schema initialization failed")?;

    let app = app(AppState { pool });

    // Allow tests or deployments to override port via env
    let port = std::env::var("NOTES_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("notes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_routes())
        // Protected note/category routes
        .merge(note_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(notes::note_list).post(notes::note_post))
        .route(
            "/api/notes/category",
            get(notes::category_list).post(notes::category_post),
        )
        .route("/api/notes/category/:category_id", get(notes::category_notes))
        .route(
            "/api/notes/:id",
            get(notes::note_get)
                .put(notes::note_put)
                .delete(notes::note_delete),
        )
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Notes API (Rust)",
        "version": version,
        "description": "Multi-tenant note-taking REST API",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/auth/register, /api/auth/login (public - token acquisition)",
            "notes": "/api/notes[/:id] (protected)",
            "categories": "/api/notes/category[/:categoryId] (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
