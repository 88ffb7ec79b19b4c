use sqlx::PgPool;

/// Shared application state carried by the router.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
