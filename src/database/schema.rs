//! Database schema and migrations
//!
//! Embedded SQL migrations, applied in order inside a transaction and
//! tracked in a `migrations` table so startup is idempotent.

use sqlx::{PgPool, Row};

use super::DatabaseError;

/// Initialize database with schema
pub async fn initialize_database(pool: &PgPool) -> Result<(), DatabaseError> {
    tracing::info!("Initializing database schema");

    // Create migrations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Get current version
    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!("Current database version: {}", current_version);

    apply_migrations(pool, current_version).await?;

    tracing::info!("Database initialization complete");
    Ok(())
}

async fn apply_migrations(pool: &PgPool, current_version: i32) -> Result<(), DatabaseError> {
    for (version, sql) in get_migrations() {
        if version > current_version {
            tracing::info!("Applying migration version {}", version);

            let mut tx = pool.begin().await?;

            for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
                sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                    DatabaseError::Migration(format!("migration {} failed: {}", version, e))
                })?;
            }

            sqlx::query("INSERT INTO migrations (version) VALUES ($1)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            tracing::info!("Migration version {} applied successfully", version);
        }
    }

    Ok(())
}

fn get_migrations() -> Vec<(i32, &'static str)> {
    vec![(1, include_str!("migrations/001_initial_schema.sql"))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered_and_nonempty() {
        let migrations = get_migrations();
        assert!(!migrations.is_empty());

        let mut last = 0;
        for (version, sql) in migrations {
            assert!(version > last, "versions must be strictly increasing");
            assert!(!sql.trim().is_empty(), "migration {} is empty", version);
            last = version;
        }
    }
}
