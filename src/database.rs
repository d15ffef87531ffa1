use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;

/// Tables the service reads or writes; `schema.sql` creates them.
pub const REQUIRED_TABLES: [&str; 4] = ["buildings", "comments", "tasks", "users"];

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        log::info!("🔗 Connecting to database (pool size {})...", max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to the database")?;

        log::info!("✅ Database connection established");

        Ok(Database { pool })
    }

    pub async fn ping(&self) -> Result<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to execute health check query")?;

        anyhow::ensure!(one == 1, "Database health check returned {}", one);
        Ok(())
    }

    /// Required tables absent from the `public` schema.
    pub async fn missing_tables(&self) -> Result<Vec<&'static str>> {
        let present: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = 'public' AND table_name::text = ANY($1)",
        )
        .bind(&REQUIRED_TABLES[..])
        .fetch_all(&self.pool)
        .await
        .context("Failed to check database tables")?;

        Ok(REQUIRED_TABLES
            .into_iter()
            .filter(|table| !present.iter().any(|found| found.as_str() == *table))
            .collect())
    }

    pub async fn verify_schema(&self) -> Result<()> {
        let missing = self.missing_tables().await?;
        if missing.is_empty() {
            log::info!("✅ All required tables exist");
        } else {
            log::warn!("⚠️  Missing tables: {:?}. Apply schema.sql before serving traffic", missing);
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<DatabaseStats> {
        sqlx::query_as::<_, DatabaseStats>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM buildings) AS buildings,
                (SELECT COUNT(*) FROM tasks) AS tasks,
                (SELECT COUNT(*) FROM comments) AS comments",
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to get database statistics")
    }
}

/// Row counts per table, shown by `/health` and at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct DatabaseStats {
    pub users: i64,
    pub buildings: i64,
    pub tasks: i64,
    pub comments: i64,
}

impl DatabaseStats {
    pub fn log_stats(&self) {
        log::info!(
            "📈 {} users, {} buildings, {} tasks, {} comments",
            self.users,
            self.buildings,
            self.tasks,
            self.comments
        );
    }
}
