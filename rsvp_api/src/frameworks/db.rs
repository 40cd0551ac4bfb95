use std::fmt;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::{postgres::PgPoolOptions, PgPool};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug)]
pub enum DbError {
    Connect(sqlx::Error),
    Migrate(MigrateError),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::Connect(err) => write!(f, "guest database connection failed: {err}"),
            DbError::Migrate(err) => write!(f, "guest database migration failed: {err}"),
        }
    }
}

impl std::error::Error for DbError {}

// Connect to the guest database and bring the schema up to date.
pub async fn open_guest_database(database_url: &str) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(DbError::Connect)?;

    MIGRATOR.run(&pool).await.map_err(DbError::Migrate)?;
    Ok(pool)
}
