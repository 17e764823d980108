use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::debug;

const SCHEMA: &str = include_str!("../../schema.sql");

#[derive(Clone)]
pub(crate) struct Db {
    pool: Pool<Sqlite>,
}

impl Db {
    pub(crate) async fn get_connection(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }
}

fn is_in_memory(conn_string: &str) -> bool {
    conn_string.trim_start_matches("sqlite:").starts_with(":memory:")
}

pub(crate) async fn init(conn_string: &str) -> Result<Db> {
    let options = SqliteConnectOptions::from_str(conn_string)
        .with_context(|| format!("invalid database url {conn_string:?}"))?
        .create_if_missing(true);

    // An in-memory database lives as long as its connection, so keep exactly one open.
    let pool_options = if is_in_memory(conn_string) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new()
    };

    debug!("initializing database connection");
    let pool = pool_options
        .connect_with(options)
        .await
        .context("error connecting to database")?;

    debug!("running schema");
    sqlx::query(SCHEMA)
        .execute(&pool)
        .await
        .context("error running schema")?;

    Ok(Db { pool })
}
