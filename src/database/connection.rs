use anyhow::{Context, Result};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Transaction, TransactionBehavior};
use std::time::Duration;

use crate::errors::LeagueResult;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT_MS: u64 = 5000;

pub fn create_pool(database_path: &str) -> Result<DbPool> {
    let manager = build_manager(database_path);
    build_pool(manager)
}

fn build_manager(path: &str) -> SqliteConnectionManager {
    SqliteConnectionManager::file(path).with_init(|conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
    })
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    r2d2::Pool::builder()
        .build(manager)
        .context("Failed to create database connection pool")
}

pub fn get_connection(pool: &DbPool) -> Result<DbConn> {
    pool.get()
        .context("Failed to get database connection from pool")
}

/// Runs `work` inside a `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken up front, so concurrent read-modify-write operations
/// are serialised. Commits on `Ok`, rolls back on `Err`.
pub fn in_transaction<T, F>(pool: &DbPool, work: F) -> LeagueResult<T>
where
    F: FnOnce(&Transaction<'_>) -> LeagueResult<T>,
{
    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Fresh schema in a throwaway file under the temp directory
#[cfg(test)]
pub fn create_test_pool() -> DbPool {
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "school_league_test_{}_{}.db",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);

    let pool = create_pool(&path.to_string_lossy()).unwrap();
    let conn = get_connection(&pool).unwrap();
    super::setup::ensure_schema(&conn).unwrap();
    pool
}
