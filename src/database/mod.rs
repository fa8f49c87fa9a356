pub mod connection;
pub mod models;
pub mod players;
pub mod recruits;
pub mod setup;
pub mod teams;

pub use connection::{create_pool, get_connection, in_transaction, DbConn, DbPool};
pub use models::*;

use rusqlite::types::Type;
use std::str::FromStr;

/// Reads a nullable TEXT column holding an enum's text form
pub(crate) fn text_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        text.parse::<T>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Same as [`text_column`] for NOT NULL columns
pub(crate) fn required_text_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text_column(row, idx)?.ok_or(rusqlite::Error::InvalidColumnType(
        idx,
        "NULL".to_string(),
        Type::Null,
    ))
}
