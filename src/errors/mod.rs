use log::warn;
use thiserror::Error;

pub type LeagueResult<T> = Result<T, LeagueError>;

/// Failures surfaced to callers of the league services
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LeagueError {
    /// Logs the upstream cause and keeps only a readable message for the caller
    pub fn upstream(service: &str, cause: anyhow::Error) -> Self {
        warn!("{} request failed: {:?}", service, cause);
        LeagueError::UpstreamUnavailable(format!("{} is currently unavailable", service))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, LeagueError::Internal(_))
    }
}

impl From<rusqlite::Error> for LeagueError {
    fn from(e: rusqlite::Error) -> Self {
        LeagueError::Internal(anyhow::Error::new(e).context("Database query failed"))
    }
}

impl From<r2d2::Error> for LeagueError {
    fn from(e: r2d2::Error) -> Self {
        LeagueError::Internal(anyhow::Error::new(e).context("Failed to get database connection from pool"))
    }
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}
