use rusqlite::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    #[error("decimal parse error: {0}")]
    Decimal(#[from] rust_decimal::Error),
    #[error("time parse error: {0}")]
    TimeParse(#[from] chrono::ParseError),
    /// Another writer holds the database; the whole unit of work can be retried.
    #[error("write conflict: {0}")]
    Conflict(String),
    #[error("project {0} does not exist")]
    MissingProject(i64),
}

impl DbError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, DbError::Conflict(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                tracing::debug!(error = %err, "sqlite reported a busy database");
                DbError::Conflict(err.to_string())
            }
            _ => DbError::Sqlite(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
