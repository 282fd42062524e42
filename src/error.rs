use thiserror::Error;

#[derive(Debug, Error)]
pub enum PennyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Constraint violated: {0}")]
    Integrity(String),

    #[error("Sync not configured. Set google_client_id and google_client_secret first.")]
    NotConfigured,

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Store is closed while a sync is in progress. Retry in a moment.")]
    StoreUnavailable,

    #[error("Another sync operation is already running")]
    SyncInProgress,

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PennyError>;

/// Convert a rusqlite error into `Integrity` when it carries a SQLite
/// constraint-violation code, leaving everything else as `Db`.
pub fn integrity_from(err: rusqlite::Error) -> PennyError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            PennyError::Integrity(
                msg.clone().unwrap_or_else(|| "constraint violation".to_string()),
            )
        }
        _ => PennyError::Db(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_from_maps_constraint_failures() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT NOT NULL UNIQUE)").unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('a')", []).unwrap();
        let err = conn.execute("INSERT INTO t (v) VALUES ('a')", []).unwrap_err();
        match integrity_from(err) {
            PennyError::Integrity(_) => {}
            other => panic!("expected Integrity, got {other:?}"),
        }
    }

    #[test]
    fn test_integrity_from_passes_other_errors_through() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM missing", []).unwrap_err();
        match integrity_from(err) {
            PennyError::Db(_) => {}
            other => panic!("expected Db, got {other:?}"),
        }
    }
}
