use crate::error::Result;

/// OAuth-style credentials read from the settings store. Their presence is
/// what makes sync "configured".
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Result of a push/pull/bidirectional transfer as reported by a provider.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub success: bool,
    pub timestamp: Option<i64>,
    pub error: Option<String>,
}

impl TransferOutcome {
    pub fn ok(timestamp: i64) -> Self {
        Self {
            success: true,
            timestamp: Some(timestamp),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            timestamp: None,
            error: Some(error.into()),
        }
    }
}

/// An opaque remote backup target. Transfers are invoked only while the
/// local store is quiesced; implementations may freely read and replace the
/// database file. Expected failures (not authenticated, nothing to pull)
/// come back as failed outcomes; `Err` is reserved for I/O-level trouble.
pub trait RemoteBackup: Send + Sync {
    fn is_authenticated(&self) -> Result<bool>;
    fn authenticate(&self) -> Result<()>;
    fn logout(&self) -> Result<()>;
    fn push(&self) -> Result<TransferOutcome>;
    fn pull(&self) -> Result<TransferOutcome>;
    fn sync(&self) -> Result<TransferOutcome>;
}
