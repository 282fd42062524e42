pub mod provider;
pub mod vault;

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::error::{PennyError, Result};
use crate::settings;
use crate::store::Store;
use crate::sync::provider::{Credentials, RemoteBackup, TransferOutcome};
use crate::sync::vault::VaultBackup;

const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub connected: bool,
    pub last_sync: Option<i64>,
}

impl SyncStatus {
    fn disconnected() -> Self {
        Self {
            connected: false,
            last_sync: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TransferKind {
    Push,
    Pull,
    Bidirectional,
}

impl TransferKind {
    fn name(self) -> &'static str {
        match self {
            TransferKind::Push => "push",
            TransferKind::Pull => "pull",
            TransferKind::Bidirectional => "sync",
        }
    }
}

type ProviderFactory =
    Box<dyn Fn(&Store, Credentials) -> Result<Arc<dyn RemoteBackup>> + Send + Sync>;

/// Writing either credential setting must invalidate the cached session.
pub fn is_credential_key(key: &str) -> bool {
    key == settings::GOOGLE_CLIENT_ID || key == settings::GOOGLE_CLIENT_SECRET
}

/// Owns the remote backup session and the sync lifecycle. The session handle
/// is built lazily from the credential settings and cached until it is
/// invalidated; transfers serialize through a gate so only one quiesce →
/// transfer → reopen sequence can be in flight at a time (a second request
/// is rejected, not queued).
pub struct SyncContext {
    factory: ProviderFactory,
    session: Mutex<Option<Arc<dyn RemoteBackup>>>,
    gate: Mutex<()>,
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncContext {
    pub fn new() -> Self {
        Self::with_factory(Box::new(default_factory))
    }

    pub fn with_factory(factory: ProviderFactory) -> Self {
        Self {
            factory,
            session: Mutex::new(None),
            gate: Mutex::new(()),
        }
    }

    /// Drop the cached session handle so the next operation rebuilds it from
    /// the current credential settings. Safe to call with no session cached.
    pub fn invalidate(&self) {
        let mut cached = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if cached.take().is_some() {
            info!("sync session invalidated");
        }
    }

    /// The current session, building one if credentials exist. `Ok(None)`
    /// means sync simply isn't configured — a distinct, non-fatal condition.
    fn session(&self, store: &Store) -> Result<Option<Arc<dyn RemoteBackup>>> {
        let mut cached = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = cached.as_ref() {
            return Ok(Some(handle.clone()));
        }

        let (client_id, client_secret) = store.with(|conn| {
            Ok((
                settings::get_setting(conn, settings::GOOGLE_CLIENT_ID)?,
                settings::get_setting(conn, settings::GOOGLE_CLIENT_SECRET)?,
            ))
        })?;
        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Ok(None);
        };

        let handle = (self.factory)(
            store,
            Credentials {
                client_id,
                client_secret,
            },
        )?;
        *cached = Some(handle.clone());
        Ok(Some(handle))
    }

    /// Connection state plus the last successful sync time. Never a hard
    /// error: anything going wrong along the way reads as "not connected".
    pub fn status(&self, store: &Store) -> SyncStatus {
        let session = match self.session(store) {
            Ok(Some(session)) => session,
            _ => return SyncStatus::disconnected(),
        };
        let connected = match session.is_authenticated() {
            Ok(connected) => connected,
            Err(e) => {
                warn!("sync status check failed: {e}");
                return SyncStatus::disconnected();
            }
        };
        let last_sync = store
            .with(settings::last_sync_timestamp)
            .unwrap_or_default();
        SyncStatus { connected, last_sync }
    }

    pub fn authenticate(&self, store: &Store) -> Result<()> {
        let session = self.session(store)?.ok_or(PennyError::NotConfigured)?;
        session.authenticate()
    }

    /// Log out and discard the session handle; the next operation rebuilds
    /// from scratch. A no-op when sync isn't configured.
    pub fn logout(&self, store: &Store) -> Result<()> {
        if let Some(session) = self.session(store)? {
            session.logout()?;
        }
        self.invalidate();
        Ok(())
    }

    pub fn push(&self, store: &Store) -> Result<TransferOutcome> {
        self.transfer(store, TransferKind::Push)
    }

    pub fn pull(&self, store: &Store) -> Result<TransferOutcome> {
        self.transfer(store, TransferKind::Pull)
    }

    pub fn sync_bidirectional(&self, store: &Store) -> Result<TransferOutcome> {
        self.transfer(store, TransferKind::Bidirectional)
    }

    /// The three-phase transfer protocol: quiesce the store, hand the file
    /// to the provider (bounded by the transfer timeout), then reopen — the
    /// reopen runs on every path out of the transfer, including provider
    /// errors, timeouts and panics. Only a successful transfer advances
    /// `last_sync_timestamp`.
    fn transfer(&self, store: &Store, kind: TransferKind) -> Result<TransferOutcome> {
        let session = self.session(store)?.ok_or(PennyError::NotConfigured)?;
        let _gate = match self.gate.try_lock() {
            Ok(gate) => gate,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(PennyError::SyncInProgress),
        };
        let timeout = transfer_timeout(store);

        info!("starting {} transfer", kind.name());
        let quiesced = store.quiesce()?;
        let result = run_with_timeout(timeout, session, kind);
        quiesced.reopen()?;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{} transfer failed: {e}", kind.name());
                TransferOutcome::failed(e.to_string())
            }
        };

        if outcome.success {
            if let Some(timestamp) = outcome.timestamp {
                store.with(|conn| {
                    settings::set_setting(
                        conn,
                        settings::LAST_SYNC_TIMESTAMP,
                        &timestamp.to_string(),
                    )
                })?;
            }
            info!("{} transfer complete", kind.name());
        }
        Ok(outcome)
    }
}

/// Run the provider call on a worker thread and give up after `timeout`.
/// The worker finishing late is harmless: it only touches vault files and
/// its result is discarded.
fn run_with_timeout(
    timeout: Duration,
    session: Arc<dyn RemoteBackup>,
    kind: TransferKind,
) -> Result<TransferOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match kind {
            TransferKind::Push => session.push(),
            TransferKind::Pull => session.pull(),
            TransferKind::Bidirectional => session.sync(),
        };
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(PennyError::Transfer(format!(
            "transfer timed out after {}s",
            timeout.as_secs()
        ))),
        Err(RecvTimeoutError::Disconnected) => {
            Err(PennyError::Transfer("transfer aborted unexpectedly".into()))
        }
    }
}

fn transfer_timeout(store: &Store) -> Duration {
    let secs = store
        .with(|conn| settings::get_setting(conn, settings::SYNC_TIMEOUT_SECS))
        .ok()
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn default_factory(store: &Store, credentials: Credentials) -> Result<Arc<dyn RemoteBackup>> {
    let remote_dir = store
        .with(|conn| settings::get_setting(conn, settings::SYNC_REMOTE_DIR))?
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            store
                .path()
                .parent()
                .map(|p| p.join("remote"))
                .unwrap_or_else(|| PathBuf::from("remote"))
        });
    Ok(Arc::new(VaultBackup::new(store.path(), &remote_dir, credentials)))
}
