use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{PennyError, Result};
use crate::sync::provider::{Credentials, RemoteBackup, TransferOutcome};

const SNAPSHOT_NAME: &str = "penny.db";
const MANIFEST_NAME: &str = "manifest.json";
const AUTH_MARKER_NAME: &str = ".penny-auth.json";

#[derive(Debug, Serialize, Deserialize)]
struct AuthMarker {
    client_id: String,
    secret_sha256: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    timestamp: i64,
    checksum: String,
    size_bytes: u64,
}

/// Backup provider that snapshots the database into a vault directory,
/// typically one kept inside a cloud-synced folder. The sync orchestrator
/// quiesces the store before any transfer, so the database file can be
/// copied and replaced wholesale here.
pub struct VaultBackup {
    db_path: PathBuf,
    vault_dir: PathBuf,
    credentials: Credentials,
}

impl VaultBackup {
    pub fn new(db_path: &Path, vault_dir: &Path, credentials: Credentials) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
            vault_dir: vault_dir.to_path_buf(),
            credentials,
        }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.vault_dir.join(SNAPSHOT_NAME)
    }

    fn manifest_path(&self) -> PathBuf {
        self.vault_dir.join(MANIFEST_NAME)
    }

    fn marker_path(&self) -> PathBuf {
        self.vault_dir.join(AUTH_MARKER_NAME)
    }

    fn secret_digest(&self) -> String {
        hex::encode(Sha256::digest(self.credentials.client_secret.as_bytes()))
    }

    fn read_manifest(&self) -> Option<Manifest> {
        let content = std::fs::read_to_string(self.manifest_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn write_json(&self, path: &Path, json: String) -> Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, format!("{json}\n"))?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Copy `src` to `dest` through a temp file in the destination directory
    /// so a torn copy never replaces a good file.
    fn copy_atomic(src: &Path, dest: &Path) -> Result<String> {
        let bytes = std::fs::read(src)?;
        let checksum = hex::encode(Sha256::digest(&bytes));
        let tmp = dest.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, dest)?;
        Ok(checksum)
    }

    fn require_auth(&self) -> Result<Option<TransferOutcome>> {
        if self.is_authenticated()? {
            Ok(None)
        } else {
            Ok(Some(TransferOutcome::failed(
                "Not authenticated with the backup vault",
            )))
        }
    }
}

impl RemoteBackup for VaultBackup {
    fn is_authenticated(&self) -> Result<bool> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&path)?;
        let marker: AuthMarker = match serde_json::from_str(&content) {
            Ok(m) => m,
            Err(_) => return Ok(false),
        };
        Ok(marker.client_id == self.credentials.client_id
            && marker.secret_sha256 == self.secret_digest())
    }

    fn authenticate(&self) -> Result<()> {
        std::fs::create_dir_all(&self.vault_dir)?;
        let marker = AuthMarker {
            client_id: self.credentials.client_id.clone(),
            secret_sha256: self.secret_digest(),
        };
        let json = serde_json::to_string_pretty(&marker)
            .map_err(|e| PennyError::Transfer(e.to_string()))?;
        self.write_json(&self.marker_path(), json)?;
        info!("authenticated with vault at {}", self.vault_dir.display());
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        let path = self.marker_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn push(&self) -> Result<TransferOutcome> {
        if let Some(failure) = self.require_auth()? {
            return Ok(failure);
        }
        if !self.db_path.exists() {
            return Ok(TransferOutcome::failed("Local database file not found"));
        }

        std::fs::create_dir_all(&self.vault_dir)?;
        let checksum = Self::copy_atomic(&self.db_path, &self.snapshot_path())?;
        let timestamp = Utc::now().timestamp();
        let manifest = Manifest {
            timestamp,
            checksum,
            size_bytes: std::fs::metadata(self.snapshot_path())?.len(),
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| PennyError::Transfer(e.to_string()))?;
        self.write_json(&self.manifest_path(), json)?;

        info!("pushed snapshot to {}", self.vault_dir.display());
        Ok(TransferOutcome::ok(timestamp))
    }

    fn pull(&self) -> Result<TransferOutcome> {
        if let Some(failure) = self.require_auth()? {
            return Ok(failure);
        }
        let snapshot = self.snapshot_path();
        if !snapshot.exists() {
            return Ok(TransferOutcome::failed("No snapshot in the vault yet"));
        }

        if let Some(manifest) = self.read_manifest() {
            let bytes = std::fs::read(&snapshot)?;
            let checksum = hex::encode(Sha256::digest(&bytes));
            if checksum != manifest.checksum {
                return Ok(TransferOutcome::failed(
                    "Vault snapshot failed checksum verification",
                ));
            }
        }

        Self::copy_atomic(&snapshot, &self.db_path)?;
        info!("pulled snapshot from {}", self.vault_dir.display());
        Ok(TransferOutcome::ok(Utc::now().timestamp()))
    }

    fn sync(&self) -> Result<TransferOutcome> {
        if let Some(failure) = self.require_auth()? {
            return Ok(failure);
        }
        let manifest = match self.read_manifest() {
            None => {
                debug!("no vault manifest; bidirectional sync falls back to push");
                return self.push();
            }
            Some(m) => m,
        };

        let local_modified = std::fs::metadata(&self.db_path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        if manifest.timestamp > local_modified {
            self.pull()
        } else {
            self.push()
        }
    }
}
