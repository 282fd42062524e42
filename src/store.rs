use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{error, info};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::{PennyError, Result};

/// Process-wide handle to the expense database with a strict open/closed
/// lifecycle. The connection is open for the whole life of the store except
/// during a sync quiesce window, when it is the sync orchestrator's job to
/// close and reopen it around the transfer.
pub struct Store {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        info!("store opened at {}", db_path.display());
        Ok(Self {
            path: db_path.to_path_buf(),
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the live connection, or fail with `StoreUnavailable`
    /// if the store is quiesced. Never blocks on a closed store.
    pub fn with<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(PennyError::StoreUnavailable),
        }
    }

    /// Close the store for a sync transfer. The returned guard reopens the
    /// store when dropped, so no exit path out of the transfer can leave the
    /// store closed.
    pub fn quiesce(&self) -> Result<Quiesced<'_>> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let conn = guard.take().ok_or(PennyError::StoreUnavailable)?;
        drop(conn);
        info!("store quiesced for sync");
        Ok(Quiesced {
            store: self,
            reopened: false,
        })
    }

    fn reopen(&self) -> Result<()> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return Ok(());
        }
        let conn = get_connection(&self.path)?;
        init_db(&conn)?;
        *guard = Some(conn);
        info!("store reopened");
        Ok(())
    }
}

/// RAII token for a quiesced store. Call `reopen` to surface reopen errors;
/// if the token is dropped without it (early return, panic in the transfer),
/// `Drop` reopens anyway. A reopen failure in the backstop is fatal: the
/// process has no usable store left.
pub struct Quiesced<'a> {
    store: &'a Store,
    reopened: bool,
}

impl Quiesced<'_> {
    pub fn reopen(mut self) -> Result<()> {
        self.reopened = true;
        self.store.reopen()
    }
}

impl Drop for Quiesced<'_> {
    fn drop(&mut self) {
        if self.reopened {
            return;
        }
        if let Err(e) = self.store.reopen() {
            error!("failed to reopen store after sync: {e}");
            panic!("store could not be reopened after sync: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn category_count(store: &Store) -> Result<i64> {
        store.with(|conn| {
            Ok(conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0))?)
        })
    }

    #[test]
    fn test_with_runs_queries() {
        let (_dir, store) = test_store();
        assert_eq!(category_count(&store).unwrap(), 10);
    }

    #[test]
    fn test_quiesced_store_rejects_access() {
        let (_dir, store) = test_store();
        let quiesced = store.quiesce().unwrap();
        match category_count(&store) {
            Err(PennyError::StoreUnavailable) => {}
            other => panic!("expected StoreUnavailable, got {other:?}"),
        }
        quiesced.reopen().unwrap();
        assert_eq!(category_count(&store).unwrap(), 10);
    }

    #[test]
    fn test_drop_reopens_store() {
        let (_dir, store) = test_store();
        {
            let _quiesced = store.quiesce().unwrap();
        }
        assert_eq!(category_count(&store).unwrap(), 10);
    }

    #[test]
    fn test_second_quiesce_rejected_while_closed() {
        let (_dir, store) = test_store();
        let quiesced = store.quiesce().unwrap();
        match store.quiesce() {
            Err(PennyError::StoreUnavailable) => {}
            other => panic!("expected StoreUnavailable, got {:?}", other.map(|_| ())),
        }
        quiesced.reopen().unwrap();
    }

    #[test]
    fn test_reopen_survives_panic_in_transfer() {
        let (_dir, store) = test_store();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _quiesced = store.quiesce().unwrap();
            panic!("transfer blew up");
        }));
        assert!(result.is_err());
        assert_eq!(category_count(&store).unwrap(), 10);
    }

    #[test]
    fn test_data_survives_quiesce_cycle() {
        let (_dir, store) = test_store();
        store
            .with(|conn| {
                conn.execute(
                    "INSERT INTO expenses (amount_cents, date, category_id) VALUES (500, '2026-01-05', 1)",
                    [],
                )?;
                Ok(())
            })
            .unwrap();
        store.quiesce().unwrap().reopen().unwrap();
        let n: i64 = store
            .with(|conn| Ok(conn.query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(n, 1);
    }
}
