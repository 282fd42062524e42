use rusqlite::Connection;

use crate::error::Result;

pub const CURRENCY_SYMBOL: &str = "currency_symbol";
pub const MONTHLY_BUDGET: &str = "monthly_budget";
pub const CYCLE_START_DAY: &str = "cycle_start_day";
pub const GOOGLE_CLIENT_ID: &str = "google_client_id";
pub const GOOGLE_CLIENT_SECRET: &str = "google_client_secret";
pub const SYNC_REMOTE_DIR: &str = "sync_remote_dir";
pub const SYNC_TIMEOUT_SECS: &str = "sync_timeout_secs";
pub const LAST_SYNC_TIMESTAMP: &str = "last_sync_timestamp";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;
    Ok(value)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

pub fn unset_setting(conn: &Connection, key: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
    Ok(changed > 0)
}

pub fn all_settings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn currency_symbol(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY_SYMBOL)?.unwrap_or_else(|| "$".to_string()))
}

/// Configured cycle start day, defaulting to 1 (calendar months).
pub fn cycle_start_day(conn: &Connection) -> Result<u32> {
    Ok(get_setting(conn, CYCLE_START_DAY)?
        .and_then(|v| v.parse().ok())
        .filter(|d| (1..=31).contains(d))
        .unwrap_or(1))
}

pub fn last_sync_timestamp(conn: &Connection) -> Result<Option<i64>> {
    Ok(get_setting(conn, LAST_SYNC_TIMESTAMP)?.and_then(|v| v.parse().ok()))
}

pub fn monthly_budget_cents(conn: &Connection) -> Result<Option<i64>> {
    Ok(get_setting(conn, MONTHLY_BUDGET)?.and_then(|v| crate::fmt::parse_amount(&v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_get_missing_setting_is_none() {
        let (_dir, conn) = test_db();
        assert!(get_setting(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn test_set_setting_upserts() {
        let (_dir, conn) = test_db();
        set_setting(&conn, CYCLE_START_DAY, "25").unwrap();
        assert_eq!(get_setting(&conn, CYCLE_START_DAY).unwrap().as_deref(), Some("25"));
        set_setting(&conn, CYCLE_START_DAY, "10").unwrap();
        assert_eq!(get_setting(&conn, CYCLE_START_DAY).unwrap().as_deref(), Some("10"));
    }

    #[test]
    fn test_unset_setting() {
        let (_dir, conn) = test_db();
        set_setting(&conn, "temp", "x").unwrap();
        assert!(unset_setting(&conn, "temp").unwrap());
        assert!(!unset_setting(&conn, "temp").unwrap());
    }

    #[test]
    fn test_all_settings_sorted() {
        let (_dir, conn) = test_db();
        set_setting(&conn, "zz", "1").unwrap();
        set_setting(&conn, "aa", "2").unwrap();
        let all = all_settings(&conn).unwrap();
        assert_eq!(all.first().map(|(k, _)| k.as_str()), Some("aa"));
        assert!(all.iter().any(|(k, v)| k == "currency_symbol" && v == "$"));
    }

    #[test]
    fn test_cycle_start_day_defaults_and_clamps() {
        let (_dir, conn) = test_db();
        assert_eq!(cycle_start_day(&conn).unwrap(), 1);
        set_setting(&conn, CYCLE_START_DAY, "25").unwrap();
        assert_eq!(cycle_start_day(&conn).unwrap(), 25);
        set_setting(&conn, CYCLE_START_DAY, "0").unwrap();
        assert_eq!(cycle_start_day(&conn).unwrap(), 1, "out-of-range values fall back to 1");
        set_setting(&conn, CYCLE_START_DAY, "junk").unwrap();
        assert_eq!(cycle_start_day(&conn).unwrap(), 1);
    }

    #[test]
    fn test_last_sync_timestamp_parses_epoch() {
        let (_dir, conn) = test_db();
        assert!(last_sync_timestamp(&conn).unwrap().is_none());
        set_setting(&conn, LAST_SYNC_TIMESTAMP, "1754000000").unwrap();
        assert_eq!(last_sync_timestamp(&conn).unwrap(), Some(1754000000));
    }

    #[test]
    fn test_monthly_budget_parses_amount() {
        let (_dir, conn) = test_db();
        set_setting(&conn, MONTHLY_BUDGET, "1500.50").unwrap();
        assert_eq!(monthly_budget_cents(&conn).unwrap(), Some(150050));
    }
}
