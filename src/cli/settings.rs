use comfy_table::{Cell, Table};

use crate::cli::open_store;
use crate::error::{PennyError, Result};
use crate::settings;
use crate::sync::SyncContext;

pub fn get(key: &str) -> Result<()> {
    let store = open_store()?;
    match store.with(|conn| settings::get_setting(conn, key))? {
        Some(value) => println!("{value}"),
        None => return Err(PennyError::Validation(format!("Setting not found: {key}"))),
    }
    Ok(())
}

pub fn set(sync_ctx: &SyncContext, key: &str, value: &str) -> Result<()> {
    let store = open_store()?;
    store.with(|conn| settings::set_setting(conn, key, value))?;
    // A credential change must force the next sync operation to rebuild its
    // session from the new values.
    if crate::sync::is_credential_key(key) {
        sync_ctx.invalidate();
    }
    println!("Set {key}");
    Ok(())
}

pub fn unset(sync_ctx: &SyncContext, key: &str) -> Result<()> {
    let store = open_store()?;
    let removed = store.with(|conn| settings::unset_setting(conn, key))?;
    if !removed {
        return Err(PennyError::Validation(format!("Setting not found: {key}")));
    }
    if crate::sync::is_credential_key(key) {
        sync_ctx.invalidate();
    }
    println!("Unset {key}");
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store()?;
    let rows = store.with(settings::all_settings)?;

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in rows {
        // Don't echo the secret back in full.
        let shown = if key == settings::GOOGLE_CLIENT_SECRET {
            "********".to_string()
        } else {
            value
        };
        table.add_row(vec![Cell::new(key), Cell::new(shown)]);
    }
    println!("Settings\n{table}");
    Ok(())
}
