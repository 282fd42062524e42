use comfy_table::{Cell, Table};

use crate::cli::open_store;
use crate::error::{PennyError, Result};
use crate::{categories, subcategories};

fn category_id_by_name(conn: &rusqlite::Connection, name: &str) -> Result<i64> {
    categories::find_category_by_name(conn, name)?
        .map(|c| c.id)
        .ok_or_else(|| PennyError::Validation(format!("Unknown category: {name}")))
}

pub fn add(category: &str, name: &str) -> Result<()> {
    let store = open_store()?;
    let created = store.with(|conn| {
        let category_id = category_id_by_name(conn, category)?;
        subcategories::create_subcategory(conn, category_id, name)
    })?;
    println!("Added subcategory: {} (id {})", created.name, created.id);
    Ok(())
}

pub fn list(category: &str) -> Result<()> {
    let store = open_store()?;
    let rows = store.with(|conn| {
        let category_id = category_id_by_name(conn, category)?;
        subcategories::list_by_category(conn, category_id)
    })?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for sub in rows {
        table.add_row(vec![Cell::new(sub.id), Cell::new(&sub.name)]);
    }
    println!("Subcategories of {category}\n{table}");
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let store = open_store()?;
    store.with(|conn| subcategories::delete_subcategory(conn, id))?;
    println!("Deleted subcategory {id}");
    Ok(())
}
