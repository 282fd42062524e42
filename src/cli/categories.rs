use comfy_table::{Cell, Table};

use crate::categories;
use crate::cli::open_store;
use crate::error::Result;

pub fn add(name: &str, icon: Option<&str>, color: Option<&str>) -> Result<()> {
    let store = open_store()?;
    let created = store.with(|conn| categories::create_category(conn, name, icon, color))?;
    println!("Added category: {} (id {})", created.name, created.id);
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store()?;
    let rows = store.with(categories::list_categories)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Icon", "Color", "Default"]);
    for cat in rows {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(&cat.name),
            Cell::new(cat.icon.unwrap_or_default()),
            Cell::new(cat.color.unwrap_or_default()),
            Cell::new(if cat.is_default { "yes" } else { "" }),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}

pub fn update(id: i64, name: &str, icon: Option<&str>, color: Option<&str>) -> Result<()> {
    let store = open_store()?;
    let updated = store.with(|conn| categories::update_category(conn, id, name, icon, color))?;
    println!("Updated category {id}: {}", updated.name);
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let store = open_store()?;
    store.with(|conn| categories::delete_category(conn, id))?;
    println!("Deleted category {id}");
    Ok(())
}
