use rusqlite::Connection;

use crate::error::{integrity_from, PennyError, Result};
use crate::models::Category;

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        is_default: row.get::<_, i64>(4)? != 0,
    })
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, icon, color, is_default FROM categories \
         ORDER BY is_default DESC, name ASC",
    )?;
    let categories = stmt
        .query_map([], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, icon, color, is_default FROM categories WHERE id = ?1",
        [id],
        map_row,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

pub fn find_category_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    conn.query_row(
        "SELECT id, name, icon, color, is_default FROM categories WHERE name = ?1",
        [name],
        map_row,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

pub fn create_category(
    conn: &Connection,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PennyError::Validation("Category name is required".into()));
    }
    if find_category_by_name(conn, name)?.is_some() {
        return Err(PennyError::Validation(format!(
            "Category name already exists: {name}"
        )));
    }
    conn.execute(
        "INSERT INTO categories (name, icon, color, is_default) VALUES (?1, ?2, ?3, 0)",
        rusqlite::params![name, icon, color],
    )
    .map_err(integrity_from)?;
    let id = conn.last_insert_rowid();
    get_category(conn, id)?
        .ok_or_else(|| PennyError::Validation(format!("Category not found: id {id}")))
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    name: &str,
    icon: Option<&str>,
    color: Option<&str>,
) -> Result<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PennyError::Validation("Category name is required".into()));
    }
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1 AND id != ?2)",
        rusqlite::params![name, id],
        |row| row.get(0),
    )?;
    if taken {
        return Err(PennyError::Validation(format!(
            "Category name already exists: {name}"
        )));
    }
    let updated = conn
        .execute(
            "UPDATE categories SET name = ?1, icon = ?2, color = ?3, \
             updated_at = datetime('now') WHERE id = ?4",
            rusqlite::params![name, icon, color, id],
        )
        .map_err(integrity_from)?;
    if updated == 0 {
        return Err(PennyError::Validation(format!("Category not found: id {id}")));
    }
    get_category(conn, id)?
        .ok_or_else(|| PennyError::Validation(format!("Category not found: id {id}")))
}

/// Delete a user-created category. Default categories are protected, and the
/// subcategory cascade is handled by the schema. A category still referenced
/// by expenses surfaces as an integrity error from the store.
pub fn delete_category(conn: &Connection, id: i64) -> Result<()> {
    let category = get_category(conn, id)?
        .ok_or_else(|| PennyError::Validation(format!("Category not found: id {id}")))?;
    if category.is_default {
        return Err(PennyError::Validation(format!(
            "Cannot delete default category: {}",
            category.name
        )));
    }
    conn.execute("DELETE FROM categories WHERE id = ?1", [id])
        .map_err(integrity_from)?;
    Ok(())
}
