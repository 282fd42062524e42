use rusqlite::Connection;

use crate::error::{integrity_from, PennyError, Result};
use crate::models::Subcategory;

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Subcategory> {
    Ok(Subcategory {
        id: row.get(0)?,
        category_id: row.get(1)?,
        name: row.get(2)?,
    })
}

pub fn list_by_category(conn: &Connection, category_id: i64) -> Result<Vec<Subcategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, category_id, name FROM subcategories \
         WHERE category_id = ?1 ORDER BY name ASC",
    )?;
    let subcategories = stmt
        .query_map([category_id], map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(subcategories)
}

pub fn get_subcategory(conn: &Connection, id: i64) -> Result<Option<Subcategory>> {
    conn.query_row(
        "SELECT id, category_id, name FROM subcategories WHERE id = ?1",
        [id],
        map_row,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

pub fn create_subcategory(conn: &Connection, category_id: i64, name: &str) -> Result<Subcategory> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PennyError::Validation("Subcategory name is required".into()));
    }
    let parent_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
        [category_id],
        |row| row.get(0),
    )?;
    if !parent_exists {
        return Err(PennyError::Validation(format!(
            "Category not found: id {category_id}"
        )));
    }
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM subcategories WHERE category_id = ?1 AND name = ?2)",
        rusqlite::params![category_id, name],
        |row| row.get(0),
    )?;
    if taken {
        return Err(PennyError::Validation(format!(
            "Subcategory name already exists in this category: {name}"
        )));
    }
    conn.execute(
        "INSERT INTO subcategories (category_id, name) VALUES (?1, ?2)",
        rusqlite::params![category_id, name],
    )
    .map_err(integrity_from)?;
    let id = conn.last_insert_rowid();
    get_subcategory(conn, id)?
        .ok_or_else(|| PennyError::Validation(format!("Subcategory not found: id {id}")))
}

pub fn delete_subcategory(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM subcategories WHERE id = ?1", [id])
        .map_err(integrity_from)?;
    if deleted == 0 {
        return Err(PennyError::Validation(format!(
            "Subcategory not found: id {id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::create_category;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_list_by_category_sorted() {
        let (_dir, conn) = test_db();
        let cat = create_category(&conn, "Hobbies", None, None).unwrap();
        create_subcategory(&conn, cat.id, "Zines").unwrap();
        create_subcategory(&conn, cat.id, "Art").unwrap();
        let subs = list_by_category(&conn, cat.id).unwrap();
        let names: Vec<_> = subs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Zines"]);
    }

    #[test]
    fn test_create_requires_existing_category() {
        let (_dir, conn) = test_db();
        let err = create_subcategory(&conn, 9999, "Orphan").unwrap_err();
        assert!(matches!(err, PennyError::Validation(_)));
        assert!(err.to_string().contains("Category not found"));
    }

    #[test]
    fn test_duplicate_within_category_rejected() {
        let (_dir, conn) = test_db();
        let cat = create_category(&conn, "Hobbies", None, None).unwrap();
        create_subcategory(&conn, cat.id, "Art").unwrap();
        let err = create_subcategory(&conn, cat.id, "Art").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_same_name_in_other_category_allowed() {
        let (_dir, conn) = test_db();
        let a = create_category(&conn, "Cat A", None, None).unwrap();
        let b = create_category(&conn, "Cat B", None, None).unwrap();
        create_subcategory(&conn, a.id, "Shared").unwrap();
        create_subcategory(&conn, b.id, "Shared").unwrap();
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_dir, conn) = test_db();
        let cat = create_category(&conn, "Hobbies", None, None).unwrap();
        let err = create_subcategory(&conn, cat.id, "  ").unwrap_err();
        assert!(matches!(err, PennyError::Validation(_)));
    }

    #[test]
    fn test_delete_subcategory() {
        let (_dir, conn) = test_db();
        let cat = create_category(&conn, "Hobbies", None, None).unwrap();
        let sub = create_subcategory(&conn, cat.id, "Art").unwrap();
        delete_subcategory(&conn, sub.id).unwrap();
        assert!(get_subcategory(&conn, sub.id).unwrap().is_none());
        let err = delete_subcategory(&conn, sub.id).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
