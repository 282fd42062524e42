use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::{integrity_from, PennyError, Result};
use crate::models::{ExpenseFilters, ExpenseInput, ExpenseRecord, ExpenseWithCategory};

const JOINED_SELECT: &str = "SELECT e.id, e.amount_cents, e.date, e.category_id, c.name, c.icon, \
     c.color, e.subcategory_id, s.name, e.description \
     FROM expenses e \
     LEFT JOIN categories c ON e.category_id = c.id \
     LEFT JOIN subcategories s ON e.subcategory_id = s.id";

fn map_joined(row: &rusqlite::Row) -> rusqlite::Result<ExpenseWithCategory> {
    Ok(ExpenseWithCategory {
        id: row.get(0)?,
        amount_cents: row.get(1)?,
        date: row.get(2)?,
        category_id: row.get(3)?,
        category_name: row.get(4)?,
        category_icon: row.get(5)?,
        category_color: row.get(6)?,
        subcategory_id: row.get(7)?,
        subcategory_name: row.get(8)?,
        description: row.get(9)?,
    })
}

fn map_record(row: &rusqlite::Row) -> rusqlite::Result<ExpenseRecord> {
    Ok(ExpenseRecord {
        id: row.get(0)?,
        amount_cents: row.get(1)?,
        date: row.get(2)?,
        category_id: row.get(3)?,
        subcategory_id: row.get(4)?,
        description: row.get(5)?,
    })
}

pub fn get_expense(conn: &Connection, id: i64) -> Result<Option<ExpenseRecord>> {
    conn.query_row(
        "SELECT id, amount_cents, date, category_id, subcategory_id, description \
         FROM expenses WHERE id = ?1",
        [id],
        map_record,
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    })
}

fn get_joined(conn: &Connection, id: i64) -> Result<ExpenseWithCategory> {
    let sql = format!("{JOINED_SELECT} WHERE e.id = ?1");
    Ok(conn.query_row(&sql, [id], map_joined)?)
}

pub fn list_expenses(conn: &Connection) -> Result<Vec<ExpenseWithCategory>> {
    let sql = format!("{JOINED_SELECT} ORDER BY e.date DESC, e.created_at DESC, e.id DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], map_joined)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_filtered(conn: &Connection, filters: &ExpenseFilters) -> Result<Vec<ExpenseWithCategory>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(from) = &filters.date_from {
        params.push(Box::new(from.clone()));
        conditions.push(format!("e.date >= ?{}", params.len()));
    }
    if let Some(to) = &filters.date_to {
        params.push(Box::new(to.clone()));
        conditions.push(format!("e.date <= ?{}", params.len()));
    }
    if let Some(category_id) = filters.category_id {
        params.push(Box::new(category_id));
        conditions.push(format!("e.category_id = ?{}", params.len()));
    }
    if let Some(subcategory_id) = filters.subcategory_id {
        params.push(Box::new(subcategory_id));
        conditions.push(format!("e.subcategory_id = ?{}", params.len()));
    }
    if let Some(search) = &filters.search {
        params.push(Box::new(format!("%{search}%")));
        conditions.push(format!("e.description LIKE ?{}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let sql = format!("{JOINED_SELECT}{where_clause} ORDER BY e.date DESC, e.created_at DESC, e.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(param_refs.as_slice(), map_joined)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn validate_input(conn: &Connection, input: &ExpenseInput) -> Result<()> {
    if input.amount_cents < 0 {
        return Err(PennyError::Validation("Amount cannot be negative".into()));
    }
    if NaiveDate::parse_from_str(&input.date, "%Y-%m-%d").is_err() {
        return Err(PennyError::Validation(format!(
            "Invalid date: {} (expected YYYY-MM-DD)",
            input.date
        )));
    }
    let category_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
        [input.category_id],
        |row| row.get(0),
    )?;
    if !category_exists {
        return Err(PennyError::Validation(format!(
            "Category not found: id {}",
            input.category_id
        )));
    }
    if let Some(subcategory_id) = input.subcategory_id {
        // The FK only checks existence; ownership needs an explicit check.
        let owned: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subcategories WHERE id = ?1 AND category_id = ?2)",
            [subcategory_id, input.category_id],
            |row| row.get(0),
        )?;
        if !owned {
            return Err(PennyError::Validation(format!(
                "Subcategory {subcategory_id} does not belong to category {}",
                input.category_id
            )));
        }
    }
    Ok(())
}

pub fn create_expense(conn: &Connection, input: &ExpenseInput) -> Result<ExpenseWithCategory> {
    validate_input(conn, input)?;
    conn.execute(
        "INSERT INTO expenses (amount_cents, date, category_id, subcategory_id, description) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            input.amount_cents,
            input.date,
            input.category_id,
            input.subcategory_id,
            input.description,
        ],
    )
    .map_err(integrity_from)?;
    get_joined(conn, conn.last_insert_rowid())
}

pub fn update_expense(conn: &Connection, id: i64, input: &ExpenseInput) -> Result<ExpenseWithCategory> {
    validate_input(conn, input)?;
    let updated = conn
        .execute(
            "UPDATE expenses SET amount_cents = ?1, date = ?2, category_id = ?3, \
             subcategory_id = ?4, description = ?5, updated_at = datetime('now') \
             WHERE id = ?6",
            rusqlite::params![
                input.amount_cents,
                input.date,
                input.category_id,
                input.subcategory_id,
                input.description,
                id,
            ],
        )
        .map_err(integrity_from)?;
    if updated == 0 {
        return Err(PennyError::Validation(format!("Expense not found: id {id}")));
    }
    get_joined(conn, id)
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(PennyError::Validation(format!("Expense not found: id {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{create_category, find_category_by_name};
    use crate::db::{get_connection, init_db};
    use crate::subcategories::create_subcategory;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn input(cents: i64, date: &str, category_id: i64) -> ExpenseInput {
        ExpenseInput {
            amount_cents: cents,
            date: date.to_string(),
            category_id,
            subcategory_id: None,
            description: None,
        }
    }

    #[test]
    fn test_create_returns_joined_view() {
        let (_dir, conn) = test_db();
        let food = find_category_by_name(&conn, "Food & Dining").unwrap().unwrap();
        let created = create_expense(
            &conn,
            &ExpenseInput {
                description: Some("lunch".into()),
                ..input(1250, "2026-03-10", food.id)
            },
        )
        .unwrap();
        assert_eq!(created.amount_cents, 1250);
        assert_eq!(created.category_name, "Food & Dining");
        assert!(created.subcategory_name.is_none());
        assert_eq!(created.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_create_with_subcategory() {
        let (_dir, conn) = test_db();
        let food = find_category_by_name(&conn, "Food & Dining").unwrap().unwrap();
        let subs = crate::subcategories::list_by_category(&conn, food.id).unwrap();
        let groceries = subs.iter().find(|s| s.name == "Groceries").unwrap();
        let created = create_expense(
            &conn,
            &ExpenseInput {
                subcategory_id: Some(groceries.id),
                ..input(4300, "2026-03-11", food.id)
            },
        )
        .unwrap();
        assert_eq!(created.subcategory_name.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_create_rejects_missing_category() {
        let (_dir, conn) = test_db();
        let err = create_expense(&conn, &input(100, "2026-03-10", 9999)).unwrap_err();
        assert!(matches!(err, PennyError::Validation(_)));
        assert!(err.to_string().contains("Category not found"));
    }

    #[test]
    fn test_create_rejects_foreign_subcategory() {
        let (_dir, conn) = test_db();
        let food = find_category_by_name(&conn, "Food & Dining").unwrap().unwrap();
        let other = create_category(&conn, "Elsewhere", None, None).unwrap();
        let foreign_sub = create_subcategory(&conn, other.id, "Not Yours").unwrap();
        let err = create_expense(
            &conn,
            &ExpenseInput {
                subcategory_id: Some(foreign_sub.id),
                ..input(100, "2026-03-10", food.id)
            },
        )
        .unwrap_err();
        assert!(matches!(err, PennyError::Validation(_)));
        assert!(err.to_string().contains("does not belong"));
    }

    #[test]
    fn test_create_rejects_bad_date() {
        let (_dir, conn) = test_db();
        let err = create_expense(&conn, &input(100, "03/10/2026", 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
        let err = create_expense(&conn, &input(100, "2026-02-30", 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_update_expense() {
        let (_dir, conn) = test_db();
        let created = create_expense(&conn, &input(100, "2026-03-10", 1)).unwrap();
        let updated = update_expense(
            &conn,
            created.id,
            &ExpenseInput {
                description: Some("corrected".into()),
                ..input(250, "2026-03-12", 2)
            },
        )
        .unwrap();
        assert_eq!(updated.amount_cents, 250);
        assert_eq!(updated.date, "2026-03-12");
        assert_eq!(updated.category_id, 2);
    }

    #[test]
    fn test_update_missing_expense_fails() {
        let (_dir, conn) = test_db();
        let err = update_expense(&conn, 9999, &input(100, "2026-03-10", 1)).unwrap_err();
        assert!(err.to_string().contains("Expense not found"));
    }

    #[test]
    fn test_delete_expense() {
        let (_dir, conn) = test_db();
        let created = create_expense(&conn, &input(100, "2026-03-10", 1)).unwrap();
        delete_expense(&conn, created.id).unwrap();
        assert!(get_expense(&conn, created.id).unwrap().is_none());
        let err = delete_expense(&conn, created.id).unwrap_err();
        assert!(err.to_string().contains("Expense not found"));
    }

    #[test]
    fn test_list_expenses_newest_first() {
        let (_dir, conn) = test_db();
        create_expense(&conn, &input(100, "2026-03-10", 1)).unwrap();
        create_expense(&conn, &input(200, "2026-03-20", 1)).unwrap();
        create_expense(&conn, &input(300, "2026-03-15", 2)).unwrap();
        let all = list_expenses(&conn).unwrap();
        let dates: Vec<_> = all.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-03-20", "2026-03-15", "2026-03-10"]);
    }

    #[test]
    fn test_filtered_by_range_and_category() {
        let (_dir, conn) = test_db();
        create_expense(&conn, &input(100, "2026-03-10", 1)).unwrap();
        create_expense(&conn, &input(200, "2026-03-20", 1)).unwrap();
        create_expense(&conn, &input(300, "2026-03-15", 2)).unwrap();

        let filters = ExpenseFilters {
            date_from: Some("2026-03-12".into()),
            date_to: Some("2026-03-31".into()),
            category_id: Some(1),
            ..Default::default()
        };
        let rows = list_filtered(&conn, &filters).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount_cents, 200);
    }

    #[test]
    fn test_filtered_by_search() {
        let (_dir, conn) = test_db();
        create_expense(
            &conn,
            &ExpenseInput {
                description: Some("weekly groceries run".into()),
                ..input(100, "2026-03-10", 1)
            },
        )
        .unwrap();
        create_expense(
            &conn,
            &ExpenseInput {
                description: Some("bus ticket".into()),
                ..input(200, "2026-03-11", 2)
            },
        )
        .unwrap();

        let filters = ExpenseFilters {
            search: Some("groceries".into()),
            ..Default::default()
        };
        let rows = list_filtered(&conn, &filters).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].description.as_deref().unwrap().contains("groceries"));
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let (_dir, conn) = test_db();
        create_expense(&conn, &input(100, "2026-03-10", 1)).unwrap();
        create_expense(&conn, &input(200, "2026-03-11", 2)).unwrap();
        let rows = list_filtered(&conn, &ExpenseFilters::default()).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
