use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::cli::open_store;
use crate::error::{PennyError, Result};
use crate::expenses;
use crate::fmt::{money, parse_amount};
use crate::models::{ExpenseFilters, ExpenseInput};
use crate::settings::currency_symbol;
use crate::{categories, subcategories};

fn resolve_category(conn: &Connection, name: &str) -> Result<i64> {
    categories::find_category_by_name(conn, name)?
        .map(|c| c.id)
        .ok_or_else(|| PennyError::Validation(format!("Unknown category: {name}")))
}

fn resolve_subcategory(conn: &Connection, category_id: i64, name: &str) -> Result<i64> {
    subcategories::list_by_category(conn, category_id)?
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.id)
        .ok_or_else(|| PennyError::Validation(format!("Unknown subcategory: {name}")))
}

pub fn add(
    amount: &str,
    category: &str,
    subcategory: Option<&str>,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    let amount_cents = parse_amount(amount)
        .ok_or_else(|| PennyError::Validation(format!("Invalid amount: {amount}")))?;
    let date = match date {
        Some(d) => d.to_string(),
        None => chrono::Local::now().date_naive().to_string(),
    };

    let store = open_store()?;
    let created = store.with(|conn| {
        let category_id = resolve_category(conn, category)?;
        let subcategory_id = subcategory
            .map(|name| resolve_subcategory(conn, category_id, name))
            .transpose()?;
        expenses::create_expense(
            conn,
            &ExpenseInput {
                amount_cents,
                date,
                category_id,
                subcategory_id,
                description: note.map(String::from),
            },
        )
    })?;
    let symbol = store.with(currency_symbol)?;
    println!(
        "Recorded {} in {} on {} (id {})",
        money(created.amount_cents, &symbol),
        created.category_name,
        created.date,
        created.id
    );
    Ok(())
}

pub fn list(
    from_date: Option<&str>,
    to_date: Option<&str>,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<()> {
    let unfiltered =
        from_date.is_none() && to_date.is_none() && category.is_none() && search.is_none();
    let store = open_store()?;
    let (rows, symbol) = store.with(|conn| {
        let rows = if unfiltered {
            expenses::list_expenses(conn)?
        } else {
            let category_id = category.map(|name| resolve_category(conn, name)).transpose()?;
            let filters = ExpenseFilters {
                date_from: from_date.map(String::from),
                date_to: to_date.map(String::from),
                category_id,
                subcategory_id: None,
                search: search.map(String::from),
            };
            expenses::list_filtered(conn, &filters)?
        };
        Ok((rows, currency_symbol(conn)?))
    })?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Amount", "Category", "Subcategory", "Note"]);
    let total: i64 = rows.iter().map(|e| e.amount_cents).sum();
    let count = rows.len();
    for e in rows {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(&e.date),
            Cell::new(money(e.amount_cents, &symbol)),
            Cell::new(&e.category_name),
            Cell::new(e.subcategory_name.unwrap_or_default()),
            Cell::new(e.description.unwrap_or_default()),
        ]);
    }
    println!("Expenses\n{table}");
    println!("{count} expenses, {} total", money(total, &symbol));
    Ok(())
}

pub fn edit(
    id: i64,
    amount: Option<&str>,
    category: Option<&str>,
    subcategory: Option<&str>,
    date: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    let store = open_store()?;
    let updated = store.with(|conn| {
        let current = expenses::get_expense(conn, id)?
            .ok_or_else(|| PennyError::Validation(format!("Expense not found: id {id}")))?;

        let amount_cents = match amount {
            Some(a) => parse_amount(a)
                .ok_or_else(|| PennyError::Validation(format!("Invalid amount: {a}")))?,
            None => current.amount_cents,
        };
        let category_id = match category {
            Some(name) => resolve_category(conn, name)?,
            None => current.category_id,
        };
        // Changing category silently drops a stale subcategory unless a new
        // one is named.
        let subcategory_id = match subcategory {
            Some("") => None,
            Some(name) => Some(resolve_subcategory(conn, category_id, name)?),
            None if category.is_some() => None,
            None => current.subcategory_id,
        };
        let description = match note {
            Some("") => None,
            Some(text) => Some(text.to_string()),
            None => current.description,
        };

        expenses::update_expense(
            conn,
            id,
            &ExpenseInput {
                amount_cents,
                date: date.map(String::from).unwrap_or(current.date),
                category_id,
                subcategory_id,
                description,
            },
        )
    })?;
    println!("Updated expense {id}: {} on {}", updated.category_name, updated.date);
    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let store = open_store()?;
    store.with(|conn| expenses::delete_expense(conn, id))?;
    println!("Deleted expense {id}");
    Ok(())
}
