use chrono::NaiveDate;
use rusqlite::Connection;

use crate::cycle;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category_id: i64,
    pub category_name: String,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
    pub total_cents: i64,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub total_cents: i64,
    pub count: i64,
    pub by_category: Vec<CategorySummary>,
}

/// Summary for a calendar month. Empty months yield zeros, not errors.
pub fn monthly_summary(conn: &Connection, year: i32, month: u32) -> Result<PeriodSummary> {
    let month_str = format!("{year:04}-{month:02}");

    let (total_cents, count): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) \
         FROM expenses WHERE strftime('%Y-%m', date) = ?1",
        [&month_str],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let sql = "SELECT c.id, c.name, c.icon, c.color, \
               COALESCE(SUM(e.amount_cents), 0) AS total, COUNT(e.id) \
               FROM categories c \
               LEFT JOIN expenses e ON e.category_id = c.id AND strftime('%Y-%m', e.date) = ?1 \
               GROUP BY c.id HAVING total > 0 \
               ORDER BY total DESC, c.id ASC";
    let by_category = query_breakdown(conn, sql, [&month_str], total_cents)?;

    Ok(PeriodSummary {
        total_cents,
        count,
        by_category,
    })
}

/// Summary for the accounting cycle labelled (year, month). A start day of 1
/// takes the calendar-month path and is exactly equivalent to
/// `monthly_summary`.
pub fn cycle_summary(conn: &Connection, year: i32, month: u32, start_day: u32) -> Result<PeriodSummary> {
    if start_day == 1 {
        return monthly_summary(conn, year, month);
    }

    let (date_from, date_to) = cycle::resolve(year, month, start_day);
    range_summary(conn, date_from, date_to)
}

pub fn range_summary(conn: &Connection, date_from: NaiveDate, date_to: NaiveDate) -> Result<PeriodSummary> {
    let from = date_from.to_string();
    let to = date_to.to_string();

    let (total_cents, count): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) \
         FROM expenses WHERE date >= ?1 AND date <= ?2",
        [&from, &to],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let by_category = breakdown_rows(conn, &from, &to, total_cents)?;

    Ok(PeriodSummary {
        total_cents,
        count,
        by_category,
    })
}

/// Per-category totals over an inclusive date range, largest first, with
/// percentages of the range total. Categories with nothing in range are
/// dropped.
pub fn category_breakdown(conn: &Connection, date_from: NaiveDate, date_to: NaiveDate) -> Result<Vec<CategorySummary>> {
    let from = date_from.to_string();
    let to = date_to.to_string();

    let total_cents: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses WHERE date >= ?1 AND date <= ?2",
        [&from, &to],
        |row| row.get(0),
    )?;

    breakdown_rows(conn, &from, &to, total_cents)
}

fn breakdown_rows(conn: &Connection, from: &str, to: &str, total_cents: i64) -> Result<Vec<CategorySummary>> {
    let sql = "SELECT c.id, c.name, c.icon, c.color, \
               COALESCE(SUM(e.amount_cents), 0) AS total, COUNT(e.id) \
               FROM categories c \
               LEFT JOIN expenses e ON e.category_id = c.id AND e.date >= ?1 AND e.date <= ?2 \
               GROUP BY c.id HAVING total > 0 \
               ORDER BY total DESC, c.id ASC";
    query_breakdown(conn, sql, [from, to], total_cents)
}

fn query_breakdown<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    total_cents: i64,
) -> Result<Vec<CategorySummary>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            let total: i64 = row.get(4)?;
            Ok(CategorySummary {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
                category_icon: row.get(2)?,
                category_color: row.get(3)?,
                total_cents: total,
                count: row.get(5)?,
                percentage: if total_cents > 0 {
                    total as f64 / total_cents as f64 * 100.0
                } else {
                    0.0
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
