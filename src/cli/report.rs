use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, parse_month_opt};
use crate::cycle;
use crate::error::{PennyError, Result};
use crate::fmt::money;
use crate::reports::{self, PeriodSummary};
use crate::settings;
use crate::store::Store;

fn month_or_current(month: &Option<String>) -> (i32, u32) {
    let (y, m) = parse_month_opt(month);
    match (y, m) {
        (Some(y), Some(m)) if (1..=12).contains(&m) => (y, m),
        _ => {
            let today = chrono::Local::now().date_naive();
            (today.year(), today.month())
        }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| PennyError::Validation(format!("Invalid date: {input} (expected YYYY-MM-DD)")))
}

pub fn month(month: Option<String>) -> Result<()> {
    let (year, m) = month_or_current(&month);
    let store = open_store()?;
    let summary = store.with(|conn| reports::monthly_summary(conn, year, m))?;
    print_summary(&store, &format!("{year:04}-{m:02}"), &summary)
}

pub fn cycle(month: Option<String>, start_day: Option<u32>) -> Result<()> {
    let (year, m) = month_or_current(&month);
    let store = open_store()?;
    let start_day = match start_day {
        Some(day) => day,
        None => store.with(settings::cycle_start_day)?,
    };
    if !(1..=31).contains(&start_day) {
        return Err(PennyError::Validation(format!(
            "Invalid cycle start day: {start_day}"
        )));
    }
    let summary = store.with(|conn| reports::cycle_summary(conn, year, m, start_day))?;
    let (from, to) = cycle::resolve(year, m, start_day);
    print_summary(&store, &format!("cycle {from} to {to}"), &summary)
}

pub fn breakdown(from_date: &str, to_date: &str) -> Result<()> {
    let from = parse_date(from_date)?;
    let to = parse_date(to_date)?;
    if from > to {
        return Err(PennyError::Validation(format!(
            "--from {from} is after --to {to}"
        )));
    }
    let store = open_store()?;
    let summary = store.with(|conn| reports::range_summary(conn, from, to))?;
    print_summary(&store, &format!("{from} to {to}"), &summary)
}

fn print_summary(store: &Store, period: &str, summary: &PeriodSummary) -> Result<()> {
    let symbol = store.with(settings::currency_symbol)?;

    println!("{} {}", "Spending".bold(), period);
    if summary.count == 0 {
        println!("No expenses in this period.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "Count", "%"]);
    for row in &summary.by_category {
        let label = match &row.category_icon {
            Some(icon) => format!("{icon} {}", row.category_name),
            None => row.category_name.clone(),
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(row.total_cents, &symbol)),
            Cell::new(row.count),
            Cell::new(format!("{:.1}", row.percentage)),
        ]);
    }
    println!("{table}");
    println!(
        "{}: {} across {} expenses",
        "Total".bold(),
        money(summary.total_cents, &symbol).green(),
        summary.count
    );

    if let Some(budget) = store.with(settings::monthly_budget_cents)? {
        let remaining = budget - summary.total_cents;
        let line = format!(
            "Budget {}: {} remaining",
            money(budget, &symbol),
            money(remaining, &symbol)
        );
        if remaining < 0 {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}
