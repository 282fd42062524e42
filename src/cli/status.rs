use crate::config::{db_path_in, get_data_dir, load_config};
use crate::error::Result;
use crate::fmt::money;
use crate::settings;
use crate::store::Store;

pub fn run() -> Result<()> {
    let config = load_config();
    let db_path = db_path_in(&get_data_dir());

    println!("Data dir:   {}", config.data_dir);
    println!("Database:   {}", db_path.display());

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `penny init` to set up.");
        return Ok(());
    }

    let size = std::fs::metadata(&db_path)?.len();
    println!("DB size:    {size} bytes");

    let store = Store::open(&db_path)?;
    let (categories, expenses, total, symbol, start_day, last_sync) = store.with(|conn| {
        let categories: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0))?;
        let expenses: i64 = conn.query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))?;
        let total: i64 =
            conn.query_row("SELECT COALESCE(SUM(amount_cents), 0) FROM expenses", [], |r| r.get(0))?;
        Ok((
            categories,
            expenses,
            total,
            settings::currency_symbol(conn)?,
            settings::cycle_start_day(conn)?,
            settings::last_sync_timestamp(conn)?,
        ))
    })?;

    println!();
    println!("Categories:   {categories}");
    println!("Expenses:     {expenses}");
    println!("All-time:     {}", money(total, &symbol));
    println!("Cycle start:  day {start_day}");
    match last_sync {
        Some(epoch) => println!("Last sync:    {epoch} (epoch)"),
        None => println!("Last sync:    never"),
    }
    Ok(())
}
