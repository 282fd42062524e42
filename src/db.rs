use std::path::Path;

use log::info;
use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    icon TEXT,
    color TEXT,
    is_default INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS subcategories (
    id INTEGER PRIMARY KEY,
    category_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE,
    UNIQUE (category_id, name)
);

CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
    date TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    subcategory_id INTEGER,
    description TEXT,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category_id) REFERENCES categories(id),
    FOREIGN KEY (subcategory_id) REFERENCES subcategories(id)
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
CREATE INDEX IF NOT EXISTS idx_expenses_date_category ON expenses(date, category_id);
CREATE INDEX IF NOT EXISTS idx_subcategories_category ON subcategories(category_id);
";

// (name, icon, color, subcategories)
const DEFAULT_CATEGORIES: &[(&str, &str, &str, &[&str])] = &[
    ("Food & Dining", "\u{1f354}", "#FF6B6B", &["Groceries", "Restaurants", "Coffee", "Fast Food"]),
    ("Transportation", "\u{1f697}", "#4ECDC4", &["Fuel", "Public Transit", "Parking", "Maintenance"]),
    ("Shopping", "\u{1f6cd}\u{fe0f}", "#45B7D1", &["Clothing", "Electronics", "Home", "Gifts"]),
    ("Entertainment", "\u{1f3ac}", "#96CEB4", &["Movies", "Games", "Subscriptions", "Events"]),
    ("Bills & Utilities", "\u{1f4a1}", "#FFEAA7", &["Electricity", "Internet", "Phone", "Water"]),
    ("Health & Medical", "\u{1f48a}", "#DDA0DD", &["Doctor", "Pharmacy", "Insurance", "Gym"]),
    ("Travel", "\u{2708}\u{fe0f}", "#98D8C8", &["Flights", "Hotels", "Activities"]),
    ("Education", "\u{1f4da}", "#F7DC6F", &["Books", "Courses", "Supplies"]),
    ("Personal Care", "\u{1f487}", "#BB8FCE", &["Haircut", "Cosmetics", "Spa"]),
    ("Other", "\u{1f4e6}", "#AEB6BF", &["Miscellaneous"]),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    seed_default_categories(conn)?;
    seed_default_settings(conn)?;
    Ok(())
}

fn seed_default_categories(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    info!("seeding {} default categories", DEFAULT_CATEGORIES.len());
    let tx = conn.unchecked_transaction()?;
    for (name, icon, color, subcategories) in DEFAULT_CATEGORIES {
        tx.execute(
            "INSERT INTO categories (name, icon, color, is_default) VALUES (?1, ?2, ?3, 1)",
            rusqlite::params![name, icon, color],
        )?;
        let category_id = tx.last_insert_rowid();
        for sub in *subcategories {
            tx.execute(
                "INSERT INTO subcategories (category_id, name) VALUES (?1, ?2)",
                rusqlite::params![category_id, sub],
            )?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn seed_default_settings(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings (key, value) VALUES ('currency_symbol', '$')",
        [],
    )?;
    Ok(())
}
