use crate::config::{self, Config};
use crate::error::Result;
use crate::store::Store;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let config = match data_dir {
        Some(dir) => Config {
            data_dir: config::shellexpand_path(&dir),
        },
        None => config::load_config(),
    };

    std::fs::create_dir_all(&config.data_dir)?;
    config::save_config(&config)?;

    let db_path = config::db_path_in(std::path::Path::new(&config.data_dir));
    let store = Store::open(&db_path)?;
    let categories = store.with(|conn| {
        Ok(conn.query_row("SELECT count(*) FROM categories", [], |r| r.get::<_, i64>(0))?)
    })?;

    println!("Penny is ready.");
    println!("Data dir:   {}", config.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Categories: {categories} (seeded defaults included)");
    println!();
    println!("Record your first expense with `penny add 12.50 --category 'Food & Dining'`.");
    Ok(())
}
