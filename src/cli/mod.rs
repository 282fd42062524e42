pub mod categories;
pub mod demo;
pub mod expenses;
pub mod init;
pub mod report;
pub mod settings;
pub mod status;
pub mod subcategories;
pub mod sync;

use clap::{Parser, Subcommand};

use crate::config::{db_path_in, get_data_dir};
use crate::error::Result;
use crate::store::Store;

pub(crate) fn open_store() -> Result<Store> {
    Store::open(&db_path_in(&get_data_dir()))
}

pub(crate) fn parse_month_opt(month: &Option<String>) -> (Option<i32>, Option<u32>) {
    if let Some(m) = month {
        let parts: Vec<&str> = m.split('-').collect();
        if parts.len() == 2 {
            let year = parts[0].parse().ok();
            let month = parts[1].parse().ok();
            return (year, month);
        }
    }
    (None, None)
}

#[derive(Parser)]
#[command(name = "penny", about = "Cycle-aware expense tracking with cloud-folder backup.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and initialize the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record an expense.
    Add {
        /// Amount, e.g. 12.50
        amount: String,
        /// Category name
        #[arg(long)]
        category: String,
        /// Subcategory name within the category
        #[arg(long)]
        subcategory: Option<String>,
        /// Date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Free-text description
        #[arg(long)]
        note: Option<String>,
    },
    /// List expenses, newest first.
    List {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<String>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: Option<String>,
        /// Filter by category name
        #[arg(long)]
        category: Option<String>,
        /// Substring match against descriptions
        #[arg(long)]
        search: Option<String>,
    },
    /// Edit an expense.
    Edit {
        /// Expense ID (shown in `penny list`)
        id: i64,
        /// New amount, e.g. 12.50
        #[arg(long)]
        amount: Option<String>,
        /// New category name
        #[arg(long)]
        category: Option<String>,
        /// New subcategory name (use empty string to clear)
        #[arg(long)]
        subcategory: Option<String>,
        /// New date: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// New description (use empty string to clear)
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete an expense.
    Remove {
        /// Expense ID (shown in `penny list`)
        id: i64,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage subcategories.
    Subcategories {
        #[command(subcommand)]
        command: SubcategoriesCommands,
    },
    /// Generate spending summaries.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Read and write settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Back up to or restore from the cloud vault.
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Show current database and summary statistics.
    Status,
    /// Load sample expenses to explore Penny.
    Demo,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// Add a new category.
    Add {
        /// Category name, e.g. 'Pets'
        name: String,
        /// Icon (emoji)
        #[arg(long)]
        icon: Option<String>,
        /// Color, e.g. '#FF6B6B'
        #[arg(long)]
        color: Option<String>,
    },
    /// List all categories.
    List,
    /// Update a category.
    Update {
        /// Category ID (shown in `penny categories list`)
        id: i64,
        /// New name
        #[arg(long)]
        name: String,
        /// New icon
        #[arg(long)]
        icon: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category and its subcategories. Default categories are protected.
    Delete {
        /// Category ID (shown in `penny categories list`)
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum SubcategoriesCommands {
    /// Add a subcategory to a category.
    Add {
        /// Parent category name
        category: String,
        /// Subcategory name
        name: String,
    },
    /// List a category's subcategories.
    List {
        /// Parent category name
        category: String,
    },
    /// Delete a subcategory by ID.
    Delete {
        /// Subcategory ID (shown in `penny subcategories list`)
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Calendar-month summary with category breakdown.
    Month {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Accounting-cycle summary anchored on the configured start day.
    Cycle {
        /// Cycle label: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Cycle start day (default: the cycle_start_day setting)
        #[arg(long = "start-day")]
        start_day: Option<u32>,
    },
    /// Category breakdown over an explicit date range.
    Breakdown {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: String,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print one setting.
    Get { key: String },
    /// Set a setting.
    Set { key: String, value: String },
    /// Remove a setting.
    Unset { key: String },
    /// List all settings.
    List,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Show connection state and last sync time.
    Status,
    /// Authenticate with the backup vault.
    Login,
    /// Log out and discard the session.
    Logout,
    /// Push the local database to the vault.
    Push,
    /// Pull the vault snapshot over the local database.
    Pull,
    /// Bidirectional sync: the newer side wins.
    Run,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_opt() {
        assert_eq!(parse_month_opt(&Some("2026-03".into())), (Some(2026), Some(3)));
        assert_eq!(parse_month_opt(&Some("garbage".into())), (None, None));
        assert_eq!(parse_month_opt(&None), (None, None));
    }

    #[test]
    fn test_cli_parses() {
        Cli::try_parse_from(["penny", "add", "12.50", "--category", "Food & Dining"]).unwrap();
        Cli::try_parse_from(["penny", "report", "cycle", "--month", "2026-01", "--start-day", "25"]).unwrap();
        Cli::try_parse_from(["penny", "sync", "push"]).unwrap();
        assert!(Cli::try_parse_from(["penny"]).is_err());
    }
}
