mod categories;
mod cli;
mod config;
mod cycle;
mod db;
mod error;
mod expenses;
mod fmt;
mod models;
mod reports;
mod settings;
mod store;
mod subcategories;
mod sync;

use clap::Parser;

use cli::{
    CategoriesCommands, Cli, Commands, ReportCommands, SettingsCommands, SubcategoriesCommands,
    SyncCommands,
};
use sync::SyncContext;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let sync_ctx = SyncContext::new();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add {
            amount,
            category,
            subcategory,
            date,
            note,
        } => cli::expenses::add(
            &amount,
            &category,
            subcategory.as_deref(),
            date.as_deref(),
            note.as_deref(),
        ),
        Commands::List {
            from_date,
            to_date,
            category,
            search,
        } => cli::expenses::list(
            from_date.as_deref(),
            to_date.as_deref(),
            category.as_deref(),
            search.as_deref(),
        ),
        Commands::Edit {
            id,
            amount,
            category,
            subcategory,
            date,
            note,
        } => cli::expenses::edit(
            id,
            amount.as_deref(),
            category.as_deref(),
            subcategory.as_deref(),
            date.as_deref(),
            note.as_deref(),
        ),
        Commands::Remove { id } => cli::expenses::remove(id),
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name, icon, color } => {
                cli::categories::add(&name, icon.as_deref(), color.as_deref())
            }
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Update { id, name, icon, color } => {
                cli::categories::update(id, &name, icon.as_deref(), color.as_deref())
            }
            CategoriesCommands::Delete { id } => cli::categories::delete(id),
        },
        Commands::Subcategories { command } => match command {
            SubcategoriesCommands::Add { category, name } => {
                cli::subcategories::add(&category, &name)
            }
            SubcategoriesCommands::List { category } => cli::subcategories::list(&category),
            SubcategoriesCommands::Delete { id } => cli::subcategories::delete(id),
        },
        Commands::Report { command } => match command {
            ReportCommands::Month { month } => cli::report::month(month),
            ReportCommands::Cycle { month, start_day } => cli::report::cycle(month, start_day),
            ReportCommands::Breakdown { from_date, to_date } => {
                cli::report::breakdown(&from_date, &to_date)
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Get { key } => cli::settings::get(&key),
            SettingsCommands::Set { key, value } => cli::settings::set(&sync_ctx, &key, &value),
            SettingsCommands::Unset { key } => cli::settings::unset(&sync_ctx, &key),
            SettingsCommands::List => cli::settings::list(),
        },
        Commands::Sync { command } => match command {
            SyncCommands::Status => cli::sync::status(&sync_ctx),
            SyncCommands::Login => cli::sync::login(&sync_ctx),
            SyncCommands::Logout => cli::sync::logout(&sync_ctx),
            SyncCommands::Push => cli::sync::push(&sync_ctx),
            SyncCommands::Pull => cli::sync::pull(&sync_ctx),
            SyncCommands::Run => cli::sync::run(&sync_ctx),
        },
        Commands::Status => cli::status::run(),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
