use chrono::{Local, TimeZone};
use colored::Colorize;

use crate::cli::open_store;
use crate::error::Result;
use crate::sync::provider::TransferOutcome;
use crate::sync::SyncContext;

fn print_outcome(operation: &str, outcome: &TransferOutcome) {
    if outcome.success {
        println!("{} {operation} complete", "OK".green().bold());
    } else {
        let reason = outcome.error.as_deref().unwrap_or("unknown error");
        println!("{} {operation} failed: {reason}", "FAILED".red().bold());
    }
}

pub fn status(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    let status = ctx.status(&store);

    let connection = if status.connected {
        "connected".green().to_string()
    } else {
        "not connected".to_string()
    };
    println!("Vault:      {connection}");
    match status.last_sync {
        Some(epoch) => {
            let local = Local
                .timestamp_opt(epoch, 0)
                .single()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| epoch.to_string());
            println!("Last sync:  {local}");
        }
        None => println!("Last sync:  never"),
    }
    Ok(())
}

pub fn login(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    ctx.authenticate(&store)?;
    println!("Authenticated with the backup vault.");
    Ok(())
}

pub fn logout(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    ctx.logout(&store)?;
    println!("Logged out.");
    Ok(())
}

pub fn push(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    let outcome = ctx.push(&store)?;
    print_outcome("push", &outcome);
    Ok(())
}

pub fn pull(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    let outcome = ctx.pull(&store)?;
    print_outcome("pull", &outcome);
    Ok(())
}

pub fn run(ctx: &SyncContext) -> Result<()> {
    let store = open_store()?;
    let outcome = ctx.sync_bidirectional(&store)?;
    print_outcome("sync", &outcome);
    Ok(())
}
