//! Record a completed puzzle
//!
//! Usage: crossbot record [--user <ID>] [--kind mini|regular] [--date <DATE>]

use chrono::{Local, NaiveDate};
use clap::Args;
use crossbot_core::model::{ActivityKind, CompletionRecord};
use crossbot_core::ops::CompletionLog;
use crossbot_store::SqliteStore;

use crate::config::BotConfig;

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Who completed the puzzle
    #[arg(long, default_value = "local")]
    pub user: String,

    /// Which puzzle was completed
    #[arg(long, default_value = "mini")]
    pub kind: ActivityKind,

    /// Date of the puzzle (YYYY-MM-DD); today when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn execute(args: RecordArgs, config: &BotConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open(&config.db_path)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let record = CompletionRecord::new(args.user, args.kind, date);

    store.record_completion(&record)?;
    tracing::info!(user_id = %record.user_id, kind = %record.kind, %date, "recorded completion");

    println!("Recorded {} {} for {}", record.kind, date, record.user_id);
    Ok(())
}
