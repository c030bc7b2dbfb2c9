//! Run one bot command
//!
//! Usage: crossbot exec [--user <ID>] [--today <DATE>] <TEXT>...

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use clap::Args;
use crossbot_engine::DispatchOutcome;

use crate::config::BotConfig;
use crate::runtime::build_dispatcher;
use crate::terminal::{SharedWriter, TerminalSurface};

#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Caller identity the command runs as
    #[arg(long, default_value = "local")]
    pub user: String,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Command text, e.g. `query myq 5`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

pub fn execute(args: ExecArgs, config: &BotConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = build_dispatcher(config, args.today)?;
    let out: SharedWriter = Arc::new(Mutex::new(std::io::stdout()));
    let surface = TerminalSurface::new(args.user, args.text.join(" "), out);

    match dispatcher.handle(&surface) {
        DispatchOutcome::Handled { .. } => Ok(()),
        DispatchOutcome::Rejected => Err("command not understood".into()),
        DispatchOutcome::Failed { command } => Err(format!("`{}` failed", command).into()),
    }
}
