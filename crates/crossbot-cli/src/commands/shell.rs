//! Read bot commands from stdin
//!
//! Usage: crossbot shell [--user <ID>] [--today <DATE>]
//!
//! Each non-blank line is handled on its own thread; the command returns
//! once input ends and every line has been answered. Replies to different
//! lines may appear in any order.

use std::io::BufRead;
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::NaiveDate;
use clap::Args;

use crate::config::BotConfig;
use crate::runtime::build_dispatcher;
use crate::terminal::{SharedWriter, TerminalSurface};

#[derive(Debug, Args)]
pub struct ShellArgs {
    /// Caller identity commands run as
    #[arg(long, default_value = "local")]
    pub user: String,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

pub fn execute(args: ShellArgs, config: &BotConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = build_dispatcher(config, args.today)?;
    let out: SharedWriter = Arc::new(Mutex::new(std::io::stdout()));
    let stdin = std::io::stdin();

    thread::scope(|scope| -> Result<(), Box<dyn std::error::Error>> {
        for line in stdin.lock().lines() {
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            let surface = TerminalSurface::new(args.user.as_str(), text, Arc::clone(&out));
            let dispatcher = &dispatcher;
            scope.spawn(move || {
                dispatcher.handle(&surface);
            });
        }
        Ok(())
    })
}
