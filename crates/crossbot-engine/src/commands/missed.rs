//! `missed [n] [--kind mini|regular]`
//!
//! Links to the caller's most recent unsolved puzzles.

use clap::{value_parser, Arg, Command};
use crossbot_core::errors::{CbResult, Result};
use crossbot_core::missed::missed_days;
use crossbot_core::model::ActivityKind;
use crossbot_core::request::Request;

use crate::dispatcher::Dispatcher;

/// Largest `n` accepted, to keep the reply a readable size
pub const MAX_MISSED: u32 = 100;

pub fn init(dispatcher: &mut Dispatcher) -> Result<()> {
    dispatcher.register(spec(), handle)
}

fn spec() -> Command {
    Command::new("missed")
        .about("Get links to the most recent puzzles you missed")
        .arg(
            Arg::new("n")
                .help("How many missed puzzles to list")
                .value_parser(value_parser!(u32).range(1..=i64::from(MAX_MISSED)))
                .default_value("1"),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .help("Which puzzle to check")
                .value_parser(ActivityKind::ALL.map(|k| k.as_str()))
                .default_value(ActivityKind::default().as_str()),
        )
}

fn handle(dispatcher: &Dispatcher, request: &Request<'_>) -> CbResult<()> {
    let ctx = dispatcher.context();
    let n = request.args.one::<u32>("n").unwrap_or(1) as usize;
    let kind = request
        .args
        .one::<String>("kind")
        .and_then(|k| k.parse::<ActivityKind>().ok())
        .unwrap_or_default();

    let completed = ctx
        .completions
        .completed_dates(&request.caller_id, kind)
        .map_err(|e| e.with_op("missed").with_entity_id(request.caller_id.clone()))?;

    let urls: Vec<String> = missed_days(&completed, ctx.clock.today(), n)
        .into_iter()
        .map(|date| kind.puzzle_url(date))
        .collect();

    request.reply(&urls.join("\n"))
}
