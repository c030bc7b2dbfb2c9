//! `query [name] [--save] [params...]`
//!
//! - `query` lists every saved query
//! - `query NAME --save BODY...` saves BODY under NAME, replacing any old one
//! - `query NAME ARGS...` runs NAME with ARGS bound to its `?` placeholders
//!
//! Everything from the first argument on is an argument, so `--save` only
//! takes effect before it: `query NAME ARGS... --save` runs NAME.

use clap::{Arg, ArgAction, Command};
use crossbot_core::errors::{CbResult, CrossbotError, Result};
use crossbot_core::model::{ExecutionResult, FailureReason, QueryParam, SavedQuery};
use crossbot_core::render::render_execution;
use crossbot_core::request::Request;
use crossbot_core::rules::{
    check_arity, normalize_chat_text, validate_query_body, validate_query_name,
};

use crate::context::BotContext;
use crate::dispatcher::Dispatcher;

pub const EMPTY_LIST_MESSAGE: &str =
    "There are no saved messages yet... make one with `query --save ...`!";

pub fn init(dispatcher: &mut Dispatcher) -> Result<()> {
    dispatcher.register(spec(), handle)
}

fn spec() -> Command {
    Command::new("query")
        .about("Run, save (`query NAME --save BODY...`) or list saved queries")
        .arg(Arg::new("name").help("Saved query name to run"))
        .arg(
            Arg::new("save")
                .long("save")
                .action(ArgAction::SetTrue)
                .help("Create or overwrite a saved query"),
        )
        .arg(
            Arg::new("params")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true)
                .help("Arguments for the saved query or, with --save, the query itself using ? for arguments; --save must come first"),
        )
}

fn handle(dispatcher: &Dispatcher, request: &Request<'_>) -> CbResult<()> {
    let ctx = dispatcher.context();
    let name = request.args.one::<String>("name");
    let params = request.args.strings("params");

    if request.args.flag("save") {
        return save(ctx, request, name.unwrap_or_default(), &params);
    }
    match name {
        Some(name) => run(ctx, request, &name, &params),
        None => list(ctx, request),
    }
}

fn save(ctx: &BotContext, request: &Request<'_>, name: String, words: &[String]) -> CbResult<()> {
    let body = normalize_chat_text(&body_text(&request.raw_text, words));
    if let Err(e) = validate_query_name(&name).and_then(|()| validate_query_body(&body)) {
        return request.direct_reply(&e.to_string());
    }

    let query = SavedQuery::new(name, body, request.caller_id.clone(), ctx.clock.now());
    ctx.queries
        .save_query(&query)
        .map_err(|e| e.with_op("save_query").with_entity_id(query.name.clone()))?;
    tracing::info!(query_name = %query.name, "saved query");

    request.reply(&format!(
        "Saved new query `{}` from {}",
        query.name,
        request.display_name(&request.caller_id)
    ))
}

/// The save body as typed, line breaks included
///
/// The body is the tail of the message made of `words`. If the text does
/// not end with exactly those words the words are joined with spaces.
fn body_text(raw_text: &str, words: &[String]) -> String {
    let skip = raw_text
        .split_whitespace()
        .count()
        .saturating_sub(words.len());
    let mut rest = raw_text.trim_start();
    for _ in 0..skip {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    let rest = rest.trim_end();

    if rest.split_whitespace().eq(words.iter().map(String::as_str)) {
        rest.to_string()
    } else {
        words.join(" ")
    }
}

fn run(ctx: &BotContext, request: &Request<'_>, name: &str, args: &[String]) -> CbResult<()> {
    let saved = ctx
        .queries
        .get_query(name)
        .map_err(|e| e.with_op("get_query").with_entity_id(name))?;
    let Some(saved) = saved else {
        let missing = CrossbotError::QueryNotFound {
            name: name.to_string(),
        };
        return request.reply(&missing.to_string());
    };

    let params: Vec<QueryParam> = args
        .iter()
        .map(|arg| QueryParam::infer(&normalize_chat_text(arg)))
        .collect();

    let result = match check_arity(&saved.template, params.len()) {
        Err(CrossbotError::PlaceholderMismatch { expected, supplied }) => {
            ExecutionResult::Failure(FailureReason::PlaceholderMismatch { expected, supplied })
        }
        _ => ctx
            .executor
            .execute(&saved.template, &params, ctx.executor.default_budget()),
    };

    if result.is_timeout() {
        tracing::warn!(
            query_name = name,
            caller_id = %request.caller_id,
            "saved query ran past its budget"
        );
    }

    let text = render_execution(&result, ctx.executor.max_rows(), &|id| {
        request.display_name(id)
    });
    request.reply(&text)
}

fn list(ctx: &BotContext, request: &Request<'_>) -> CbResult<()> {
    let queries = ctx
        .queries
        .list_queries()
        .map_err(|e| e.with_op("list_queries"))?;

    if queries.is_empty() {
        return request.reply(EMPTY_LIST_MESSAGE);
    }

    let entries: Vec<String> = queries
        .iter()
        .map(|q| {
            let args = match q.placeholder_count() {
                0 => String::new(),
                1 => " (takes 1 arg)".to_string(),
                n => format!(" (takes {} args)", n),
            };
            format!(
                "*{}* by {}{}:\n {}",
                q.name,
                request.display_name(&q.owner_id),
                args,
                q.template
            )
        })
        .collect();

    request.reply(&entries.join("\n\n"))
}
