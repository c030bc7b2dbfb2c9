//! Command registry and parser
//!
//! Command modules register subcommands (a `clap::Command` describing the
//! arguments, plus a handler) into a single tree. `parse` tokenizes message
//! text on whitespace, matches it against the tree, and returns the handler
//! for the selected subcommand together with its typed arguments.
//!
//! The registry is generic over the handler type so that this crate does not
//! need to know what a handler is called with.

use clap::error::ErrorKind;
use clap::{ArgMatches, ColorChoice};

use crate::errors::{CrossbotError, Result};

/// Classification of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// First token is not a registered subcommand
    UnknownCommand,
    /// A required positional or subcommand was not given
    MissingArgument,
    /// A value failed type coercion or validation
    InvalidValue,
    /// An unexpected flag or surplus argument
    UnexpectedArgument,
    /// The caller asked for help; the message is the help text
    Help,
    Other,
}

/// A user-displayable parse failure
///
/// The dispatcher always turns this into a direct reply to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_clap(err: clap::Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::InvalidSubcommand => ParseErrorKind::UnknownCommand,
            ErrorKind::MissingRequiredArgument | ErrorKind::MissingSubcommand => {
                ParseErrorKind::MissingArgument
            }
            ErrorKind::InvalidValue | ErrorKind::ValueValidation | ErrorKind::InvalidUtf8 => {
                ParseErrorKind::InvalidValue
            }
            ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::TooFewValues
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::ArgumentConflict
            | ErrorKind::NoEquals => ParseErrorKind::UnexpectedArgument,
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => ParseErrorKind::Help,
            _ => ParseErrorKind::Other,
        };
        Self::new(kind, err.to_string().trim_end())
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// Typed arguments of the selected subcommand
///
/// Lookups never panic: an id the subcommand does not define reads as absent.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    command: String,
    matches: ArgMatches,
}

impl ParsedArgs {
    /// Name of the subcommand that was matched
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Value of a boolean flag; false when absent
    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// A single typed value (after defaults and coercion)
    pub fn one<T>(&self, id: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.matches.try_get_one::<T>(id).ok().flatten().cloned()
    }

    /// All string values of a variadic argument, in order
    pub fn strings(&self, id: &str) -> Vec<String> {
        self.matches
            .try_get_many::<String>(id)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }
}

/// Tree of registered subcommands
#[derive(Clone)]
pub struct CommandRegistry<H> {
    root: clap::Command,
    handlers: Vec<(String, H)>,
}

impl<H> CommandRegistry<H> {
    /// Create an empty registry whose help is titled `program`
    pub fn new(program: &'static str, about: &'static str) -> Self {
        let root = clap::Command::new(program)
            .about(about)
            .no_binary_name(true)
            .arg_required_else_help(true)
            .subcommand_required(true)
            .disable_version_flag(true)
            .color(ColorChoice::Never);
        Self {
            root,
            handlers: Vec::new(),
        }
    }

    /// Add a subcommand
    ///
    /// Help lists subcommands in registration order.
    ///
    /// # Errors
    /// * `DuplicateCommand` - a subcommand with this name already exists
    pub fn register(&mut self, spec: clap::Command, handler: H) -> Result<()> {
        let name = spec.get_name().to_string();
        if self.contains(&name) {
            return Err(CrossbotError::DuplicateCommand { name });
        }

        let order = self.handlers.len();
        self.root = self.root.clone().subcommand(spec.display_order(order));
        self.handlers.push((name, handler));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.iter().any(|(n, _)| n == name)
    }

    /// Registered subcommand names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve message text to a handler and its arguments
    ///
    /// # Errors
    /// Returns a `ParseError` for unknown subcommands, missing or mistyped
    /// arguments, unexpected flags, and help requests.
    pub fn parse(&self, text: &str) -> std::result::Result<(&H, ParsedArgs), ParseError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let matches = self
            .root
            .clone()
            .try_get_matches_from(tokens)
            .map_err(ParseError::from_clap)?;

        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            ParseError::new(ParseErrorKind::MissingArgument, "No command given")
        })?;

        let handler = self
            .handlers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
            .ok_or_else(|| {
                ParseError::new(
                    ParseErrorKind::UnknownCommand,
                    format!("Unknown command `{}`", name),
                )
            })?;

        Ok((
            handler,
            ParsedArgs {
                command: name.to_string(),
                matches: sub_matches.clone(),
            },
        ))
    }

    /// Rendered help for the whole tree
    pub fn help(&self) -> String {
        self.root.clone().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{value_parser, Arg, ArgAction};

    fn registry() -> CommandRegistry<&'static str> {
        let mut reg = CommandRegistry::new("crossbot", "test bot");
        reg.register(
            clap::Command::new("missed").about("Missed days").arg(
                Arg::new("n")
                    .value_parser(value_parser!(u32).range(1..))
                    .default_value("1"),
            ),
            "missed-handler",
        )
        .unwrap();
        reg.register(
            clap::Command::new("query")
                .about("Saved queries")
                .arg(Arg::new("name"))
                .arg(Arg::new("save").long("save").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("params")
                        .num_args(0..)
                        .allow_hyphen_values(true)
                        .trailing_var_arg(true),
                ),
            "query-handler",
        )
        .unwrap();
        reg
    }

    #[test]
    fn test_parse_default_and_coercion() {
        let reg = registry();

        let (handler, args) = reg.parse("missed").unwrap();
        assert_eq!(*handler, "missed-handler");
        assert_eq!(args.command(), "missed");
        assert_eq!(args.one::<u32>("n"), Some(1));

        let (_, args) = reg.parse("missed 4").unwrap();
        assert_eq!(args.one::<u32>("n"), Some(4));
    }

    #[test]
    fn test_parse_flag_and_trailing_params() {
        let reg = registry();
        let (handler, args) = reg.parse("query myq --save a = ?").unwrap();
        assert_eq!(*handler, "query-handler");
        assert_eq!(args.one::<String>("name").as_deref(), Some("myq"));
        assert!(args.flag("save"));
        assert_eq!(args.strings("params"), vec!["a", "=", "?"]);
    }

    #[test]
    fn test_parse_hyphen_values_in_params() {
        let reg = registry();
        let (_, args) = reg.parse("query myq -1 -x").unwrap();
        assert!(!args.flag("save"));
        assert_eq!(args.strings("params"), vec!["-1", "-x"]);
    }

    #[test]
    fn test_errors_are_distinct() {
        let reg = registry();

        let unknown = reg.parse("frobnicate").unwrap_err();
        assert_eq!(unknown.kind(), ParseErrorKind::UnknownCommand);

        let bad_type = reg.parse("missed lots").unwrap_err();
        assert_eq!(bad_type.kind(), ParseErrorKind::InvalidValue);

        let bad_flag = reg.parse("missed --loud").unwrap_err();
        assert_eq!(bad_flag.kind(), ParseErrorKind::UnexpectedArgument);

        assert_ne!(unknown.message(), bad_type.message());
        assert_ne!(bad_type.message(), bad_flag.message());
    }

    #[test]
    fn test_empty_text_shows_help() {
        let reg = registry();
        let err = reg.parse("   ").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::Help);
        assert!(err.message().contains("missed"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut reg = registry();
        let err = reg
            .register(clap::Command::new("missed"), "other")
            .unwrap_err();
        assert_eq!(
            err,
            CrossbotError::DuplicateCommand {
                name: "missed".to_string()
            }
        );
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_help_lists_in_registration_order() {
        let reg = registry();
        assert_eq!(reg.names(), vec!["missed", "query"]);
        let help = reg.help();
        let missed_at = help.find("missed").unwrap();
        let query_at = help.find("query").unwrap();
        assert!(missed_at < query_at);
    }

    #[test]
    fn test_missing_arg_lookup_is_absent_not_panic() {
        let reg = registry();
        let (_, args) = reg.parse("missed").unwrap();
        assert!(!args.flag("save"));
        assert!(args.strings("params").is_empty());
        assert_eq!(args.one::<String>("name"), None);
    }
}
