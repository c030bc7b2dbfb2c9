//! Rules for user-authored query templates
//!
//! Templates are screened before they are saved and their placeholders are
//! counted before they are run. Both scans ignore SQL string literals,
//! quoted identifiers and comments.

use crate::errors::{CrossbotError, Result};

/// Keywords that would let a saved query modify the store or the connection.
///
/// `replace` is left out so the string function stays usable; a bare
/// `REPLACE INTO` still fails on the worker's read-only connection.
const FORBIDDEN_KEYWORDS: &[&str] = &[
    "alter", "analyze", "attach", "begin", "commit", "create", "delete", "detach", "drop",
    "insert", "pragma", "reindex", "release", "rollback", "savepoint", "update", "vacuum",
];

const MAX_QUERY_NAME_LEN: usize = 64;

/// Undo the rewriting chat clients apply to message text.
///
/// Typographic quotes become plain quotes and the HTML entities used to
/// escape `<`, `>` and `&` are decoded (`&amp;` last so it cannot create
/// new entities).
pub fn normalize_chat_text(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// The template with string literals, quoted identifiers and comments
/// each replaced by a single space
fn code_only(template: &str) -> String {
    let mut code = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' | '[' => {
                let close = if c == '[' { ']' } else { c };
                for inner in chars.by_ref() {
                    if inner == close {
                        break;
                    }
                }
                code.push(' ');
            }
            '-' if chars.peek() == Some(&'-') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        break;
                    }
                }
                code.push(' ');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                code.push(' ');
            }
            _ => code.push(c),
        }
    }
    code
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Number of arguments a template binds
///
/// Follows SQLite's numbering: a bare `?` takes the next index, `?NNN`
/// names index NNN, and a `:name`, `@name` or `$name` takes the next index
/// on its first use only. The count is the highest index used.
pub fn placeholder_count(template: &str) -> usize {
    let code: Vec<char> = code_only(template).chars().collect();
    let mut highest = 0usize;
    let mut names: Vec<String> = Vec::new();
    let mut i = 0;

    while i < code.len() {
        let c = code[i];
        let follows_word = i > 0 && is_word_char(code[i - 1]);
        match c {
            '?' => {
                let digits: String = code[i + 1..]
                    .iter()
                    .take_while(|d| d.is_ascii_digit())
                    .collect();
                i += 1 + digits.len();
                highest = match digits.parse::<usize>() {
                    Ok(index) => highest.max(index),
                    Err(_) => highest + 1,
                };
                continue;
            }
            ':' | '@' | '$' if !follows_word => {
                let name: String = code[i + 1..]
                    .iter()
                    .take_while(|d| is_word_char(**d))
                    .collect();
                if !name.is_empty() {
                    i += 1 + name.len();
                    let key = format!("{}{}", c, name);
                    if !names.contains(&key) {
                        names.push(key);
                        highest += 1;
                    }
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    highest
}

/// "takes N argument(s) but M was/were given", pluralized
pub fn arity_summary(expected: usize, supplied: usize) -> String {
    format!(
        "takes {} argument{} but {} {} given",
        expected,
        if expected == 1 { "" } else { "s" },
        supplied,
        if supplied == 1 { "was" } else { "were" }
    )
}

/// Check that a query body is non-empty and read-only in shape
///
/// # Errors
/// * `EmptyQuery` - body is blank
/// * `UnsafeQuery` - body contains a write, DDL, or connection keyword
pub fn validate_query_body(body: &str) -> Result<()> {
    if body.trim().is_empty() {
        return Err(CrossbotError::EmptyQuery);
    }

    let forbidden = code_only(body)
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .map(|word| word.to_ascii_lowercase())
        .find(|word| FORBIDDEN_KEYWORDS.contains(&word.as_str()));
    if let Some(keyword) = forbidden {
        return Err(CrossbotError::UnsafeQuery { keyword });
    }

    Ok(())
}

/// Check that a saved-query name is a short identifier
///
/// # Errors
/// * `InvalidQueryName` - empty, too long, or containing other than `[A-Za-z0-9_.-]`
pub fn validate_query_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| CrossbotError::InvalidQueryName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.chars().count() > MAX_QUERY_NAME_LEN {
        return Err(invalid("name is longer than 64 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(invalid("only letters, digits, '_', '-' and '.' are allowed"));
    }
    Ok(())
}

/// Compare the supplied argument count against the template
///
/// # Errors
/// * `PlaceholderMismatch` - counts differ
pub fn check_arity(template: &str, supplied: usize) -> Result<()> {
    let expected = placeholder_count(template);
    if expected != supplied {
        return Err(CrossbotError::PlaceholderMismatch { expected, supplied });
    }
    Ok(())
}
