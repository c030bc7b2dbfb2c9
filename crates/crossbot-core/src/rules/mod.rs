pub mod query_template;

pub use query_template::{
    arity_summary, check_arity, normalize_chat_text, placeholder_count, validate_query_body,
    validate_query_name,
};
