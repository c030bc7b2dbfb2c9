use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::query_template::placeholder_count;

/// A named, reusable query template saved by a user
///
/// The template holds positional `?` placeholders that are bound to the
/// caller's arguments when the query is run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub template: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl SavedQuery {
    pub fn new(
        name: impl Into<String>,
        template: impl Into<String>,
        owner_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            owner_id: owner_id.into(),
            created_at,
        }
    }

    /// Number of positional parameters the template expects
    pub fn placeholder_count(&self) -> usize {
        placeholder_count(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count_from_template() {
        let q = SavedQuery::new(
            "streak",
            "SELECT date FROM completions WHERE userid = ? AND kind = ?",
            "U1",
            Utc::now(),
        );
        assert_eq!(q.placeholder_count(), 2);
    }
}
