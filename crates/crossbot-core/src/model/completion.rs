use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The kind of puzzle a completion was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    #[default]
    Mini,
    Regular,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 2] = [ActivityKind::Mini, ActivityKind::Regular];

    /// Stable identifier used in the completions table and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Mini => "mini",
            ActivityKind::Regular => "regular",
        }
    }

    /// Canonical link to the puzzle for `date`
    pub fn puzzle_url(&self, date: NaiveDate) -> String {
        let game = match self {
            ActivityKind::Mini => "mini",
            ActivityKind::Regular => "daily",
        };
        format!(
            "https://www.nytimes.com/crosswords/game/{}/{:04}/{:02}/{:02}",
            game,
            date.year(),
            date.month(),
            date.day()
        )
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mini" => Ok(ActivityKind::Mini),
            "regular" => Ok(ActivityKind::Regular),
            other => Err(format!("unknown activity kind '{}'", other)),
        }
    }
}

/// One completed puzzle for one user
///
/// Written by the completion-tracking side of the bot; the command kernel
/// only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: String,
    pub kind: ActivityKind,
    pub date: NaiveDate,
}

impl CompletionRecord {
    pub fn new(user_id: impl Into<String>, kind: ActivityKind, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            date,
        }
    }
}
