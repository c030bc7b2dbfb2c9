//! Source of "today" for date-based commands

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current date and time to command handlers
pub trait Clock: Send + Sync {
    /// The calendar date commands treat as "today"
    fn today(&self) -> NaiveDate;

    /// Current instant, used for record timestamps
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock in the host's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one date (midnight UTC)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now(&self) -> DateTime<Utc> {
        self.date.and_time(chrono::NaiveTime::MIN).and_utc()
    }
}
