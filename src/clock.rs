use chrono::{DateTime, Local, NaiveDate, Utc};
#[cfg(test)]
use std::cell::Cell;

/// Source of wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The user's logical day, in local time
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for tests
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    today: Cell<NaiveDate>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            now: Cell::new(now),
            today: Cell::new(today),
        }
    }

    /// Parse "YYYY-MM-DDTHH:MM:SSZ"; `today` is the UTC date of that instant
    pub fn at(rfc3339: &str) -> Option<Self> {
        let now = DateTime::parse_from_rfc3339(rfc3339).ok()?.with_timezone(&Utc);
        Some(Self::new(now, now.date_naive()))
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
