//! Source of "today" and "now" for the services.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Local calendar date used to decide which allowance periods are due
    fn today(&self) -> NaiveDate;

    /// Timestamp recorded on new ledger events
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host
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

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to noon UTC on `today`
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
