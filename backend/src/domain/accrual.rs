//! # Allowance Accrual
//!
//! Pure calculation of which weekly allowance periods are due for a child.
//!
//! A period is identified by the Sunday it ends on; weeks run Monday to
//! Sunday. Given a schedule and a reference date, [`plan_accrual`] returns
//! every period that has completed but has not been credited yet, in
//! chronological order. Applying the plan means appending one allowance event
//! per period and moving the child's cursor to [`AccrualPlan::new_cursor`].
//! Because the plan always starts one week after the cursor, planning again
//! after the plan was applied yields nothing for the same or any later date.

use chrono::{Datelike, Duration, NaiveDate};

/// Length of an allowance period in days
pub const PERIOD_DAYS: i64 = 7;

/// The inputs of the accrual calculation for one child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceSchedule {
    pub weekly_amount_cents: i64,
    /// Anchor date; the first period ends on the first Sunday on or after it
    pub start_date: NaiveDate,
    /// Sunday of the last credited period
    pub last_applied: Option<NaiveDate>,
}

/// Periods to credit, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualPlan {
    pub amount_cents: i64,
    pub periods: Vec<NaiveDate>,
}

impl AccrualPlan {
    fn empty(amount_cents: i64) -> Self {
        Self {
            amount_cents,
            periods: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Cursor value once every period of the plan has been credited
    pub fn new_cursor(&self) -> Option<NaiveDate> {
        self.periods.last().copied()
    }

    /// Sum credited by the whole plan, `None` if it does not fit in `i64`
    pub fn total_cents(&self) -> Option<i64> {
        i64::try_from(self.periods.len())
            .ok()
            .and_then(|n| self.amount_cents.checked_mul(n))
    }
}

/// The latest Sunday on or before `today`. A Sunday counts as completed on
/// the day itself.
pub fn most_recent_completed_sunday(today: NaiveDate) -> NaiveDate {
    let weekday = today.weekday().num_days_from_monday() as i64;
    today - Duration::days((weekday + 1) % 7)
}

/// The first Sunday on or after `start_date`
pub fn first_eligible_sunday(start_date: NaiveDate) -> NaiveDate {
    let weekday = start_date.weekday().num_days_from_monday() as i64;
    start_date + Duration::days((6 - weekday) % 7)
}

/// Compute the periods that are due for `schedule` as of `today`.
pub fn plan_accrual(schedule: &AllowanceSchedule, today: NaiveDate) -> AccrualPlan {
    if schedule.weekly_amount_cents <= 0 {
        return AccrualPlan::empty(schedule.weekly_amount_cents);
    }

    let last_completed = most_recent_completed_sunday(today);
    let first_sunday = first_eligible_sunday(schedule.start_date);
    let resume_from = match schedule.last_applied {
        Some(cursor) => cursor + Duration::days(PERIOD_DAYS),
        None => first_sunday,
    };

    let mut periods = Vec::new();
    let mut current = resume_from;
    while current <= last_completed {
        if current >= first_sunday {
            periods.push(current);
        }
        current += Duration::days(PERIOD_DAYS);
    }

    AccrualPlan {
        amount_cents: schedule.weekly_amount_cents,
        periods,
    }
}
