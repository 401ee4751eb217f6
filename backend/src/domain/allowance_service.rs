//! Allowance service: applies accrual plans to stored children.
//!
//! [`AllowanceService::accrue_child`] and [`AllowanceService::accrue_all`] are
//! the only writers of allowance events. Each child's batch is committed
//! together with its cursor move, guarded by the cursor value the plan was
//! computed from, so overlapping runs for the same child credit every period
//! once.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::accrual::plan_accrual;
use crate::domain::clock::Clock;
use crate::domain::commands::allowance::{AccrualReport, ChildAccrual};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::child::Child;
use crate::domain::models::ledger_event::NewLedgerEvent;
use crate::domain::money::MAX_AMOUNT_CENTS;
use crate::storage::{AllowanceStorage, ChildStorage, Connection};

#[derive(Clone)]
pub struct AllowanceService<C: Connection> {
    child_repository: C::ChildRepository,
    allowance_repository: C::AllowanceRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> AllowanceService<C> {
    pub fn new(connection: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            allowance_repository: connection.create_allowance_repository(),
            clock,
        }
    }

    /// Credit every completed, uncredited period of one child as of `today`.
    /// Returns the number of periods credited.
    pub async fn accrue_child(&self, child_id: i64, today: NaiveDate) -> DomainResult<u32> {
        let child = self
            .child_repository
            .get_child(child_id)
            .await?
            .ok_or(DomainError::ChildNotFound(child_id))?;

        self.accrue(&child, today).await
    }

    /// Run [`Self::accrue_child`] for every child. A failing child is logged
    /// and reported; the others are still processed.
    pub async fn accrue_all(&self, today: NaiveDate) -> DomainResult<AccrualReport> {
        let children = self.child_repository.list_children().await?;
        info!("Running allowance accrual for {} children as of {}", children.len(), today);

        let mut report = AccrualReport::default();
        for child in &children {
            match self.accrue(child, today).await {
                Ok(credited_periods) => report.accruals.push(ChildAccrual {
                    child_id: child.id,
                    credited_periods,
                }),
                Err(e) => {
                    error!("Allowance accrual failed for child {}: {}", child.id, e);
                    report.failures.push((child.id, e.to_string()));
                }
            }
        }

        info!(
            "Allowance accrual credited {} periods, {} children failed",
            report.credited_periods(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Change the weekly amount. Periods already credited keep their amount
    /// and the cursor stays where it is.
    pub async fn update_weekly_amount(
        &self,
        child_id: i64,
        weekly_allowance_cents: i64,
    ) -> DomainResult<Child> {
        if weekly_allowance_cents < 0 {
            return Err(DomainError::invalid_amount("Weekly allowance cannot be negative"));
        }
        if weekly_allowance_cents > MAX_AMOUNT_CENTS {
            return Err(DomainError::invalid_amount("Weekly allowance is too large"));
        }

        info!(
            "Updating weekly allowance for child {} to {} cents",
            child_id, weekly_allowance_cents
        );
        if !self
            .child_repository
            .update_weekly_allowance(child_id, weekly_allowance_cents)
            .await?
        {
            warn!("Child not found for allowance update: {}", child_id);
            return Err(DomainError::ChildNotFound(child_id));
        }

        self.child_repository
            .get_child(child_id)
            .await?
            .ok_or(DomainError::ChildNotFound(child_id))
    }

    async fn accrue(&self, child: &Child, today: NaiveDate) -> DomainResult<u32> {
        let plan = plan_accrual(&child.schedule(), today);
        let new_cursor = match plan.new_cursor() {
            Some(cursor) => cursor,
            None => {
                debug!("No allowance due for child {} as of {}", child.id, today);
                return Ok(0);
            }
        };

        let posted_at = self.clock.now();
        let events: Vec<NewLedgerEvent> = plan
            .periods
            .iter()
            .map(|period| NewLedgerEvent::allowance(child.id, plan.amount_cents, *period, posted_at))
            .collect();

        let committed = self
            .allowance_repository
            .commit_accrual(child.id, child.last_allowance_applied, new_cursor, &events)
            .await?;

        if !committed {
            warn!(
                "Allowance for child {} was applied concurrently, nothing credited",
                child.id
            );
            return Ok(0);
        }

        info!(
            "Credited {} allowance periods of {} cents to child {}, cursor now {}",
            events.len(),
            plan.amount_cents,
            child.id,
            new_cursor
        );
        Ok(events.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::models::child::NewChild;
    use crate::domain::models::ledger_event::{InitialBalance, LedgerEventKind};
    use crate::storage::{
        AllowanceRepository, ChildRepository, DbConnection, LedgerRepository, LedgerStorage,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    /// Wednesday
    fn anchor() -> NaiveDate {
        date(6, 4)
    }

    struct Fixture {
        service: AllowanceService<DbConnection>,
        db: Arc<DbConnection>,
    }

    impl Fixture {
        async fn new() -> Self {
            let db = Arc::new(DbConnection::init_test().await.expect("Failed to init test DB"));
            let service = AllowanceService::new(db.clone(), Arc::new(FixedClock::on(anchor())));
            Self { service, db }
        }

        async fn add_child(&self, name: &str, weekly: i64, initial: Option<i64>) -> i64 {
            self.db
                .create_child_repository()
                .store_child(
                    &NewChild {
                        name: name.to_string(),
                        weekly_allowance_cents: weekly,
                        allowance_start_date: anchor(),
                        created_at: Utc::now(),
                    },
                    initial.map(InitialBalance::new),
                )
                .await
                .expect("Failed to store child")
                .id
        }

        async fn child(&self, child_id: i64) -> Child {
            self.db
                .create_child_repository()
                .get_child(child_id)
                .await
                .unwrap()
                .unwrap()
        }

        async fn balance(&self, child_id: i64) -> i64 {
            self.db.create_ledger_repository().balance(child_id).await.unwrap()
        }

        async fn allowance_periods(&self, child_id: i64) -> Vec<NaiveDate> {
            let mut periods: Vec<NaiveDate> = self
                .db
                .create_ledger_repository()
                .history(child_id)
                .await
                .unwrap()
                .into_iter()
                .filter(|e| e.kind == LedgerEventKind::Allowance)
                .filter_map(|e| e.period_ending)
                .collect();
            periods.sort();
            periods
        }
    }

    #[tokio::test]
    async fn test_catch_up_after_three_weeks() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 500, None).await;

        let credited = f
            .service
            .accrue_child(child_id, anchor() + Duration::days(22))
            .await
            .unwrap();

        assert_eq!(credited, 3);
        assert_eq!(f.allowance_periods(child_id).await, vec![date(6, 8), date(6, 15), date(6, 22)]);
        assert_eq!(f.child(child_id).await.last_allowance_applied, Some(date(6, 22)));
        assert_eq!(f.balance(child_id).await, 1500);
    }

    #[tokio::test]
    async fn test_second_run_same_day_credits_nothing() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 500, Some(100)).await;
        let today = date(6, 30);

        assert_eq!(f.service.accrue_child(child_id, today).await.unwrap(), 4);
        assert_eq!(f.service.accrue_child(child_id, today).await.unwrap(), 0);
        assert_eq!(f.service.accrue_child(child_id, date(7, 5)).await.unwrap(), 0);

        assert_eq!(f.balance(child_id).await, 2100);
    }

    #[tokio::test]
    async fn test_periods_are_consecutive_sundays() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 250, None).await;

        // Irregular run dates still produce one event per week, in order
        for today in [date(6, 10), date(6, 11), date(7, 2), date(7, 20)] {
            let before = f.child(child_id).await.last_allowance_applied;
            f.service.accrue_child(child_id, today).await.unwrap();
            let after = f.child(child_id).await.last_allowance_applied;
            assert!(after >= before);
        }

        let periods = f.allowance_periods(child_id).await;
        assert_eq!(periods.first(), Some(&date(6, 8)));
        assert_eq!(periods.last(), Some(&date(7, 20)));
        for pair in periods.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(7));
        }
    }

    #[tokio::test]
    async fn test_zero_weekly_amount_never_accrues() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 0, None).await;

        assert_eq!(f.service.accrue_child(child_id, date(9, 1)).await.unwrap(), 0);

        assert_eq!(f.child(child_id).await.last_allowance_applied, None);
        assert_eq!(f.balance(child_id).await, 0);
    }

    #[tokio::test]
    async fn test_accrue_missing_child_is_not_found() {
        let f = Fixture::new().await;
        let err = f.service.accrue_child(404, anchor()).await.unwrap_err();
        assert!(matches!(err, DomainError::ChildNotFound(404)));
    }

    #[tokio::test]
    async fn test_accrue_all_reports_per_child() {
        let f = Fixture::new().await;
        let ada = f.add_child("Ada", 500, None).await;
        let max = f.add_child("Max", 0, None).await;

        let report = f.service.accrue_all(date(6, 15)).await.unwrap();

        assert_eq!(report.credited_periods(), 2);
        assert!(report.failures.is_empty());
        assert!(report.accruals.contains(&ChildAccrual { child_id: ada, credited_periods: 2 }));
        assert!(report.accruals.contains(&ChildAccrual { child_id: max, credited_periods: 0 }));
    }

    #[tokio::test]
    async fn test_weekly_amount_change_applies_going_forward() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 500, None).await;
        f.service.accrue_child(child_id, date(6, 15)).await.unwrap();

        let child = f.service.update_weekly_amount(child_id, 800).await.unwrap();
        assert_eq!(child.weekly_allowance_cents, 800);
        assert_eq!(child.last_allowance_applied, Some(date(6, 15)));

        f.service.accrue_child(child_id, date(6, 22)).await.unwrap();
        assert_eq!(f.balance(child_id).await, 500 + 500 + 800);
    }

    #[tokio::test]
    async fn test_paused_allowance_catches_up_when_resumed() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 500, None).await;
        f.service.accrue_child(child_id, date(6, 8)).await.unwrap();

        f.service.update_weekly_amount(child_id, 0).await.unwrap();
        assert_eq!(f.service.accrue_child(child_id, date(6, 29)).await.unwrap(), 0);

        f.service.update_weekly_amount(child_id, 300).await.unwrap();
        assert_eq!(f.service.accrue_child(child_id, date(6, 29)).await.unwrap(), 3);
        assert_eq!(f.balance(child_id).await, 500 + 3 * 300);
    }

    #[tokio::test]
    async fn test_update_weekly_amount_rejects_bad_input() {
        let f = Fixture::new().await;
        let child_id = f.add_child("Ada", 500, None).await;

        let err = f.service.update_weekly_amount(child_id, -1).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
        assert_eq!(f.child(child_id).await.weekly_allowance_cents, 500);

        let err = f
            .service
            .update_weekly_amount(child_id, MAX_AMOUNT_CENTS + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));

        let err = f.service.update_weekly_amount(child_id + 1, 100).await.unwrap_err();
        assert!(matches!(err, DomainError::ChildNotFound(_)));
    }

    /// Storage whose accrual commits fail for one child
    #[derive(Clone)]
    struct FlakyConnection {
        db: DbConnection,
        failing_child: i64,
    }

    #[derive(Clone)]
    struct FlakyAllowances {
        inner: AllowanceRepository,
        failing_child: i64,
    }

    #[async_trait]
    impl AllowanceStorage for FlakyAllowances {
        async fn commit_accrual(
            &self,
            child_id: i64,
            expected_cursor: Option<NaiveDate>,
            new_cursor: NaiveDate,
            events: &[NewLedgerEvent],
        ) -> Result<bool> {
            if child_id == self.failing_child {
                return Err(anyhow!("disk I/O error"));
            }
            self.inner
                .commit_accrual(child_id, expected_cursor, new_cursor, events)
                .await
        }
    }

    impl Connection for FlakyConnection {
        type ChildRepository = ChildRepository;
        type LedgerRepository = LedgerRepository;
        type AllowanceRepository = FlakyAllowances;

        fn create_child_repository(&self) -> ChildRepository {
            self.db.create_child_repository()
        }

        fn create_ledger_repository(&self) -> LedgerRepository {
            self.db.create_ledger_repository()
        }

        fn create_allowance_repository(&self) -> FlakyAllowances {
            FlakyAllowances {
                inner: self.db.create_allowance_repository(),
                failing_child: self.failing_child,
            }
        }
    }

    #[tokio::test]
    async fn test_failing_child_does_not_stop_others() {
        let f = Fixture::new().await;
        let ada = f.add_child("Ada", 500, None).await;
        let bob = f.add_child("Bob", 500, None).await;
        let cal = f.add_child("Cal", 500, None).await;

        let flaky = Arc::new(FlakyConnection {
            db: (*f.db).clone(),
            failing_child: bob,
        });
        let service = AllowanceService::new(flaky, Arc::new(FixedClock::on(anchor())));

        let report = service.accrue_all(date(6, 15)).await.unwrap();

        assert_eq!(report.failed_child_ids(), vec![bob]);
        assert_eq!(report.credited_periods(), 4);
        assert_eq!(f.balance(ada).await, 1000);
        assert_eq!(f.balance(bob).await, 0);
        assert_eq!(f.child(bob).await.last_allowance_applied, None);
        assert_eq!(f.balance(cal).await, 1000);
    }
}
