//! Daily employee report scheduling.
//!
//! The scheduler owns no global state: `start` returns a handle and all
//! control flows through it. At most one report run is active at a time; a
//! fire that arrives while the previous run is still going is skipped with a
//! warning.

use chrono::{DateTime, Days, NaiveTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::services::ReportService;

/// When and for whom the daily report fires
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Hour of day, UTC
    pub hour: u8,
    pub minute: u8,
    pub recipient: String,
}

/// Owned handle to a running report schedule
///
/// Dropping the handle leaves the task running; call `stop` to cancel it.
pub struct SchedulerHandle {
    task: JoinHandle<()>,
    config: ScheduleConfig,
}

impl SchedulerHandle {
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

/// Spawns and controls the daily report task
pub struct ReportScheduler {
    report_service: Arc<ReportService>,
    // Shared across restarts so a reschedule cannot overlap a still-running
    // report from the previous schedule
    run_guard: Arc<tokio::sync::Mutex<()>>,
}

impl ReportScheduler {
    pub fn new(report_service: Arc<ReportService>) -> Self {
        Self {
            report_service,
            run_guard: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Start the daily job; each fire reports on "yesterday" in UTC
    pub fn start(&self, config: ScheduleConfig) -> SchedulerHandle {
        let report_service = Arc::clone(&self.report_service);
        let run_guard = Arc::clone(&self.run_guard);
        let task_config = config.clone();

        let task = tokio::spawn(async move {
            loop {
                let delay =
                    duration_until_next(task_config.hour, task_config.minute, Utc::now());
                tracing::debug!(
                    delay_secs = delay.as_secs(),
                    "Sleeping until next report fire"
                );
                tokio::time::sleep(delay).await;

                run_daily_report(&report_service, &run_guard, &task_config.recipient).await;
            }
        });

        tracing::info!(
            hour = config.hour,
            minute = config.minute,
            recipient = %config.recipient,
            "Daily report schedule started"
        );

        SchedulerHandle { task, config }
    }

    /// Stop the running schedule and start a new one at the given time
    pub fn reschedule(&self, handle: SchedulerHandle, hour: u8, minute: u8) -> SchedulerHandle {
        let recipient = handle.config.recipient.clone();
        handle.stop();
        self.start(ScheduleConfig {
            hour,
            minute,
            recipient,
        })
    }
}

/// One fire of the daily job; reports on "yesterday" in UTC
///
/// Returns false when the fire was skipped because a previous run still
/// holds the guard.
async fn run_daily_report(
    report_service: &ReportService,
    run_guard: &tokio::sync::Mutex<()>,
    recipient: &str,
) -> bool {
    let Ok(_guard) = run_guard.try_lock() else {
        tracing::warn!("Previous report run still active, skipping this fire");
        return false;
    };

    let Some(yesterday) = Utc::now().date_naive().checked_sub_days(Days::new(1)) else {
        return true;
    };

    if let Err(e) = report_service.send_report_for_date(yesterday, recipient).await {
        tracing::error!("Daily employee report failed: {}", e);
    }
    true
}

/// Time until the next hh:mm occurrence, strictly in the future
fn duration_until_next(hour: u8, minute: u8, now: DateTime<Utc>) -> Duration {
    let time =
        NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0).unwrap_or(NaiveTime::MIN);

    let today = now.date_naive().and_time(time).and_utc();
    let next = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use migration::{Migrator, MigratorTrait};

    use crate::services::{LogReportSink, ReportService};
    use crate::stores::EmployeeStore;

    async fn test_report_service() -> Arc<ReportService> {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        Arc::new(ReportService::new(
            Arc::new(EmployeeStore::new(db)),
            Arc::new(LogReportSink),
        ))
    }

    #[tokio::test]
    async fn fire_is_skipped_while_a_run_holds_the_guard() {
        let service = test_report_service().await;
        let guard = tokio::sync::Mutex::new(());

        let held = guard.lock().await;
        assert!(!run_daily_report(&service, &guard, "ops@ems.com").await);

        drop(held);
        assert!(run_daily_report(&service, &guard, "ops@ems.com").await);
    }

    #[tokio::test]
    async fn reschedule_swaps_the_fire_time_and_keeps_the_recipient() {
        let service = test_report_service().await;
        let scheduler = ReportScheduler::new(service);

        let handle = scheduler.start(ScheduleConfig {
            hour: 9,
            minute: 0,
            recipient: "ops@ems.com".to_string(),
        });
        assert!(handle.is_running());

        let handle = scheduler.reschedule(handle, 18, 30);
        assert_eq!(handle.config().hour, 18);
        assert_eq!(handle.config().minute, 30);
        assert_eq!(handle.config().recipient, "ops@ems.com");
        assert!(handle.is_running());

        handle.stop();
    }

    #[test]
    fn next_fire_later_today() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let delay = duration_until_next(9, 0, now);
        assert_eq!(delay, Duration::from_secs(60 * 60));
    }

    #[test]
    fn next_fire_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let delay = duration_until_next(9, 0, now);
        assert_eq!(delay, Duration::from_secs(23 * 60 * 60 + 30 * 60));
    }

    #[test]
    fn exact_fire_time_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let delay = duration_until_next(9, 0, now);
        assert_eq!(delay, Duration::from_secs(24 * 60 * 60));
    }
}
