use crate::domain::ports::Clock;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Real time: sleeps on the tokio timer and reads the local date.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Real dates with no waiting and no bookkeeping, for `--instant` runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipClock;

#[async_trait]
impl Clock for SkipClock {
    async fn sleep(&self, _duration: Duration) {}

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Returns immediately from `sleep` and records the requested delays.
///
/// Lets tests assert on simulated latency without spending wall clock time.
#[derive(Debug, Clone)]
pub struct InstantClock {
    today: NaiveDate,
    slept: Arc<RwLock<Vec<Duration>>>,
}

impl InstantClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            slept: Arc::default(),
        }
    }

    /// Every delay requested so far, in order.
    pub async fn slept(&self) -> Vec<Duration> {
        self.slept.read().await.clone()
    }
}

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, duration: Duration) {
        self.slept.write().await.push(duration);
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_instant_clock_records_delays() {
        let clock = InstantClock::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        clock.sleep(Duration::from_millis(2000)).await;
        clock.sleep(Duration::from_millis(1200)).await;
        assert_eq!(
            clock.slept().await,
            vec![Duration::from_millis(2000), Duration::from_millis(1200)]
        );
        assert_eq!(clock.today().to_string(), "2026-10-16");
    }

    #[tokio::test]
    async fn test_skip_clock_returns_at_once() {
        let started = tokio::time::Instant::now();
        SkipClock.sleep(Duration::from_secs(60)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(SkipClock.today(), Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_tokio_clock_sleeps() {
        let started = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_millis(5)).await;
        assert!(started.elapsed() >= Duration::from_millis(5));
    }
}
