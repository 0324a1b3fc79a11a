use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Time allowed to submit the next attempt
pub const DEFAULT_ATTEMPT_CLOCK: Duration = Duration::from_secs(60);

/// Parse "1m", "90s", "1m 30s"; a bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    let duration = match s.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(s)
            .with_context(|| format!("Invalid duration '{}' (try 1m or 90s)", s))?,
    };
    if duration.is_zero() {
        bail!("Duration must be greater than zero");
    }
    Ok(duration)
}

/// A countdown that is advanced explicitly, so it can be driven by any timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
    elapsed: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed).min(self.total);
    }

    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining().is_zero()
    }

    /// `MM:SS`, rounding partial seconds up so 0:00 only shows at the end.
    pub fn display(&self) -> String {
        let remaining = self.remaining();
        let mut secs = remaining.as_secs();
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// Count down `total`, calling `on_tick` once at the start and after every
/// `period` until the countdown reaches zero. A zero period never advances
/// the countdown, so it reports the starting value once and returns.
pub async fn run_countdown<F>(total: Duration, period: Duration, mut on_tick: F) -> Countdown
where
    F: FnMut(&Countdown),
{
    let mut countdown = Countdown::new(total);
    if period.is_zero() {
        on_tick(&countdown);
        return countdown;
    }
    let mut interval = tokio::time::interval(period);
    // First tick completes immediately
    interval.tick().await;
    on_tick(&countdown);

    while !countdown.is_finished() {
        interval.tick().await;
        countdown.tick(period);
        on_tick(&countdown);
    }
    countdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1m 30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("45").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("0").is_err());
    }

    #[test]
    fn test_countdown_display() {
        let mut countdown = Countdown::new(Duration::from_secs(90));
        assert_eq!(countdown.display(), "01:30");
        countdown.tick(Duration::from_millis(500));
        assert_eq!(countdown.display(), "01:30");
        countdown.tick(Duration::from_millis(500));
        assert_eq!(countdown.display(), "01:29");
    }

    #[test]
    fn test_countdown_finishes_and_saturates() {
        let mut countdown = Countdown::new(Duration::from_secs(2));
        assert!(!countdown.is_finished());
        countdown.tick(Duration::from_secs(5));
        assert!(countdown.is_finished());
        assert_eq!(countdown.remaining(), Duration::ZERO);
        assert_eq!(countdown.display(), "00:00");
    }

    #[tokio::test]
    async fn test_run_countdown_ticks_until_done() {
        let mut seen = Vec::new();
        let done = run_countdown(
            Duration::from_millis(30),
            Duration::from_millis(10),
            |c| seen.push(c.remaining()),
        )
        .await;

        assert!(done.is_finished());
        assert_eq!(
            seen,
            vec![
                Duration::from_millis(30),
                Duration::from_millis(20),
                Duration::from_millis(10),
                Duration::ZERO,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_countdown_zero_period_returns() {
        let mut calls = 0;
        let done = run_countdown(Duration::from_secs(60), Duration::ZERO, |_| calls += 1).await;
        assert_eq!(calls, 1);
        assert_eq!(done.remaining(), Duration::from_secs(60));
        assert!(!done.is_finished());
    }
}
