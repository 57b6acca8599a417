use std::time::Duration;

/// Delay applied after the first failure of a run.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2000);

/// Successes in a row required to restore the full backoff delay.
const RESET_STREAK: u32 = 10;

/// Sawtooth backoff applied between failed files.
///
/// Each failure waits the current delay and halves it for the next one, so a
/// persistently bad file or medium does not stall the whole batch. A
/// sustained run of clean files restores full caution.
#[derive(Debug, Clone)]
pub struct BackoffState {
  default_delay: Duration,
  delay: Duration,
  streak: u32,
}

impl BackoffState {
  pub fn new(default_delay: Duration) -> Self {
    Self { default_delay, delay: default_delay, streak: 0 }
  }

  /// Delay to wait before continuing. Halves the stored delay afterwards.
  pub fn on_failure(&mut self) -> Duration {
    self.streak = 0;
    let delay = self.delay;
    self.delay /= 2;
    delay
  }

  pub fn on_success(&mut self) {
    self.streak += 1;
    if self.streak >= RESET_STREAK {
      self.delay = self.default_delay;
    }
  }
}

impl Default for BackoffState {
  fn default() -> Self {
    Self::new(DEFAULT_BACKOFF)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failures_halve_the_applied_delay() {
    let mut backoff = BackoffState::new(Duration::from_millis(2000));

    assert_eq!(backoff.on_failure(), Duration::from_millis(2000));
    assert_eq!(backoff.on_failure(), Duration::from_millis(1000));
    assert_eq!(backoff.on_failure(), Duration::from_millis(500));
  }

  #[test]
  fn a_short_success_streak_does_not_reset_the_delay() {
    let mut backoff = BackoffState::new(Duration::from_millis(2000));
    backoff.on_failure();
    backoff.on_failure();

    for _ in 0..9 {
      backoff.on_success();
    }

    assert_eq!(backoff.on_failure(), Duration::from_millis(500));
  }

  #[test]
  fn ten_successes_restore_the_default_delay() {
    let mut backoff = BackoffState::new(Duration::from_millis(2000));
    backoff.on_failure();
    backoff.on_failure();

    for _ in 0..10 {
      backoff.on_success();
    }

    assert_eq!(backoff.on_failure(), Duration::from_millis(2000));
  }

  #[test]
  fn repeated_failures_converge_to_zero() {
    let mut backoff = BackoffState::new(Duration::from_millis(2000));

    // 2000 ms is 2e9 ns, so 31 halvings bottom out at zero.
    let mut last = Duration::MAX;
    for _ in 0..40 {
      last = backoff.on_failure();
    }

    assert!(last.is_zero(), "delay did not converge: {last:?}");
  }
}
