use std::time::Duration;

use tracing::warn;

/// Longest single wait between attempts, whatever the policy asks for.
pub const MAX_DELAY: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub backoff: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(5),
            backoff: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay slept after failed attempt `n` (1-based), capped at
    /// [`MAX_DELAY`].
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff.max(0.0).powi(exponent);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
    }
}

/// Run `op` until it succeeds, fails with an error `is_retryable` rejects,
/// or the attempts run out. `op` gets the 1-based attempt number. The last
/// error is returned when every attempt failed.
pub fn retry_with_backoff<T, E, Op, Retryable, Sleep>(
    policy: &RetryPolicy,
    mut op: Op,
    is_retryable: Retryable,
    mut sleep: Sleep,
) -> Result<T, E>
where
    E: std::fmt::Display,
    Op: FnMut(u32) -> Result<T, E>,
    Retryable: Fn(&E) -> bool,
    Sleep: FnMut(Duration),
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && is_retryable(&e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:.1}s...",
                    attempt,
                    attempts,
                    e,
                    delay.as_secs_f64()
                );
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_secs(5),
            backoff: 2.0,
        }
    }

    #[test]
    fn delays_grow_geometrically() {
        let p = policy(4);
        assert_eq!(p.delay_after(1), Duration::from_secs(5));
        assert_eq!(p.delay_after(2), Duration::from_secs(10));
        assert_eq!(p.delay_after(3), Duration::from_secs(20));
    }

    #[test]
    fn runaway_backoff_is_capped() {
        let huge = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff: 1e30,
        };
        assert_eq!(huge.delay_after(1), Duration::from_secs(1));
        assert_eq!(huge.delay_after(2), MAX_DELAY);
        assert_eq!(huge.delay_after(u32::MAX), MAX_DELAY);

        let infinite = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            backoff: f64::INFINITY,
        };
        assert_eq!(infinite.delay_after(3), MAX_DELAY);
    }

    #[test]
    fn zero_delay_stays_zero_with_infinite_backoff() {
        let p = RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::ZERO,
            backoff: f64::INFINITY,
        };
        let mut slept = Vec::new();
        let result: Result<(), String> =
            retry_with_backoff(&p, |_| Err("down".into()), |_| true, |d| slept.push(d));

        assert!(result.is_err());
        assert_eq!(slept, vec![Duration::ZERO, Duration::ZERO]);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let mut slept = Vec::new();
        let result: Result<(), String> = retry_with_backoff(
            &policy(3),
            |n| {
                calls += 1;
                Err(format!("boom {n}"))
            },
            |_| true,
            |d| slept.push(d),
        );

        assert_eq!(result, Err("boom 3".to_string()));
        assert_eq!(calls, 3);
        assert_eq!(slept, vec![Duration::from_secs(5), Duration::from_secs(10)]);
    }

    #[test]
    fn stops_on_first_success() {
        let mut slept = Vec::new();
        let result: Result<u32, String> = retry_with_backoff(
            &policy(5),
            |n| if n == 2 { Ok(n) } else { Err("down".into()) },
            |_| true,
            |d| slept.push(d),
        );

        assert_eq!(result, Ok(2));
        assert_eq!(slept.len(), 1);
    }

    #[test]
    fn non_retryable_error_stops_immediately() {
        let mut calls = 0;
        let result: Result<(), String> = retry_with_backoff(
            &policy(5),
            |_| {
                calls += 1;
                Err("bad input".into())
            },
            |e| e != "bad input",
            |_| panic!("should not sleep"),
        );

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let mut calls = 0;
        let _: Result<(), String> = retry_with_backoff(
            &policy(0),
            |_| {
                calls += 1;
                Err("x".into())
            },
            |_| true,
            |_| {},
        );
        assert_eq!(calls, 1);
    }
}
