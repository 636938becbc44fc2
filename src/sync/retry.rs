//! Fixed-pause retry loop.

use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Pause after a failed attempt when another one follows
    pub pause: Duration,
}

/// All attempts failed
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `op` until it succeeds or `policy.attempts` is used up.
///
/// `op` receives the 1-based attempt number. `sleep` is called with
/// `policy.pause` between attempts, never after the last one.
pub fn retry<T, E, S, F>(
    policy: RetryPolicy,
    mut sleep: S,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    E: Display,
    S: FnMut(Duration),
    F: FnMut(u32) -> Result<T, E>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(last_error) if attempt >= attempts => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error,
                });
            }
            Err(e) => {
                debug!("Attempt {}/{} failed: {}", attempt, attempts, e);
                sleep(policy.pause);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: RetryPolicy = RetryPolicy {
        attempts: 3,
        pause: Duration::from_secs(1),
    };

    #[test]
    fn test_first_success_needs_no_pause() {
        let mut pauses = Vec::new();
        let result: Result<u32, _> = retry(POLICY, |d| pauses.push(d), |_| Ok::<_, String>(7));
        assert_eq!(result.unwrap(), 7);
        assert!(pauses.is_empty());
    }

    #[test]
    fn test_success_on_third_attempt_after_two_pauses() {
        let mut pauses = Vec::new();
        let result = retry(
            POLICY,
            |d| pauses.push(d),
            |attempt| {
                if attempt < 3 {
                    Err(format!("HTTP 500 on attempt {attempt}"))
                } else {
                    Ok(format!("body of attempt {attempt}"))
                }
            },
        );
        assert_eq!(result.unwrap(), "body of attempt 3");
        assert_eq!(pauses, vec![Duration::from_secs(1); 2]);
    }

    #[test]
    fn test_exhausted_reports_last_error() {
        let mut calls = 0;
        let mut pauses = 0;
        let result: Result<(), _> = retry(
            POLICY,
            |_| pauses += 1,
            |attempt| {
                calls += 1;
                Err(format!("failure {attempt}"))
            },
        );

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "failure 3");
        assert_eq!(calls, 3);
        assert_eq!(pauses, 2);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy {
            attempts: 0,
            pause: Duration::ZERO,
        };
        let mut calls = 0;
        let result: Result<(), _> = retry(policy, |_| {}, |_| {
            calls += 1;
            Err("nope")
        });
        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls, 1);
    }
}
