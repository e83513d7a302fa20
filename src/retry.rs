use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::sleep;

use crate::{
    trace::AttemptTrace, transport::Transport, AdsApiError, Request, Response, Result, RetryPolicy,
};

/// Extra seconds slept past the advertised rate-limit reset.
const RATE_LIMIT_GRACE_SECS: i64 = 5;

const TOO_MANY_REQUESTS: u16 = 429;

/// What the loop does after an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// 2xx; return the response.
    Success,
    /// 429 with rate-limit handling on; wait `retry_after` seconds plus grace
    /// without spending retry budget.
    RateLimited { retry_after: i64 },
    /// Retryable status; sleep `delay` and spend one retry.
    Retry { delay: Duration },
    /// Status outside the retryable set; return the response as is.
    Stop,
    /// No retries configured; spend the only attempt.
    Exhausted,
}

impl RetryPolicy {
    /// Classifies one attempt.
    ///
    /// `rate_limit_waited` is true once this call has already slept for a
    /// rate-limit reset. `now` is the current epoch in seconds.
    pub(crate) fn decide(&self, response: &Response, rate_limit_waited: bool, now: i64) -> Decision {
        if response.is_success() {
            return Decision::Success;
        }

        if self.handle_rate_limit && !rate_limit_waited && response.status == TOO_MANY_REQUESTS {
            let reset = response.rate_limit_reset().unwrap_or(now);
            return Decision::RateLimited {
                retry_after: reset.saturating_sub(now),
            };
        }

        if self.max_retries > 0 {
            if !self.retry_on_status.contains(&response.status) {
                return Decision::Stop;
            }
            return Decision::Retry {
                delay: Duration::from_secs(self.retry_delay_ms / 1000),
            };
        }

        Decision::Exhausted
    }
}

/// Sleep before retrying after a 429; negative waits collapse to zero.
pub(crate) fn rate_limit_wait(retry_after: i64) -> Duration {
    let secs = retry_after.saturating_add(RATE_LIMIT_GRACE_SECS).max(0);
    Duration::from_secs(secs as u64)
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}

/// Runs a signed request until the policy settles on a final response.
///
/// Transport failures end the call immediately. Every other outcome,
/// including a non-success status, is returned as `Ok` for the caller to
/// translate.
pub(crate) async fn execute_with_policy<T: Transport>(
    transport: &T,
    request: &Request,
    policy: &RetryPolicy,
    trace: &AttemptTrace<'_>,
) -> Result<Response> {
    let mut retry_count = 0usize;
    let mut rate_limit_waited = false;

    loop {
        trace.request(request);
        let response = transport
            .execute(request)
            .await
            .map_err(AdsApiError::Transport)?;
        trace.response(&response);

        match policy.decide(&response, rate_limit_waited, now_epoch()) {
            Decision::Success | Decision::Stop => return Ok(response),
            Decision::RateLimited { retry_after: secs } => {
                rate_limit_waited = true;
                trace.warn(&format!(
                    "request reached rate limit: resume in {secs} seconds"
                ));
                sleep(rate_limit_wait(secs)).await;
                continue;
            }
            Decision::Retry { delay } => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    status = response.status,
                    retry = retry_count + 1,
                    "retrying request after {} s",
                    delay.as_secs()
                );
                sleep(delay).await;
                retry_count += 1;
            }
            Decision::Exhausted => retry_count += 1,
        }

        if retry_count > policy.max_retries {
            return Ok(response);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{rate_limit_wait, Decision};
    use crate::{Response, RetryPolicy};

    const NOW: i64 = 1_700_000_000;

    fn status(status: u16) -> Response {
        Response::new(status, vec![], "")
    }

    fn too_many(headers: &[(&str, &str)]) -> Response {
        Response::new(
            429,
            headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            "",
        )
    }

    #[test]
    fn success_wins_over_every_counter() {
        let policy = RetryPolicy::default()
            .with_max_retries(3)
            .with_rate_limit_handling(true);
        for code in [200, 201, 204, 299] {
            assert_eq!(policy.decide(&status(code), false, NOW), Decision::Success);
            assert_eq!(policy.decide(&status(code), true, NOW), Decision::Success);
        }
    }

    #[test]
    fn no_retries_exhausts_on_any_failure() {
        let policy = RetryPolicy::default();
        for code in [400, 429, 500, 503] {
            assert_eq!(policy.decide(&status(code), false, NOW), Decision::Exhausted);
        }
    }

    #[test]
    fn retryable_status_sleeps_whole_seconds() {
        let policy = RetryPolicy::default()
            .with_max_retries(2)
            .with_retry_delay_ms(2_999);
        assert_eq!(
            policy.decide(&status(503), false, NOW),
            Decision::Retry {
                delay: Duration::from_secs(2)
            }
        );

        let sub_second = RetryPolicy::default()
            .with_max_retries(1)
            .with_retry_delay_ms(999);
        assert_eq!(
            sub_second.decide(&status(500), false, NOW),
            Decision::Retry {
                delay: Duration::ZERO
            }
        );
    }

    #[test]
    fn non_retryable_status_stops() {
        let policy = RetryPolicy::default().with_max_retries(2);
        assert_eq!(policy.decide(&status(404), false, NOW), Decision::Stop);
        assert_eq!(policy.decide(&status(429), false, NOW), Decision::Stop);
    }

    #[test]
    fn account_reset_header_is_preferred() {
        let policy = RetryPolicy::default().with_rate_limit_handling(true);
        let response = too_many(&[
            ("x-rate-limit-reset", "1700000100"),
            ("x-account-rate-limit-reset", "1700000030"),
        ]);
        assert_eq!(
            policy.decide(&response, false, NOW),
            Decision::RateLimited { retry_after: 30 }
        );

        let fallback = too_many(&[("x-rate-limit-reset", "1700000100")]);
        assert_eq!(
            policy.decide(&fallback, false, NOW),
            Decision::RateLimited { retry_after: 100 }
        );
    }

    #[test]
    fn second_rate_limit_takes_normal_path() {
        let response = too_many(&[("x-rate-limit-reset", "1700000100")]);

        let no_retries = RetryPolicy::default().with_rate_limit_handling(true);
        assert_eq!(no_retries.decide(&response, true, NOW), Decision::Exhausted);

        let retries = RetryPolicy::default()
            .with_rate_limit_handling(true)
            .with_max_retries(1);
        assert_eq!(retries.decide(&response, true, NOW), Decision::Stop);
    }

    #[test]
    fn rate_limit_ignored_when_disabled() {
        let policy = RetryPolicy::default()
            .with_max_retries(1)
            .with_retry_on_status([429]);
        let response = too_many(&[("x-rate-limit-reset", "1700000100")]);
        assert_eq!(
            policy.decide(&response, false, NOW),
            Decision::Retry {
                delay: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn missing_reset_header_waits_only_grace() {
        let policy = RetryPolicy::default().with_rate_limit_handling(true);
        let decision = policy.decide(&too_many(&[]), false, NOW);
        assert_eq!(decision, Decision::RateLimited { retry_after: 0 });
        assert_eq!(rate_limit_wait(0), Duration::from_secs(5));
    }

    #[test]
    fn extreme_reset_headers_saturate() {
        let policy = RetryPolicy::default().with_rate_limit_handling(true);

        let past = too_many(&[("x-rate-limit-reset", i64::MIN.to_string().as_str())]);
        assert_eq!(
            policy.decide(&past, false, NOW),
            Decision::RateLimited {
                retry_after: i64::MIN
            }
        );

        let future = too_many(&[("x-rate-limit-reset", i64::MAX.to_string().as_str())]);
        assert_eq!(
            policy.decide(&future, false, -NOW),
            Decision::RateLimited {
                retry_after: i64::MAX
            }
        );
        assert_eq!(rate_limit_wait(i64::MAX), Duration::from_secs(i64::MAX as u64));
    }

    #[test]
    fn negative_wait_clamps_to_zero() {
        assert_eq!(rate_limit_wait(-3), Duration::from_secs(2));
        assert_eq!(rate_limit_wait(-60), Duration::ZERO);
        assert_eq!(rate_limit_wait(i64::MIN), Duration::ZERO);
    }
}
