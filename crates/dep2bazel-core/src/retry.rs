//! Retry and backoff for HTTP transfers.
//!
//! Failures are first mapped to an [`ErrorKind`]; the policy then decides
//! whether another attempt is worth it and how long to wait before it.

use std::time::Duration;

/// Coarse classification of a failed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connect or transfer timed out (includes low-speed aborts).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// DNS, connection reset, short read.
    Connection,
    /// Other 5xx.
    Http5xx(u16),
    /// Not worth retrying (4xx, bad URL, local I/O).
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Capped exponential backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `attempt` is 1-based.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match kind {
            ErrorKind::Permanent => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Throttled
            | ErrorKind::Connection
            | ErrorKind::Http5xx(_) => {
                let factor = 1u32 << attempt.saturating_sub(1).min(8);
                let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out.
    /// `classify` maps each error to its [`ErrorKind`].
    pub fn run<T, E, F, C>(&self, mut op: F, classify: C) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        C: Fn(&E) -> ErrorKind,
        E: std::fmt::Display,
    {
        let mut attempt = 1u32;
        loop {
            match op(attempt) {
                Ok(v) => return Ok(v),
                Err(e) => match self.decide(attempt, classify(&e)) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, delay_ms = d.as_millis() as u64, "retrying after: {}", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                },
            }
        }
    }
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Permanent,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Permanent
}
