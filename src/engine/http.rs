// ── dashchat Engine: HTTP Retry & Circuit-Breaker ──────────────────────────
//
// Retry utilities for the text-generation client.
//
//   • Exponential backoff with ±25% jitter (base 1s, cap 30s, 3 retries)
//   • Retry on 429 (rate limit), 500, 502, 503, 504, 529
//   • Integer `Retry-After` honored, capped at 60s
//   • Circuit breaker: N consecutive failures → fail fast for a cooldown

use crate::atoms::traits::ProviderError;
use log::warn;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

// ── Constants ──────────────────────────────────────────────────────────────

pub const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
/// Server-requested waits beyond this are clamped.
const MAX_RETRY_AFTER_SECS: u64 = 60;

pub const DEFAULT_BREAKER_THRESHOLD: u32 = 5;
pub const DEFAULT_BREAKER_COOLDOWN_SECS: u64 = 60;

// ── Retryable status detection ─────────────────────────────────────────────

/// Transient statuses worth another attempt.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504 | 529)
}

/// Parse a `Retry-After` header value (integer seconds only).
/// HTTP-date values fall back to computed backoff.
pub fn parse_retry_after(header_value: &str) -> Option<u64> {
    header_value.trim().parse::<u64>().ok()
}

// ── Retry policy ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one. 0 disables retries.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        RetryPolicy { max_retries, ..Default::default() }
    }

    /// Delay before retry number `attempt + 1` (`attempt` is 0-based).
    /// A server-provided Retry-After wins when it is longer than the backoff.
    pub fn backoff(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let initial_ms = self.initial_delay.as_millis() as u64;
        let cap_ms = self.max_delay.as_millis() as u64;
        let base_ms = initial_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(cap_ms);
        let delay_ms = match retry_after_secs {
            Some(secs) => (secs.min(MAX_RETRY_AFTER_SECS) * 1000).max(base_ms),
            None => base_ms,
        };
        Duration::from_millis(apply_jitter(delay_ms))
    }

    /// Sleep for [`Self::backoff`] and return the slept duration for logging.
    pub async fn wait(&self, attempt: u32, retry_after_secs: Option<u64>) -> Duration {
        let delay = self.backoff(attempt, retry_after_secs);
        tokio::time::sleep(delay).await;
        delay
    }
}

/// ±25% jitter so parallel clients do not retry in lockstep.
fn apply_jitter(base_ms: u64) -> u64 {
    let range = (base_ms / 4) as i64;
    if range == 0 {
        return base_ms;
    }
    let offset = (clock_noise() % (2 * range + 1)) - range;
    (base_ms as i64 + offset).max(1) as u64
}

/// Jitter source from the clock's sub-second nanos.
fn clock_noise() -> i64 {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    i64::from(nanos)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ── Circuit Breaker ────────────────────────────────────────────────────────

/// Trips after `threshold` consecutive failures, then rejects requests until
/// `cooldown_secs` have passed.
///
/// States:
///   Closed  : requests pass through
///   Open    : rejecting requests (cooldown active)
///   HalfOpen: cooldown expired, probes allowed; one success closes it
pub struct CircuitBreaker {
    consecutive_failures: AtomicU32,
    /// Epoch seconds when the circuit last tripped open.
    tripped_at: AtomicU64,
    threshold: u32,
    cooldown_secs: u64,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        CircuitBreaker::new(DEFAULT_BREAKER_THRESHOLD, DEFAULT_BREAKER_COOLDOWN_SECS)
    }
}

impl CircuitBreaker {
    pub const fn new(threshold: u32, cooldown_secs: u64) -> Self {
        Self {
            consecutive_failures: AtomicU32::new(0),
            tripped_at: AtomicU64::new(0),
            threshold,
            cooldown_secs,
        }
    }

    /// `Ok(())` when a request may go out, `CircuitOpen` while cooling down.
    pub fn check(&self) -> Result<(), ProviderError> {
        let failures = self.consecutive_failures.load(Ordering::Relaxed);
        if failures < self.threshold {
            return Ok(());
        }
        let elapsed = now_secs().saturating_sub(self.tripped_at.load(Ordering::Relaxed));
        if elapsed < self.cooldown_secs {
            return Err(ProviderError::CircuitOpen(format!(
                "circuit breaker open after {} consecutive failures, retry in {}s",
                failures,
                self.cooldown_secs - elapsed
            )));
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.check().is_err()
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
        self.tripped_at.store(0, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= self.threshold {
            self.tripped_at.store(now_secs(), Ordering::Relaxed);
            warn!(
                "[circuit-breaker] Tripped after {} consecutive failures, cooling down {}s",
                failures, self.cooldown_secs
            );
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
