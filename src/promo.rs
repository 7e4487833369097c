//! Promotional side effect
//!
//! Each user-initiated export, copy or share opens the configured promotional
//! destination in a new browsing context. The attempt is best effort: a
//! blocked popup or a launcher error is logged and dropped, and the primary
//! action neither waits for nor learns about the result.

use crate::launcher::{LaunchOutcome, UrlLauncher};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Retry Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Bounded retries for the promotional open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first, at least 1
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each later attempt
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub const MAX_ATTEMPTS: u32 = 5;
    pub const MAX_BACKOFF_MS: u64 = 60_000;

    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }

    /// Clamp values loaded from configuration.
    pub fn sanitized(self) -> Self {
        Self {
            max_attempts: self.max_attempts.clamp(1, Self::MAX_ATTEMPTS),
            backoff_ms: self.backoff_ms.min(Self::MAX_BACKOFF_MS),
        }
    }

    /// Delay before `attempt` (1-based). The first attempt is immediate.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1u64 << (attempt - 2).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }

    /// Whether any attempt has to wait.
    pub fn waits(&self) -> bool {
        self.max_attempts > 1 && self.backoff_ms > 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger
// ─────────────────────────────────────────────────────────────────────────────

/// How the last promotional attempt ended. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoOutcome {
    Opened,
    Blocked,
    Failed,
}

/// Fires the promotional open alongside user actions.
#[derive(Clone)]
pub struct PromoTrigger {
    launcher: Arc<dyn UrlLauncher>,
    url: String,
    enabled: bool,
    policy: RetryPolicy,
}

impl PromoTrigger {
    pub fn new(launcher: Arc<dyn UrlLauncher>, url: impl Into<String>, policy: RetryPolicy) -> Self {
        let url = url.into();
        Self {
            enabled: !url.trim().is_empty(),
            launcher,
            url,
            policy: policy.sanitized(),
        }
    }

    /// A trigger that never opens anything.
    pub fn disabled(launcher: Arc<dyn UrlLauncher>) -> Self {
        Self {
            launcher,
            url: String::new(),
            enabled: false,
            policy: RetryPolicy::none(),
        }
    }

    /// Fire and forget.
    ///
    /// Without waits the attempts run inline; a policy with backoff runs on a
    /// detached thread so the caller is never delayed.
    pub fn fire(&self) {
        if !self.enabled {
            return;
        }

        if !self.policy.waits() {
            let outcome = run_attempts(self.launcher.as_ref(), &self.url, self.policy);
            debug!("Promo trigger finished: {:?}", outcome);
            return;
        }

        let launcher = Arc::clone(&self.launcher);
        let url = self.url.clone();
        let policy = self.policy;
        let spawned = thread::Builder::new()
            .name("promo-trigger".to_string())
            .spawn(move || {
                let outcome = run_attempts(launcher.as_ref(), &url, policy);
                debug!("Promo trigger finished: {:?}", outcome);
            });
        if let Err(e) = spawned {
            warn!("Could not start promo trigger: {}", e);
        }
    }

    /// Run the attempts on the current thread and report how they ended.
    #[cfg(test)]
    fn fire_and_wait(&self) -> Option<PromoOutcome> {
        self.enabled
            .then(|| run_attempts(self.launcher.as_ref(), &self.url, self.policy))
    }
}

impl std::fmt::Debug for PromoTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromoTrigger")
            .field("url", &self.url)
            .field("enabled", &self.enabled)
            .field("policy", &self.policy)
            .finish()
    }
}

fn run_attempts(launcher: &dyn UrlLauncher, url: &str, policy: RetryPolicy) -> PromoOutcome {
    let mut outcome = PromoOutcome::Failed;

    for attempt in 1..=policy.max_attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        outcome = match launcher.open_url(url) {
            Ok(LaunchOutcome::Opened) => {
                debug!("Promo opened on attempt {}", attempt);
                return PromoOutcome::Opened;
            }
            Ok(LaunchOutcome::Blocked) => {
                info!("Promo popup blocked (attempt {})", attempt);
                PromoOutcome::Blocked
            }
            Err(e) => {
                info!("Promo trigger failed (attempt {}): {}", attempt, e);
                PromoOutcome::Failed
            }
        };
    }

    outcome
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
