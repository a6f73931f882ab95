//! Privacy Gate - device authentication with failure throttling
//!
//! Private habits stay masked until the gate is unlocked by a successful
//! authentication challenge.
//!
//! ## States
//!
//! - **Locked**: default; private habits are masked
//! - **Unlocked**: a challenge succeeded in this process
//! - **LockedOut**: `now < lock_until`; takes precedence over the unlocked
//!   flag and refuses attempts without issuing a challenge
//!
//! ## Throttling
//!
//! Each failed challenge increments a persisted counter. When the counter
//! first reaches `max_failed_attempts` the gate stores
//! `lock_until = now + lockout`. Failures past the threshold after the
//! lockout has expired do not start another window; only a successful
//! challenge clears the counter.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::challenge::AuthChallenge;
use crate::storage::kv::{get_json, set_json};
use crate::storage::{keys, KeyValueStore, PrivacyConfig};

/// Derived gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Locked,
    Unlocked,
    LockedOut,
}

/// Failure threshold and lockout length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    pub lockout: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 4,
            lockout: Duration::hours(24),
        }
    }
}

impl From<&PrivacyConfig> for LockoutPolicy {
    fn from(config: &PrivacyConfig) -> Self {
        Self {
            max_failed_attempts: config.max_failed_attempts.max(1),
            lockout: config.lockout_duration(),
        }
    }
}

/// Result of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthOutcome {
    Unlocked,
    /// The challenge failed; more attempts are allowed.
    Denied { failed_attempts: u32, attempts_remaining: u32 },
    /// Refused: a lockout is active (possibly started by this attempt).
    LockedOut { until: DateTime<Utc> },
}

impl AuthOutcome {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, AuthOutcome::Unlocked)
    }
}

/// Snapshot for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyStatus {
    pub state: GateState,
    pub failed_attempts: u32,
    pub attempts_remaining: u32,
    pub lock_until: Option<DateTime<Utc>>,
}

/// Authentication gate for private habits.
pub struct PrivacyGate<S: KeyValueStore + ?Sized, C: AuthChallenge + ?Sized> {
    kv: Arc<S>,
    challenge: Arc<C>,
    policy: LockoutPolicy,
    prompt: String,
    unlocked: bool,
    failed_attempts: u32,
    lock_until: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore + ?Sized, C: AuthChallenge + ?Sized> PrivacyGate<S, C> {
    /// Restore the persisted counter and lockout. Unreadable values fall
    /// back to a clean gate. The unlocked flag always starts false.
    pub async fn load(kv: Arc<S>, challenge: Arc<C>, config: &PrivacyConfig) -> Self {
        let failed_attempts = match get_json::<u32, _>(kv.as_ref(), keys::FAILED_ATTEMPTS).await {
            Ok(v) => v.unwrap_or(0),
            Err(e) => {
                warn!("Failed to load privacy attempt counter: {e}");
                0
            }
        };
        let lock_until = match get_json::<DateTime<Utc>, _>(kv.as_ref(), keys::LOCK_UNTIL).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to load privacy lockout: {e}");
                None
            }
        };

        Self {
            kv,
            challenge,
            policy: LockoutPolicy::from(config),
            prompt: config.prompt.clone(),
            unlocked: false,
            failed_attempts,
            lock_until,
        }
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn lock_until(&self) -> Option<DateTime<Utc>> {
        self.lock_until
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| now < until)
    }

    /// Whether private habits may be shown at `now`.
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        self.unlocked && !self.is_locked_out(now)
    }

    pub fn state(&self, now: DateTime<Utc>) -> GateState {
        if self.is_locked_out(now) {
            GateState::LockedOut
        } else if self.unlocked {
            GateState::Unlocked
        } else {
            GateState::Locked
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> PrivacyStatus {
        PrivacyStatus {
            state: self.state(now),
            failed_attempts: self.failed_attempts,
            attempts_remaining: self
                .policy
                .max_failed_attempts
                .saturating_sub(self.failed_attempts),
            lock_until: self.lock_until,
        }
    }

    pub async fn authenticate(&mut self) -> AuthOutcome {
        self.authenticate_at(Utc::now()).await
    }

    /// Run one authentication attempt at `now`.
    ///
    /// Persistence failures are logged; the in-memory counter still
    /// advances so throttling holds for the rest of the session.
    pub async fn authenticate_at(&mut self, now: DateTime<Utc>) -> AuthOutcome {
        if let Some(until) = self.lock_until.filter(|until| now < *until) {
            info!(%until, "Authentication refused: locked out");
            return AuthOutcome::LockedOut { until };
        }

        let outcome = self.challenge.challenge(&self.prompt).await;
        if outcome.is_success() {
            self.unlocked = true;
            self.failed_attempts = 0;
            self.lock_until = None;
            if let Err(e) = set_json(self.kv.as_ref(), keys::FAILED_ATTEMPTS, &0u32).await {
                warn!("Failed to reset privacy attempt counter: {e}");
            }
            if let Err(e) = self.kv.remove(keys::LOCK_UNTIL).await {
                warn!("Failed to clear privacy lockout: {e}");
            }
            info!("Privacy gate unlocked");
            return AuthOutcome::Unlocked;
        }

        let max = self.policy.max_failed_attempts;
        let previous = self.failed_attempts;
        self.failed_attempts = previous.saturating_add(1);
        if let Err(e) = set_json(self.kv.as_ref(), keys::FAILED_ATTEMPTS, &self.failed_attempts).await {
            warn!("Failed to persist privacy attempt counter: {e}");
        }
        warn!(
            ?outcome,
            failed_attempts = self.failed_attempts,
            "Authentication challenge failed"
        );

        if previous < max && self.failed_attempts >= max {
            let until = now + self.policy.lockout;
            self.lock_until = Some(until);
            if let Err(e) = set_json(self.kv.as_ref(), keys::LOCK_UNTIL, &until).await {
                warn!("Failed to persist privacy lockout: {e}");
            }
            warn!(%until, "Privacy gate locked out");
            return AuthOutcome::LockedOut { until };
        }

        AuthOutcome::Denied {
            failed_attempts: self.failed_attempts,
            attempts_remaining: max.saturating_sub(self.failed_attempts),
        }
    }

    /// Hide private habits again. Counters are untouched.
    pub fn lock(&mut self) {
        self.unlocked = false;
        info!("Privacy gate locked");
    }
}
