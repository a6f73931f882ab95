//! CLI subcommands.
//!
//! Each invocation opens the SQLite store, spawns the habit service and
//! talks to it through a handle. The privacy gate's unlocked flag lives
//! only as long as the process, so commands that show private habits take
//! an `--unlock` flag.

pub mod config;
pub mod habit;
pub mod insights;
pub mod premium;
pub mod privacy;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use habitloop_core::credentials::{self, PIN_HASH_ENTRY};
use habitloop_core::privacy::{AuthChallenge, ChallengeOutcome, PinVerifier};
use habitloop_core::{AuthOutcome, Config, HabitHandle, HabitService, SqliteStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Reads a PIN from stdin and checks it against the hash in the OS keyring.
pub struct PinPrompt;

fn stored_pin_hash() -> Option<String> {
    credentials::get(PIN_HASH_ENTRY).unwrap_or_else(|e| {
        tracing::warn!("PIN hash unavailable: {e}");
        None
    })
}

#[async_trait]
impl AuthChallenge for PinPrompt {
    async fn challenge(&self, prompt: &str) -> ChallengeOutcome {
        let verifier = PinVerifier::new(stored_pin_hash());
        if !verifier.is_configured() {
            return ChallengeOutcome::Unavailable;
        }

        let prompt = prompt.to_string();
        let line = tokio::task::spawn_blocking(move || {
            eprint!("{prompt}. PIN: ");
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        match line {
            Ok(Ok(pin)) if !pin.trim().is_empty() => verifier.verify(&pin),
            _ => ChallengeOutcome::Cancelled,
        }
    }
}

/// Open the store and spawn the habit service.
pub async fn open_service(config: &Config) -> Result<HabitHandle, Box<dyn std::error::Error>> {
    let store = Arc::new(SqliteStore::open()?);
    Ok(HabitService::spawn(store, Arc::new(PinPrompt), config).await)
}

/// Run the privacy challenge, refusing early when no PIN is set up.
pub async fn unlock(handle: &HabitHandle) -> Result<bool, Box<dyn std::error::Error>> {
    if stored_pin_hash().is_none() {
        return Err("no PIN configured; run `habitloop-cli privacy set-pin` first".into());
    }
    let outcome = handle.authenticate().await?;
    report_auth(&outcome);
    Ok(outcome.is_unlocked())
}

pub fn report_auth(outcome: &AuthOutcome) {
    match outcome {
        AuthOutcome::Unlocked => eprintln!("Private habits unlocked"),
        AuthOutcome::Denied {
            attempts_remaining, ..
        } => eprintln!("PIN rejected ({attempts_remaining} attempts remaining)"),
        AuthOutcome::LockedOut { until } => eprintln!(
            "Too many failed attempts. Locked until {}",
            until.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
    }
}

/// Find the habit whose id starts with `prefix`.
pub async fn resolve_id(
    handle: &HabitHandle,
    prefix: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let matches: Vec<String> = handle
        .list()
        .await?
        .into_iter()
        .map(|v| v.id)
        .filter(|id| id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => Err(format!("no habit matches id '{prefix}'").into()),
        _ => Err(format!("id '{prefix}' is ambiguous").into()),
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
