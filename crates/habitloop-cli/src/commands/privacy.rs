use chrono::Local;
use clap::Subcommand;
use habitloop_core::credentials::{self, PIN_HASH_ENTRY};
use habitloop_core::privacy::hash_pin;
use habitloop_core::{Config, GateState, ValidationError};

use super::{open_service, short_id, unlock, CmdResult};

const MIN_PIN_LEN: usize = 4;

#[derive(Subcommand)]
pub enum PrivacyAction {
    /// Show lock state and failed attempts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enter the PIN and list private habits
    Unlock,
    /// Set the PIN (read from stdin when omitted)
    SetPin {
        pin: Option<String>,
    },
    /// Remove the stored PIN
    ClearPin,
}

pub async fn run(action: PrivacyAction) -> CmdResult {
    match action {
        PrivacyAction::Status { json } => {
            let config = Config::load_or_default();
            let handle = open_service(&config).await?;
            let status = handle.privacy_status().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }
            let state = match status.state {
                GateState::Locked => "locked",
                GateState::Unlocked => "unlocked",
                GateState::LockedOut => "locked out",
            };
            println!("State: {state}");
            println!(
                "Failed attempts: {} ({} remaining)",
                status.failed_attempts, status.attempts_remaining
            );
            if let Some(until) = status.lock_until {
                println!(
                    "Lockout until: {}",
                    until.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                );
            }
        }
        PrivacyAction::Unlock => {
            let config = Config::load_or_default();
            let handle = open_service(&config).await?;
            if unlock(&handle).await? {
                for view in handle.list().await?.iter().filter(|v| v.is_private) {
                    println!("{}  {}", short_id(&view.id), view.name);
                }
            } else {
                std::process::exit(1);
            }
        }
        PrivacyAction::SetPin { pin } => {
            let pin = match pin {
                Some(pin) => pin,
                None => {
                    eprint!("New PIN: ");
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)?;
                    line
                }
            };
            let pin = pin.trim();
            if pin.chars().count() < MIN_PIN_LEN {
                return Err(ValidationError::InvalidValue {
                    field: "pin".into(),
                    message: format!("must be at least {MIN_PIN_LEN} characters"),
                }
                .into());
            }
            credentials::set(PIN_HASH_ENTRY, &hash_pin(pin))?;
            println!("PIN saved");
        }
        PrivacyAction::ClearPin => {
            credentials::delete(PIN_HASH_ENTRY)?;
            println!("PIN removed");
        }
    }
    Ok(())
}
