//! Single-writer habit service.
//!
//! One tokio task owns the [`HabitStore`] and the [`PrivacyGate`]. Every
//! caller talks to it through a cloneable [`HabitHandle`], so mutations are
//! applied strictly one at a time. The task exits once every handle is
//! dropped.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::entitlement::Entitlement;
use crate::error::{Result, StorageError};
use crate::habit::{
    AddOutcome, Habit, HabitDraft, HabitStore, HabitSummary, HabitView, Mutation, RolloverReport,
    MASKED_ICON, MASKED_NAME,
};
use crate::privacy::{AuthChallenge, AuthOutcome, PrivacyGate, PrivacyStatus};
use crate::storage::{Config, KeyValueStore};

const CHANNEL_CAPACITY: usize = 32;

/// Habits for insight prompts. Private habits carry masked names and
/// icons unless the gate was unlocked when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSnapshot {
    pub habits: Vec<Habit>,
    pub unlocked: bool,
}

enum Command {
    List {
        reply: oneshot::Sender<Vec<HabitView>>,
    },
    Summary {
        reply: oneshot::Sender<HabitSummary>,
    },
    Snapshot {
        reply: oneshot::Sender<HabitSnapshot>,
    },
    Add {
        draft: HabitDraft,
        reply: oneshot::Sender<Result<AddOutcome>>,
    },
    Toggle {
        id: String,
        reply: oneshot::Sender<Result<Option<Mutation>>>,
    },
    Adjust {
        id: String,
        delta: i64,
        reply: oneshot::Sender<Result<Option<Mutation>>>,
    },
    Record {
        id: String,
        success: bool,
        reply: oneshot::Sender<Result<Option<Mutation>>>,
    },
    Remove {
        id: String,
        reply: oneshot::Sender<Result<Option<Habit>>>,
    },
    SetPremium {
        is_premium: bool,
        reply: oneshot::Sender<Result<Entitlement>>,
    },
    Entitlement {
        reply: oneshot::Sender<Entitlement>,
    },
    Authenticate {
        reply: oneshot::Sender<AuthOutcome>,
    },
    Lock {
        reply: oneshot::Sender<()>,
    },
    PrivacyStatus {
        reply: oneshot::Sender<PrivacyStatus>,
    },
    RollOver {
        today: NaiveDate,
        reply: oneshot::Sender<Result<RolloverReport>>,
    },
}

pub struct HabitService;

impl HabitService {
    /// Load state, roll over to the local calendar day, and start the task.
    pub async fn spawn<S, C>(kv: Arc<S>, challenge: Arc<C>, config: &Config) -> HabitHandle
    where
        S: KeyValueStore + ?Sized + 'static,
        C: AuthChallenge + ?Sized + 'static,
    {
        Self::spawn_on(kv, challenge, config, Local::now().date_naive()).await
    }

    /// Same as [`HabitService::spawn`] with an explicit current day.
    pub async fn spawn_on<S, C>(
        kv: Arc<S>,
        challenge: Arc<C>,
        config: &Config,
        today: NaiveDate,
    ) -> HabitHandle
    where
        S: KeyValueStore + ?Sized + 'static,
        C: AuthChallenge + ?Sized + 'static,
    {
        let mut store = HabitStore::load(kv.clone(), config.habits.clone()).await;
        if let Err(e) = store.roll_over(today).await {
            warn!("Day rollover failed: {e}");
        }
        let gate = PrivacyGate::load(kv, challenge, &config.privacy).await;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run(store, gate, rx));
        HabitHandle { tx }
    }
}

async fn run<S, C>(
    mut store: HabitStore<S>,
    mut gate: PrivacyGate<S, C>,
    mut rx: mpsc::Receiver<Command>,
) where
    S: KeyValueStore + ?Sized,
    C: AuthChallenge + ?Sized,
{
    while let Some(command) = rx.recv().await {
        // A dropped reply receiver just means the caller stopped waiting.
        match command {
            Command::List { reply } => {
                let now = Utc::now();
                let unlocked = gate.is_unlocked(now);
                let weekday = Local::now().weekday();
                let views = store
                    .habits()
                    .iter()
                    .map(|h| HabitView::project(h, unlocked, weekday))
                    .collect();
                let _ = reply.send(views);
            }
            Command::Summary { reply } => {
                let _ = reply.send(HabitSummary::from_habits(store.habits()));
            }
            Command::Snapshot { reply } => {
                let unlocked = gate.is_unlocked(Utc::now());
                let habits = store
                    .habits()
                    .iter()
                    .cloned()
                    .map(|mut h| {
                        if h.is_private && !unlocked {
                            h.name = MASKED_NAME.to_string();
                            h.icon = MASKED_ICON.to_string();
                        }
                        h
                    })
                    .collect();
                let _ = reply.send(HabitSnapshot { habits, unlocked });
            }
            Command::Add { draft, reply } => {
                let _ = reply.send(store.add(draft).await);
            }
            Command::Toggle { id, reply } => {
                let _ = reply.send(store.toggle(&id).await);
            }
            Command::Adjust { id, delta, reply } => {
                let _ = reply.send(store.adjust_value(&id, delta).await);
            }
            Command::Record { id, success, reply } => {
                let _ = reply.send(store.record_result(&id, success).await);
            }
            Command::Remove { id, reply } => {
                let _ = reply.send(store.remove(&id).await);
            }
            Command::SetPremium { is_premium, reply } => {
                let _ = reply.send(store.set_premium(is_premium).await);
            }
            Command::Entitlement { reply } => {
                let _ = reply.send(store.entitlement());
            }
            Command::Authenticate { reply } => {
                let _ = reply.send(gate.authenticate().await);
            }
            Command::Lock { reply } => {
                gate.lock();
                let _ = reply.send(());
            }
            Command::PrivacyStatus { reply } => {
                let _ = reply.send(gate.status(Utc::now()));
            }
            Command::RollOver { today, reply } => {
                let _ = reply.send(store.roll_over(today).await);
            }
        }
    }
    debug!("Habit service stopped");
}

/// Cloneable handle to the habit service task.
#[derive(Clone)]
pub struct HabitHandle {
    tx: mpsc::Sender<Command>,
}

impl HabitHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> std::result::Result<T, StorageError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await?;
        Ok(rx.await?)
    }

    /// Habits as views, private ones masked unless unlocked.
    pub async fn list(&self) -> Result<Vec<HabitView>> {
        Ok(self.request(|reply| Command::List { reply }).await?)
    }

    pub async fn summary(&self) -> Result<HabitSummary> {
        Ok(self.request(|reply| Command::Summary { reply }).await?)
    }

    pub async fn snapshot(&self) -> Result<HabitSnapshot> {
        Ok(self.request(|reply| Command::Snapshot { reply }).await?)
    }

    pub async fn add(&self, draft: HabitDraft) -> Result<AddOutcome> {
        self.request(|reply| Command::Add { draft, reply }).await?
    }

    pub async fn toggle(&self, id: &str) -> Result<Option<Mutation>> {
        let id = id.to_string();
        self.request(|reply| Command::Toggle { id, reply }).await?
    }

    pub async fn adjust_value(&self, id: &str, delta: i64) -> Result<Option<Mutation>> {
        let id = id.to_string();
        self.request(|reply| Command::Adjust { id, delta, reply })
            .await?
    }

    pub async fn record_result(&self, id: &str, success: bool) -> Result<Option<Mutation>> {
        let id = id.to_string();
        self.request(|reply| Command::Record { id, success, reply })
            .await?
    }

    pub async fn remove(&self, id: &str) -> Result<Option<Habit>> {
        let id = id.to_string();
        self.request(|reply| Command::Remove { id, reply }).await?
    }

    pub async fn set_premium(&self, is_premium: bool) -> Result<Entitlement> {
        self.request(|reply| Command::SetPremium { is_premium, reply })
            .await?
    }

    pub async fn entitlement(&self) -> Result<Entitlement> {
        Ok(self.request(|reply| Command::Entitlement { reply }).await?)
    }

    pub async fn authenticate(&self) -> Result<AuthOutcome> {
        Ok(self.request(|reply| Command::Authenticate { reply }).await?)
    }

    pub async fn lock(&self) -> Result<()> {
        Ok(self.request(|reply| Command::Lock { reply }).await?)
    }

    pub async fn privacy_status(&self) -> Result<PrivacyStatus> {
        Ok(self.request(|reply| Command::PrivacyStatus { reply }).await?)
    }

    pub async fn roll_over(&self, today: NaiveDate) -> Result<RolloverReport> {
        self.request(|reply| Command::RollOver { today, reply })
            .await?
    }
}
