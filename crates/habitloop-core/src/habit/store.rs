//! Authoritative habit collection.
//!
//! The whole collection is the unit of persistence. Every mutation stages
//! a new collection, writes it under [`keys::HABITS`], and only then swaps
//! it in; a failed write leaves memory on the last durable state.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::{Habit, HabitDraft};
use super::seed::default_habits;
use super::streak::StreakChange;
use crate::entitlement::Entitlement;
use crate::error::Result;
use crate::storage::kv::{get_json, set_json};
use crate::storage::{keys, HabitsConfig, KeyValueStore};

/// Result of an add request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AddOutcome {
    Added { habit: Habit },
    /// Free tier is full; the caller should offer an upgrade.
    LimitReached { limit: usize },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Habit after a mutation plus what happened to its streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub habit: Habit,
    pub change: StreakChange,
}

/// What a day rollover did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverReport {
    pub previous_day: Option<NaiveDate>,
    pub today: NaiveDate,
    pub rolled: bool,
    pub streaks_reset: usize,
}

/// In-memory habit list kept durable through a [`KeyValueStore`].
pub struct HabitStore<S: KeyValueStore + ?Sized> {
    kv: Arc<S>,
    habits: Vec<Habit>,
    entitlement: Entitlement,
    config: HabitsConfig,
}

impl<S: KeyValueStore + ?Sized> HabitStore<S> {
    /// Load the persisted collection and entitlement.
    ///
    /// Never fails. An absent collection is seeded (when enabled) and the
    /// seed persisted; a read or decode error is logged and the store
    /// starts empty.
    pub async fn load(kv: Arc<S>, config: HabitsConfig) -> Self {
        let habits = match get_json::<Vec<Habit>, _>(kv.as_ref(), keys::HABITS).await {
            Ok(Some(habits)) => {
                debug!("Loaded {} habits", habits.len());
                habits
            }
            Ok(None) if config.seed_defaults => {
                let seed = default_habits(Utc::now());
                if let Err(e) = set_json(kv.as_ref(), keys::HABITS, &seed).await {
                    warn!("Failed to persist default habits: {e}");
                }
                info!("Seeded {} default habits", seed.len());
                seed
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to load habits, starting empty: {e}");
                Vec::new()
            }
        };

        let is_premium = match get_json::<bool, _>(kv.as_ref(), keys::IS_PREMIUM).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!("Failed to load entitlement, assuming free tier: {e}");
                false
            }
        };

        Self {
            kv,
            habits,
            entitlement: Entitlement::new(is_premium),
            config,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn entitlement(&self) -> Entitlement {
        self.entitlement
    }

    pub fn free_tier_limit(&self) -> usize {
        self.config.free_tier_limit
    }

    async fn commit(&mut self, staged: Vec<Habit>) -> Result<()> {
        if let Err(e) = set_json(self.kv.as_ref(), keys::HABITS, &staged).await {
            warn!("Failed to persist habits, keeping previous state: {e}");
            return Err(e.into());
        }
        self.habits = staged;
        Ok(())
    }

    /// Apply `f` to the habit with `id` in a staged copy and commit it.
    ///
    /// Unknown ids are tolerated: the unchanged collection is still written.
    async fn mutate_one(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Habit) -> StreakChange,
    ) -> Result<Option<Mutation>> {
        let mut staged = self.habits.clone();
        let mutation = staged.iter_mut().find(|h| h.id == id).map(|habit| {
            let change = f(habit);
            Mutation {
                habit: habit.clone(),
                change,
            }
        });
        if mutation.is_none() {
            debug!("No habit with id {id}; persisting unchanged collection");
        }
        self.commit(staged).await?;
        Ok(mutation)
    }

    /// Add a habit built from `draft`.
    ///
    /// # Errors
    /// Returns a validation error for a malformed draft and a storage error
    /// if the write fails. A full free tier is an `Ok(LimitReached)`.
    pub async fn add(&mut self, draft: HabitDraft) -> Result<AddOutcome> {
        self.add_at(draft, Utc::now()).await
    }

    pub async fn add_at(&mut self, draft: HabitDraft, now: DateTime<Utc>) -> Result<AddOutcome> {
        let limit = self.config.free_tier_limit;
        if !self.entitlement.can_add(self.habits.len(), limit) {
            info!(limit, "Free tier habit limit reached");
            return Ok(AddOutcome::LimitReached { limit });
        }

        let habit = Habit::from_draft(draft, now)?;
        let mut staged = self.habits.clone();
        staged.push(habit.clone());
        self.commit(staged).await?;
        info!(id = %habit.id, kind = ?habit.kind, "Habit added");
        Ok(AddOutcome::Added { habit })
    }

    /// Flip today's completion of a non-quantity habit.
    pub async fn toggle(&mut self, id: &str) -> Result<Option<Mutation>> {
        let result = self.mutate_one(id, Habit::apply_toggle).await?;
        if let Some(m) = &result {
            info!(id, streak = m.habit.streak, done = m.habit.completed_today, "Habit toggled");
        }
        Ok(result)
    }

    /// Move a quantity habit's value by `delta`.
    pub async fn adjust_value(&mut self, id: &str, delta: i64) -> Result<Option<Mutation>> {
        let result = self.mutate_one(id, |h| h.apply_adjust(delta)).await?;
        if let Some(m) = &result {
            info!(id, delta, streak = m.habit.streak, "Habit value adjusted");
        }
        Ok(result)
    }

    /// Record an explicit success or failure for today.
    pub async fn record_result(&mut self, id: &str, success: bool) -> Result<Option<Mutation>> {
        let result = self.mutate_one(id, |h| h.apply_result(success)).await?;
        if let Some(m) = &result {
            info!(id, success, streak = m.habit.streak, "Habit result recorded");
        }
        Ok(result)
    }

    /// Delete a habit. Returns the removed record, if any.
    pub async fn remove(&mut self, id: &str) -> Result<Option<Habit>> {
        let mut staged = self.habits.clone();
        let removed = staged
            .iter()
            .position(|h| h.id == id)
            .map(|idx| staged.remove(idx));
        self.commit(staged).await?;
        if removed.is_some() {
            info!(id, "Habit removed");
        }
        Ok(removed)
    }

    /// Persist and apply the premium flag. Existing habits are never pruned.
    pub async fn set_premium(&mut self, is_premium: bool) -> Result<Entitlement> {
        set_json(self.kv.as_ref(), keys::IS_PREMIUM, &is_premium).await?;
        self.entitlement = Entitlement::new(is_premium);
        info!(is_premium, "Entitlement updated");
        Ok(self.entitlement)
    }

    /// Start a new day if `today` is after the stored last active day.
    ///
    /// The day marker is written before the habits so a failed habit write
    /// can never cause a second reset on the same day. If the habit write
    /// fails the previous marker is restored, best effort.
    pub async fn roll_over(&mut self, today: NaiveDate) -> Result<RolloverReport> {
        let previous_day = match get_json::<NaiveDate, _>(self.kv.as_ref(), keys::LAST_ACTIVE_DAY).await {
            Ok(day) => day,
            Err(e) => {
                warn!("Unreadable day marker, treating as first run: {e}");
                None
            }
        };

        let mut report = RolloverReport {
            previous_day,
            today,
            rolled: false,
            streaks_reset: 0,
        };

        let Some(previous) = previous_day else {
            set_json(self.kv.as_ref(), keys::LAST_ACTIVE_DAY, &today).await?;
            return Ok(report);
        };

        let days_elapsed = (today - previous).num_days();
        if days_elapsed <= 0 {
            return Ok(report);
        }

        set_json(self.kv.as_ref(), keys::LAST_ACTIVE_DAY, &today).await?;

        let mut staged = self.habits.clone();
        report.streaks_reset = staged
            .iter_mut()
            .map(|h| h.apply_new_day(days_elapsed))
            .filter(|change| *change == StreakChange::Reset)
            .count();
        if let Err(e) = self.commit(staged).await {
            // Put the old marker back so the next attempt resets again.
            if let Err(restore) = set_json(self.kv.as_ref(), keys::LAST_ACTIVE_DAY, &previous).await {
                warn!("Failed to restore day marker {previous}: {restore}");
            }
            return Err(e);
        }
        report.rolled = true;

        info!(
            %previous,
            %today,
            streaks_reset = report.streaks_reset,
            "Rolled over to a new day"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::model::HabitKind;
    use crate::storage::MemoryStore;

    fn unseeded() -> HabitsConfig {
        HabitsConfig {
            seed_defaults: false,
            ..Default::default()
        }
    }

    async fn empty_store() -> (Arc<MemoryStore>, HabitStore<MemoryStore>) {
        let kv = Arc::new(MemoryStore::new());
        let store = HabitStore::load(kv.clone(), unseeded()).await;
        (kv, store)
    }

    #[tokio::test]
    async fn load_seeds_and_persists_defaults() {
        let kv = Arc::new(MemoryStore::new());
        let store = HabitStore::load(kv.clone(), HabitsConfig::default()).await;
        assert_eq!(store.len(), 3);
        let persisted: Vec<Habit> = get_json(kv.as_ref(), keys::HABITS).await.unwrap().unwrap();
        assert_eq!(persisted, store.habits());
    }

    #[tokio::test]
    async fn load_with_corrupt_blob_starts_empty_without_seeding() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(keys::HABITS, "{not json").await.unwrap();
        let store = HabitStore::load(kv.clone(), HabitsConfig::default()).await;
        assert!(store.is_empty());
        assert_eq!(kv.get(keys::HABITS).await.unwrap().as_deref(), Some("{not json"));
    }

    #[tokio::test]
    async fn add_persists_collection() {
        let (kv, mut store) = empty_store().await;
        let outcome = store
            .add(HabitDraft::new("Stretch", HabitKind::Build))
            .await
            .unwrap();
        assert!(outcome.is_added());
        let persisted: Vec<Habit> = get_json(kv.as_ref(), keys::HABITS).await.unwrap().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].name, "Stretch");
    }

    #[tokio::test]
    async fn add_rejects_invalid_draft_without_writing() {
        let (kv, mut store) = empty_store().await;
        let err = store
            .add(HabitDraft::new("", HabitKind::Build))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::CoreError::Validation(_)));
        assert!(kv.get(keys::HABITS).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_tolerated_and_still_persisted() {
        let (kv, mut store) = empty_store().await;
        assert!(store.toggle("missing").await.unwrap().is_none());
        assert_eq!(kv.get(keys::HABITS).await.unwrap().as_deref(), Some("[]"));
        assert!(store.remove("missing").await.unwrap().is_none());
        assert!(store.adjust_value("missing", 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_deletes_record() {
        let (_kv, mut store) = empty_store().await;
        let AddOutcome::Added { habit } = store
            .add(HabitDraft::new("Floss", HabitKind::Build))
            .await
            .unwrap()
        else {
            panic!("expected add");
        };
        let removed = store.remove(&habit.id).await.unwrap().unwrap();
        assert_eq!(removed.id, habit.id);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn set_premium_persists_and_is_reloaded() {
        let (kv, mut store) = empty_store().await;
        store.set_premium(true).await.unwrap();
        assert!(store.entitlement().is_premium);
        let reloaded = HabitStore::load(kv, unseeded()).await;
        assert!(reloaded.entitlement().is_premium);
    }

    #[tokio::test]
    async fn first_rollover_only_writes_marker() {
        let (kv, mut store) = empty_store().await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let report = store.roll_over(today).await.unwrap();
        assert!(!report.rolled);
        assert_eq!(report.previous_day, None);
        let marker: NaiveDate = get_json(kv.as_ref(), keys::LAST_ACTIVE_DAY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(marker, today);
    }

    #[tokio::test]
    async fn rollover_resets_completion_and_missed_streaks() {
        let (_kv, mut store) = empty_store().await;
        let day1 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        store.roll_over(day1).await.unwrap();

        let done = match store.add(HabitDraft::new("Run", HabitKind::Build)).await.unwrap() {
            AddOutcome::Added { habit } => habit,
            other => panic!("unexpected {other:?}"),
        };
        let missed = match store.add(HabitDraft::new("Read", HabitKind::Build)).await.unwrap() {
            AddOutcome::Added { habit } => habit,
            other => panic!("unexpected {other:?}"),
        };
        store.toggle(&done.id).await.unwrap();
        store.record_result(&missed.id, true).await.unwrap();
        store.record_result(&missed.id, true).await.unwrap();
        store.toggle(&missed.id).await.unwrap(); // undo: streak 1, not done

        let report = store.roll_over(day1.succ_opt().unwrap()).await.unwrap();
        assert!(report.rolled);
        assert_eq!(report.streaks_reset, 1);

        let run = store.get(&done.id).unwrap();
        assert_eq!(run.streak, 1);
        assert!(!run.completed_today);
        let read = store.get(&missed.id).unwrap();
        assert_eq!(read.streak, 0);
        assert_eq!(read.longest_streak, 2);

        // same day again is a no-op
        let again = store.roll_over(day1.succ_opt().unwrap()).await.unwrap();
        assert!(!again.rolled);
        assert_eq!(store.get(&done.id).unwrap().streak, 1);
    }
}
