//! Habits written on first launch.

use chrono::{DateTime, Utc};

use super::model::{Habit, HabitDraft, HabitKind};

/// The first-run collection. Sized to fit the free tier.
pub fn default_habits(now: DateTime<Utc>) -> Vec<Habit> {
    let drafts = [
        HabitDraft::new("Drink Water", HabitKind::Build)
            .icon("droplet")
            .color("#3b82f6")
            .target(8, "glasses"),
        HabitDraft::new("Morning Meditation", HabitKind::Build)
            .icon("sun")
            .color("#a855f7"),
        HabitDraft::new("No Late-Night Snacks", HabitKind::Break)
            .icon("moon")
            .color("#f97316"),
    ];

    drafts
        .into_iter()
        .filter_map(|draft| Habit::from_draft(draft, now).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fits_free_tier_and_mixes_kinds() {
        let habits = default_habits(Utc::now());
        assert_eq!(habits.len(), 3);
        assert!(habits.iter().any(|h| h.kind == HabitKind::Break));
        assert!(habits.iter().any(|h| h.is_quantity()));
        assert!(habits.iter().all(|h| h.streak == 0 && !h.completed_today));
    }
}
