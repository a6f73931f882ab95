//! Presentation projections of habits.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::model::{Frequency, Habit, HabitKind, Quantity};

pub const MASKED_NAME: &str = "Private habit";
pub const MASKED_ICON: &str = "lock";

/// A habit as a screen may show it. Private habits are masked while the
/// privacy gate is not unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    pub id: String,
    pub name: String,
    pub kind: HabitKind,
    pub icon: String,
    pub color: String,
    pub completed_today: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub is_private: bool,
    pub masked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    pub frequency: Frequency,
    pub scheduled_today: bool,
}

impl HabitView {
    pub fn project(habit: &Habit, unlocked: bool, today: Weekday) -> Self {
        let masked = habit.is_private && !unlocked;
        Self {
            id: habit.id.clone(),
            name: if masked {
                MASKED_NAME.to_string()
            } else {
                habit.name.clone()
            },
            kind: habit.kind,
            icon: if masked {
                MASKED_ICON.to_string()
            } else {
                habit.icon.clone()
            },
            color: habit.color.clone(),
            completed_today: habit.completed_today,
            streak: habit.streak,
            longest_streak: habit.longest_streak,
            is_private: habit.is_private,
            masked,
            quantity: habit.quantity.clone(),
            frequency: habit.frequency.clone(),
            scheduled_today: habit.frequency.includes(today),
        }
    }
}

/// Aggregate numbers for a dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub total: usize,
    pub build: usize,
    pub r#break: usize,
    pub completed_today: usize,
    pub private: usize,
    pub best_current_streak: u32,
    pub best_longest_streak: u32,
}

impl HabitSummary {
    pub fn from_habits(habits: &[Habit]) -> Self {
        habits.iter().fold(Self::default(), |mut acc, h| {
            acc.total += 1;
            match h.kind {
                HabitKind::Build => acc.build += 1,
                HabitKind::Break => acc.r#break += 1,
            }
            if h.completed_today {
                acc.completed_today += 1;
            }
            if h.is_private {
                acc.private += 1;
            }
            acc.best_current_streak = acc.best_current_streak.max(h.streak);
            acc.best_longest_streak = acc.best_longest_streak.max(h.longest_streak);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::model::HabitDraft;
    use chrono::Utc;

    fn secret() -> Habit {
        Habit::from_draft(
            HabitDraft::new("Therapy homework", HabitKind::Build)
                .icon("heart")
                .private(true)
                .frequency(Frequency::days([Weekday::Tue])),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn private_habit_is_masked_while_locked() {
        let view = HabitView::project(&secret(), false, Weekday::Mon);
        assert!(view.masked);
        assert_eq!(view.name, MASKED_NAME);
        assert_eq!(view.icon, MASKED_ICON);
        assert!(!view.scheduled_today);
    }

    #[test]
    fn unlocked_gate_reveals_private_habit() {
        let view = HabitView::project(&secret(), true, Weekday::Tue);
        assert!(!view.masked);
        assert_eq!(view.name, "Therapy homework");
        assert!(view.scheduled_today);
    }

    #[test]
    fn summary_counts() {
        let mut a = secret();
        a.streak = 4;
        a.longest_streak = 7;
        a.completed_today = true;
        let b = Habit::from_draft(HabitDraft::new("Vaping", HabitKind::Break), Utc::now()).unwrap();
        let summary = HabitSummary::from_habits(&[a, b]);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.build, 1);
        assert_eq!(summary.r#break, 1);
        assert_eq!(summary.completed_today, 1);
        assert_eq!(summary.private, 1);
        assert_eq!(summary.best_current_streak, 4);
        assert_eq!(summary.best_longest_streak, 7);
    }
}
