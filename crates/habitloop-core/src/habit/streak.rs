//! Streak transitions applied to a single habit.
//!
//! Every transition keeps `longest_streak >= streak` and never lets the
//! streak underflow. `toggle` and `record_result` deliberately differ on
//! the way down: undoing a completion steps back by one, recording an
//! explicit failure resets to zero.

use serde::{Deserialize, Serialize};

use super::model::Habit;

/// What a transition did to a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    Extended,
    SteppedBack,
    Reset,
    Unchanged,
}

impl Habit {
    fn bump_longest(&mut self) {
        self.longest_streak = self.longest_streak.max(self.streak);
    }

    fn extend_streak(&mut self) {
        self.streak = self.streak.saturating_add(1);
        self.bump_longest();
    }

    fn step_back_streak(&mut self) {
        self.streak = self.streak.saturating_sub(1);
        self.bump_longest();
    }

    /// Flip today's completion of a non-quantity habit.
    ///
    /// Quantity habits derive completion from their value and are left
    /// untouched.
    pub fn apply_toggle(&mut self) -> StreakChange {
        if self.is_quantity() {
            return StreakChange::Unchanged;
        }

        self.completed_today = !self.completed_today;
        if self.completed_today {
            self.extend_streak();
            StreakChange::Extended
        } else {
            self.step_back_streak();
            StreakChange::SteppedBack
        }
    }

    /// Move a quantity habit's value by `delta`, floored at zero.
    ///
    /// Crossing the target upward extends the streak, crossing it downward
    /// steps it back. Non-quantity habits are left untouched.
    pub fn apply_adjust(&mut self, delta: i64) -> StreakChange {
        let Some(quantity) = self.quantity.as_mut() else {
            return StreakChange::Unchanged;
        };

        let was_met = quantity.is_met();
        let next = i64::from(quantity.current_value)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        quantity.current_value = next as u32;
        let now_met = quantity.is_met();
        self.completed_today = now_met;

        match (was_met, now_met) {
            (false, true) => {
                self.extend_streak();
                StreakChange::Extended
            }
            (true, false) => {
                self.step_back_streak();
                StreakChange::SteppedBack
            }
            _ => StreakChange::Unchanged,
        }
    }

    /// Record an explicit outcome for today.
    ///
    /// On a quantity habit success fills the value up to the target and
    /// failure empties it, so completion stays derived from the value. A
    /// success on a target that is already met does not count twice.
    pub fn apply_result(&mut self, success: bool) -> StreakChange {
        if let Some(quantity) = self.quantity.as_mut() {
            if success {
                let was_met = quantity.is_met();
                quantity.current_value = quantity.current_value.max(quantity.target_value);
                self.completed_today = true;
                if was_met {
                    return StreakChange::Unchanged;
                }
            } else {
                quantity.current_value = 0;
            }
        }

        if success {
            self.completed_today = true;
            self.extend_streak();
            StreakChange::Extended
        } else {
            self.completed_today = false;
            self.streak = 0;
            StreakChange::Reset
        }
    }

    /// Start a new day. The streak survives only if exactly one day passed
    /// and the previous day was completed.
    pub fn apply_new_day(&mut self, days_elapsed: i64) -> StreakChange {
        let kept = days_elapsed == 1 && self.completed_today;
        self.completed_today = false;
        if let Some(quantity) = self.quantity.as_mut() {
            quantity.current_value = 0;
        }

        if kept || self.streak == 0 {
            StreakChange::Unchanged
        } else {
            self.streak = 0;
            StreakChange::Reset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::model::{HabitDraft, HabitKind, Quantity};
    use chrono::Utc;

    fn habit() -> Habit {
        Habit::from_draft(HabitDraft::new("Meditate", HabitKind::Build), Utc::now()).unwrap()
    }

    fn water(current: u32, streak: u32, completed: bool) -> Habit {
        let mut h = habit();
        h.quantity = Some(Quantity {
            current_value: current,
            target_value: 8,
            unit: "glasses".into(),
        });
        h.streak = streak;
        h.longest_streak = streak;
        h.completed_today = completed;
        h
    }

    #[test]
    fn toggle_on_extends_streak() {
        let mut h = habit();
        h.streak = 5;
        h.longest_streak = 5;
        assert_eq!(h.apply_toggle(), StreakChange::Extended);
        assert!(h.completed_today);
        assert_eq!(h.streak, 6);
        assert_eq!(h.longest_streak, 6);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut h = habit();
        h.streak = 3;
        h.longest_streak = 9;
        let before = h.clone();
        h.apply_toggle();
        h.apply_toggle();
        assert_eq!(h, before);
    }

    #[test]
    fn toggle_off_floors_at_zero() {
        let mut h = habit();
        h.completed_today = true;
        assert_eq!(h.apply_toggle(), StreakChange::SteppedBack);
        assert_eq!(h.streak, 0);
        assert!(!h.completed_today);
    }

    #[test]
    fn toggle_ignores_quantity_habits() {
        let mut h = water(3, 2, false);
        let before = h.clone();
        assert_eq!(h.apply_toggle(), StreakChange::Unchanged);
        assert_eq!(h, before);
    }

    #[test]
    fn adjust_crossing_up_and_down() {
        let mut h = water(7, 3, false);
        assert_eq!(h.apply_adjust(1), StreakChange::Extended);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 8);
        assert!(h.completed_today);
        assert_eq!(h.streak, 4);

        assert_eq!(h.apply_adjust(-1), StreakChange::SteppedBack);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 7);
        assert!(!h.completed_today);
        assert_eq!(h.streak, 3);
        assert_eq!(h.longest_streak, 4);
    }

    #[test]
    fn adjust_without_crossing_keeps_streak() {
        let mut h = water(8, 4, true);
        assert_eq!(h.apply_adjust(3), StreakChange::Unchanged);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 11);
        assert_eq!(h.streak, 4);
    }

    #[test]
    fn adjust_floors_value_at_zero() {
        let mut h = water(2, 0, false);
        h.apply_adjust(-10);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 0);
        assert_eq!(h.streak, 0);
    }

    #[test]
    fn adjust_saturates_on_extreme_deltas() {
        let mut h = water(1, 2, false);
        assert_eq!(h.apply_adjust(i64::MAX), StreakChange::Extended);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, u32::MAX);
        assert!(h.completed_today);
        assert_eq!(h.streak, 3);

        assert_eq!(h.apply_adjust(i64::MAX), StreakChange::Unchanged);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, u32::MAX);

        assert_eq!(h.apply_adjust(i64::MIN), StreakChange::SteppedBack);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 0);
        assert!(!h.completed_today);
        assert_eq!(h.streak, 2);
    }

    #[test]
    fn result_on_quantity_habit_keeps_value_and_completion_in_step() {
        let mut h = water(0, 0, false);
        assert_eq!(h.apply_result(true), StreakChange::Extended);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 8);
        assert!(h.completed_today);
        assert_eq!(h.streak, 1);

        // Reaching the target again the same day does not count twice.
        assert_eq!(h.apply_adjust(8), StreakChange::Unchanged);
        assert_eq!(h.apply_result(true), StreakChange::Unchanged);
        assert_eq!(h.streak, 1);

        assert_eq!(h.apply_result(false), StreakChange::Reset);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 0);
        assert!(!h.completed_today);
        assert_eq!(h.streak, 0);
        assert_eq!(h.longest_streak, 1);
    }

    #[test]
    fn adjust_ignores_plain_habits() {
        let mut h = habit();
        let before = h.clone();
        assert_eq!(h.apply_adjust(1), StreakChange::Unchanged);
        assert_eq!(h, before);
    }

    #[test]
    fn failure_result_resets_instead_of_decrementing() {
        let mut h = habit();
        h.streak = 10;
        h.longest_streak = 10;
        h.completed_today = true;
        assert_eq!(h.apply_result(false), StreakChange::Reset);
        assert_eq!(h.streak, 0);
        assert!(!h.completed_today);
        assert_eq!(h.longest_streak, 10);

        assert_eq!(h.apply_result(true), StreakChange::Extended);
        assert_eq!(h.streak, 1);
        assert!(h.completed_today);
    }

    #[test]
    fn new_day_keeps_streak_only_after_completed_yesterday() {
        let mut done = habit();
        done.streak = 4;
        done.completed_today = true;
        assert_eq!(done.apply_new_day(1), StreakChange::Unchanged);
        assert_eq!(done.streak, 4);
        assert!(!done.completed_today);

        let mut missed = habit();
        missed.streak = 4;
        missed.longest_streak = 6;
        assert_eq!(missed.apply_new_day(1), StreakChange::Reset);
        assert_eq!(missed.streak, 0);
        assert_eq!(missed.longest_streak, 6);

        let mut gap = habit();
        gap.streak = 2;
        gap.completed_today = true;
        assert_eq!(gap.apply_new_day(3), StreakChange::Reset);
    }

    #[test]
    fn new_day_zeroes_quantity_progress() {
        let mut h = water(8, 4, true);
        h.apply_new_day(1);
        assert_eq!(h.quantity.as_ref().unwrap().current_value, 0);
        assert_eq!(h.streak, 4);
    }
}
