//! Habit records and the drafts they are created from.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Whether a habit is a routine to build or a behaviour to break.
///
/// Both kinds store completion identically; for `Break` a completed day
/// means the behaviour was avoided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    Build,
    Break,
}

impl HabitKind {
    /// Verb used when describing a completed day.
    pub fn completion_verb(self) -> &'static str {
        match self {
            HabitKind::Build => "completed",
            HabitKind::Break => "avoided",
        }
    }
}

impl std::str::FromStr for HabitKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "build" => Ok(HabitKind::Build),
            "break" => Ok(HabitKind::Break),
            other => Err(ValidationError::InvalidValue {
                field: "kind".into(),
                message: format!("expected 'build' or 'break', got '{other}'"),
            }),
        }
    }
}

/// Days a habit is scheduled on. Display-only; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Days(Vec<Weekday>),
}

impl Frequency {
    /// Build a weekday set, dropping duplicates while keeping order.
    pub fn days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut unique: Vec<Weekday> = Vec::new();
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        Frequency::Days(unique)
    }

    pub fn includes(&self, day: Weekday) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Days(days) => days.contains(&day),
        }
    }
}

/// Progress toward a counted target, e.g. 8 glasses of water.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub current_value: u32,
    pub target_value: u32,
    pub unit: String,
}

impl Quantity {
    pub fn is_met(&self) -> bool {
        self.current_value >= self.target_value
    }
}

/// One tracked routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub kind: HabitKind,
    pub color: String,
    pub icon: String,
    pub completed_today: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Build a fresh habit from a validated draft.
    pub fn from_draft(draft: HabitDraft, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            color: draft.color,
            icon: draft.icon,
            completed_today: false,
            streak: 0,
            longest_streak: 0,
            is_private: draft.is_private,
            quantity: draft.target.map(|t| Quantity {
                current_value: 0,
                target_value: t.target_value,
                unit: t.unit,
            }),
            frequency: draft.frequency,
            created_at,
        })
    }

    pub fn is_quantity(&self) -> bool {
        self.quantity.is_some()
    }
}

/// Target for a quantity habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityTarget {
    pub target_value: u32,
    pub unit: String,
}

/// Caller-supplied fields for a new habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    pub kind: HabitKind,
    pub icon: String,
    pub color: String,
    pub is_private: bool,
    pub frequency: Frequency,
    pub target: Option<QuantityTarget>,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>, kind: HabitKind) -> Self {
        let (icon, color) = match kind {
            HabitKind::Build => ("star", "#22c55e"),
            HabitKind::Break => ("ban", "#ef4444"),
        };
        Self {
            name: name.into(),
            kind,
            icon: icon.into(),
            color: color.into(),
            is_private: false,
            frequency: Frequency::Daily,
            target: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn target(mut self, target_value: u32, unit: impl Into<String>) -> Self {
        self.target = Some(QuantityTarget {
            target_value,
            unit: unit.into(),
        });
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(target) = &self.target {
            if target.target_value == 0 {
                return Err(ValidationError::ZeroTarget {
                    unit: target.unit.clone(),
                });
            }
        }
        Ok(())
    }
}
