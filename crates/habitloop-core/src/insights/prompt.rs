//! Prompt templates for insight generation.

use indoc::indoc;
use serde::{Deserialize, Serialize};

use crate::habit::{Habit, HabitKind, MASKED_NAME};

/// Tone of a one-sentence verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Praise,
    Roast,
}

const INSIGHTS_TEMPLATE: &str = indoc! {r#"
    You are a supportive habit coach. Here is a snapshot of the user's habits:

    {habits}

    Reply with ONLY a JSON array of 3 objects, each with the keys
    "title" (max 6 words), "description" (one or two sentences) and
    "icon" (a single emoji). No prose outside the JSON.
"#};

const PRAISE_TEMPLATE: &str = indoc! {"
    Here is a snapshot of the user's habits:

    {habits}

    Write one short, upbeat sentence praising their progress. Plain text only.
"};

const ROAST_TEMPLATE: &str = indoc! {"
    Here is a snapshot of the user's habits:

    {habits}

    Write one short, playful sentence roasting their consistency. Keep it kind.
    Plain text only.
"};

/// One line per habit. Private habits are anonymised unless `reveal_private`.
pub fn habit_snapshot(habits: &[Habit], reveal_private: bool) -> String {
    if habits.is_empty() {
        return "- (no habits yet)".to_string();
    }

    habits
        .iter()
        .map(|h| {
            let name = if h.is_private && !reveal_private {
                MASKED_NAME
            } else {
                h.name.as_str()
            };
            let kind = match h.kind {
                HabitKind::Build => "build",
                HabitKind::Break => "break",
            };
            let today = if h.completed_today {
                h.kind.completion_verb()
            } else {
                "pending"
            };
            format!(
                "- {name} ({kind}): streak {}, best {}, today {today}",
                h.streak, h.longest_streak
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn insights_prompt(habits: &[Habit], reveal_private: bool) -> String {
    INSIGHTS_TEMPLATE.replace("{habits}", &habit_snapshot(habits, reveal_private))
}

pub fn verdict_prompt(habits: &[Habit], tone: Tone, reveal_private: bool) -> String {
    let template = match tone {
        Tone::Praise => PRAISE_TEMPLATE,
        Tone::Roast => ROAST_TEMPLATE,
    };
    template.replace("{habits}", &habit_snapshot(habits, reveal_private))
}
