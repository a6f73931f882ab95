//! Habit commands for CLI.

use chrono::Weekday;
use clap::{Subcommand, ValueEnum};
use habitloop_core::{AddOutcome, Config, Frequency, HabitDraft, HabitKind, HabitView, Mutation};

use super::{open_service, resolve_id, short_id, unlock, CmdResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Enter the PIN to reveal private habits
        #[arg(long)]
        unlock: bool,
    },
    /// Totals and best streaks
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a habit
    Add {
        /// Habit name
        name: String,
        /// build or break
        #[arg(long, default_value = "build")]
        kind: HabitKind,
        #[arg(long)]
        icon: Option<String>,
        /// Hex color, e.g. "#22c55e"
        #[arg(long)]
        color: Option<String>,
        /// Hide behind the privacy lock
        #[arg(long)]
        private: bool,
        /// Daily target for a counted habit
        #[arg(long)]
        target: Option<u32>,
        /// Unit for --target
        #[arg(long, default_value = "times", requires = "target")]
        unit: String,
        /// Comma-separated weekdays (e.g. mon,wed,fri); daily if omitted
        #[arg(long, value_delimiter = ',')]
        days: Vec<Weekday>,
    },
    /// Mark done / undo for today
    Toggle {
        /// Habit ID (or unique prefix)
        id: String,
    },
    /// Change a counted habit's value
    Adjust {
        /// Habit ID (or unique prefix)
        id: String,
        /// Amount to add; negative to subtract
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Record today's outcome explicitly
    Record {
        /// Habit ID (or unique prefix)
        id: String,
        #[arg(value_enum)]
        outcome: Outcome,
    },
    /// Delete a habit
    Remove {
        /// Habit ID (or unique prefix)
        id: String,
    },
}

pub async fn run(action: HabitAction) -> CmdResult {
    let config = Config::load_or_default();
    let handle = open_service(&config).await?;

    match action {
        HabitAction::List { json, unlock: want_unlock } => {
            if want_unlock {
                unlock(&handle).await?;
            }
            let views = handle.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if views.is_empty() {
                println!("No habits yet. Add one with `habitloop-cli habit add <name>`");
            } else {
                print_table(&views);
            }
        }
        HabitAction::Summary { json } => {
            let summary = handle.summary().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Habits: {} ({} build, {} break, {} private)",
                    summary.total, summary.build, summary.r#break, summary.private
                );
                println!("Done today: {}/{}", summary.completed_today, summary.total);
                println!(
                    "Best streak: {} now, {} all-time",
                    summary.best_current_streak, summary.best_longest_streak
                );
            }
        }
        HabitAction::Add {
            name,
            kind,
            icon,
            color,
            private,
            target,
            unit,
            days,
        } => {
            let mut draft = HabitDraft::new(name, kind).private(private);
            if let Some(icon) = icon {
                draft = draft.icon(icon);
            }
            if let Some(color) = color {
                draft = draft.color(color);
            }
            if let Some(target) = target {
                draft = draft.target(target, unit);
            }
            if !days.is_empty() {
                draft = draft.frequency(Frequency::days(days));
            }

            match handle.add(draft).await? {
                AddOutcome::Added { habit } => {
                    println!("Habit created: {}", habit.id);
                }
                AddOutcome::LimitReached { limit } => {
                    eprintln!(
                        "Free plan is limited to {limit} habits. \
                         Run `habitloop-cli premium enable` to add more."
                    );
                    std::process::exit(2);
                }
            }
        }
        HabitAction::Toggle { id } => {
            let id = resolve_id(&handle, &id).await?;
            print_mutation(handle.toggle(&id).await?);
        }
        HabitAction::Adjust { id, delta } => {
            let id = resolve_id(&handle, &id).await?;
            print_mutation(handle.adjust_value(&id, delta).await?);
        }
        HabitAction::Record { id, outcome } => {
            let id = resolve_id(&handle, &id).await?;
            let success = matches!(outcome, Outcome::Success);
            print_mutation(handle.record_result(&id, success).await?);
        }
        HabitAction::Remove { id } => {
            let id = resolve_id(&handle, &id).await?;
            match handle.remove(&id).await? {
                Some(_) => println!("Habit removed: {id}"),
                None => println!("No habit with id {id}"),
            }
        }
    }
    Ok(())
}

fn today_column(view: &HabitView) -> String {
    match &view.quantity {
        Some(q) => format!("{}/{} {}", q.current_value, q.target_value, q.unit),
        None if view.completed_today => view.kind.completion_verb().to_string(),
        None if view.scheduled_today => "pending".to_string(),
        None => "-".to_string(),
    }
}

fn print_table(views: &[HabitView]) {
    println!(
        "{:<8}  {:<24}  {:<5}  {:<16}  {:>6}  {:>4}",
        "ID", "NAME", "KIND", "TODAY", "STREAK", "BEST"
    );
    for view in views {
        let kind = match view.kind {
            HabitKind::Build => "build",
            HabitKind::Break => "break",
        };
        println!(
            "{:<8}  {:<24}  {:<5}  {:<16}  {:>6}  {:>4}",
            short_id(&view.id),
            view.name,
            kind,
            today_column(view),
            view.streak,
            view.longest_streak
        );
    }
}

fn print_mutation(mutation: Option<Mutation>) {
    let Some(Mutation { habit, change }) = mutation else {
        println!("No matching habit");
        return;
    };
    let today = if habit.completed_today {
        habit.kind.completion_verb()
    } else {
        "not done"
    };
    println!(
        "{}: {today}, streak {} (best {}) [{change:?}]",
        short_id(&habit.id),
        habit.streak,
        habit.longest_streak
    );
}
