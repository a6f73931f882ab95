mod model;
mod seed;
mod store;
mod streak;
mod view;

pub use model::{Frequency, Habit, HabitDraft, HabitKind, Quantity, QuantityTarget};
pub use seed::default_habits;
pub use store::{AddOutcome, HabitStore, Mutation, RolloverReport};
pub use streak::StreakChange;
pub use view::{HabitSummary, HabitView, MASKED_ICON, MASKED_NAME};
