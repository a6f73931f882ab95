//! # Habitloop Core Library
//!
//! This library holds the domain logic for the Habitloop habit tracker. The
//! CLI binary is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Habits**: The habit list, streak arithmetic, free-tier gating and the
//!   daily rollover. Every mutation is written to storage before it becomes
//!   visible in memory.
//! - **Privacy**: A gate in front of private habits, backed by a pluggable
//!   challenge, with a lockout after repeated failures.
//! - **Storage**: A string key-value store (SQLite or in-memory) and
//!   TOML-based configuration
//! - **Insights**: Prompts for an external text-generation service, with
//!   canned fallbacks
//!
//! ## Key Components
//!
//! - [`HabitStore`]: Habit list and its operations
//! - [`PrivacyGate`]: Lock state for private habits
//! - [`HabitService`]: Single-writer task owning both, reached via [`HabitHandle`]
//! - [`KeyValueStore`]: Persistence seam
//! - [`Config`]: Application configuration management

pub mod credentials;
pub mod entitlement;
pub mod error;
pub mod habit;
pub mod insights;
pub mod privacy;
pub mod service;
pub mod storage;

pub use entitlement::Entitlement;
pub use error::{ConfigError, CoreError, InsightError, StorageError, ValidationError};
pub use habit::{
    AddOutcome, Frequency, Habit, HabitDraft, HabitKind, HabitStore, HabitSummary, HabitView,
    Mutation, Quantity, RolloverReport, StreakChange,
};
pub use insights::{InsightService, Tone};
pub use privacy::{AuthChallenge, AuthOutcome, ChallengeOutcome, GateState, PrivacyGate};
pub use service::{HabitHandle, HabitService, HabitSnapshot};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
