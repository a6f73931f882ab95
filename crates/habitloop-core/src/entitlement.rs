//! Premium entitlement and the free-tier habit cap.

use serde::{Deserialize, Serialize};

/// Persisted premium flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub is_premium: bool,
}

impl Entitlement {
    pub fn new(is_premium: bool) -> Self {
        Self { is_premium }
    }

    /// Maximum number of habits, `None` when unlimited.
    pub fn habit_limit(&self, free_limit: usize) -> Option<usize> {
        if self.is_premium {
            None
        } else {
            Some(free_limit)
        }
    }

    /// Whether one more habit fits next to `current_len` existing ones.
    pub fn can_add(&self, current_len: usize, free_limit: usize) -> bool {
        self.habit_limit(free_limit)
            .map_or(true, |limit| current_len < limit)
    }
}
