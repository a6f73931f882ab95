mod challenge;
mod gate;

pub use challenge::{hash_pin, AuthChallenge, ChallengeOutcome, PinVerifier};
pub use gate::{AuthOutcome, GateState, LockoutPolicy, PrivacyGate, PrivacyStatus};
