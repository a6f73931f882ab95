//! Device authentication challenge seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Result of a platform authentication prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeOutcome {
    Success,
    Failed,
    Cancelled,
    Unavailable,
}

impl ChallengeOutcome {
    /// Only an explicit success unlocks; everything else counts as a failure.
    pub fn is_success(self) -> bool {
        self == ChallengeOutcome::Success
    }
}

/// Biometric / passcode prompt supplied by the host platform.
#[async_trait]
pub trait AuthChallenge: Send + Sync {
    async fn challenge(&self, prompt: &str) -> ChallengeOutcome;
}

/// Hex SHA-256 of a PIN. Only the hash is ever stored.
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.trim().as_bytes()))
}

/// Checks PIN entries against a stored hash.
#[derive(Debug, Clone)]
pub struct PinVerifier {
    hash: Option<String>,
}

impl PinVerifier {
    pub fn new(hash: Option<String>) -> Self {
        Self { hash }
    }

    pub fn is_configured(&self) -> bool {
        self.hash.is_some()
    }

    pub fn verify(&self, candidate: &str) -> ChallengeOutcome {
        match &self.hash {
            None => ChallengeOutcome::Unavailable,
            Some(hash) if *hash == hash_pin(candidate) => ChallengeOutcome::Success,
            Some(_) => ChallengeOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_success_counts() {
        assert!(ChallengeOutcome::Success.is_success());
        assert!(!ChallengeOutcome::Failed.is_success());
        assert!(!ChallengeOutcome::Cancelled.is_success());
        assert!(!ChallengeOutcome::Unavailable.is_success());
    }

    #[test]
    fn pin_verifier_compares_hashes() {
        let verifier = PinVerifier::new(Some(hash_pin("2468")));
        assert_eq!(verifier.verify("2468"), ChallengeOutcome::Success);
        assert_eq!(verifier.verify(" 2468\n"), ChallengeOutcome::Success);
        assert_eq!(verifier.verify("1357"), ChallengeOutcome::Failed);
        assert_eq!(
            PinVerifier::new(None).verify("2468"),
            ChallengeOutcome::Unavailable
        );
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = hash_pin("0000");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
