//! Thin wrapper around the OS keyring for secrets (API key, PIN hash).

use crate::error::CoreError;

const SERVICE: &str = "habitloop";

/// Keyring entry holding the privacy PIN hash.
pub const PIN_HASH_ENTRY: &str = "privacy_pin_hash";

fn keyring_error(e: keyring::Error) -> CoreError {
    CoreError::Custom(format!("keyring: {e}"))
}

pub fn get(key: &str) -> Result<Option<String>, CoreError> {
    let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
    match entry.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(keyring_error(e)),
    }
}

pub fn set(key: &str, value: &str) -> Result<(), CoreError> {
    let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
    entry.set_password(value).map_err(keyring_error)
}

pub fn delete(key: &str) -> Result<(), CoreError> {
    let entry = keyring::Entry::new(SERVICE, key).map_err(keyring_error)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(keyring_error(e)),
    }
}
