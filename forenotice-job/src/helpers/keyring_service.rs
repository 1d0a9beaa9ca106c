use keyring::Entry;

const KEYCHAIN_SERVICE: &str = "forenotice-google";

#[derive(Debug, thiserror::Error)]
pub enum KeyringError {
    #[error("Refresh token not found in keychain")]
    NotFound,

    #[error("Keychain service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Keychain operation failed: {0}")]
    OperationFailed(String),
}

/// Stores the Google refresh token in the OS keychain, keyed by account.
pub struct KeyringService;

impl KeyringService {
    fn entry(account: &str) -> Result<Entry, KeyringError> {
        Entry::new(KEYCHAIN_SERVICE, account).map_err(|e| {
            KeyringError::ServiceUnavailable(format!("Failed to create keychain entry: {}", e))
        })
    }

    pub fn set_refresh_token(account: &str, token: &str) -> Result<(), KeyringError> {
        Self::entry(account)?.set_password(token).map_err(|e| {
            KeyringError::OperationFailed(format!("Failed to store refresh token: {}", e))
        })
    }

    pub fn get_refresh_token(account: &str) -> Result<String, KeyringError> {
        Self::entry(account)?.get_password().map_err(|e| {
            if e.to_string().contains("not found") || e.to_string().contains("NotFound") {
                KeyringError::NotFound
            } else {
                KeyringError::OperationFailed(format!("Failed to retrieve refresh token: {}", e))
            }
        })
    }

    pub fn delete_refresh_token(account: &str) -> Result<(), KeyringError> {
        Self::entry(account)?.delete_password().map_err(|e| {
            if e.to_string().contains("not found") || e.to_string().contains("NotFound") {
                KeyringError::NotFound
            } else {
                KeyringError::OperationFailed(format!("Failed to delete refresh token: {}", e))
            }
        })
    }
}
