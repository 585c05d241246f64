//! Service-account credentials for the compute service.
//!
//! Credentials are read from the environment or a key file and handed to
//! the HTTP client. They are never logged: `Debug` redacts the key material.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::ComputeError;

/// Inline credential JSON.
pub const CREDENTIALS_ENV: &str = "COMPUTE_CREDENTIALS";
/// Path to a credential JSON file.
pub const CREDENTIALS_PATH_ENV: &str = "COMPUTE_CREDENTIALS_PATH";

/// A service-account key as issued by the cloud console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
}

impl ServiceAccount {
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let account: ServiceAccount = serde_json::from_str(json)
            .map_err(|e| ComputeError::Credentials(format!("malformed key JSON: {}", e)))?;

        if account.client_email.is_empty() || account.private_key.is_empty() {
            return Err(ComputeError::Credentials(
                "client_email and private_key are required".to_string(),
            ));
        }
        Ok(account)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ComputeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ComputeError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// `COMPUTE_CREDENTIALS` (inline JSON) takes precedence over
    /// `COMPUTE_CREDENTIALS_PATH`. `Ok(None)` when neither is set.
    pub fn from_env() -> Result<Option<Self>, ComputeError> {
        if let Ok(json) = std::env::var(CREDENTIALS_ENV) {
            return Self::from_json(&json).map(Some);
        }
        if let Ok(path) = std::env::var(CREDENTIALS_PATH_ENV) {
            return Self::from_file(path).map(Some);
        }
        Ok(None)
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("private_key_id", &"<redacted>")
            .field("private_key", &"<redacted>")
            .finish()
    }
}
