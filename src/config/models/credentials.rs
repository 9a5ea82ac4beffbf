//! Static credential configuration for the login endpoint

use serde::{Deserialize, Serialize};

/// Static user directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Known users
    #[serde(default)]
    pub users: Vec<UserCredential>,
}

/// One user entry
#[derive(Clone, Serialize, Deserialize)]
pub struct UserCredential {
    /// Login name
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Role name granted on login
    pub role: String,
    /// Stable subject id; defaults to the username
    #[serde(default)]
    pub subject: Option<String>,
}

impl std::fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredential")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("subject", &self.subject)
            .finish()
    }
}
