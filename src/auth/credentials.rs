//! Credential verification for the login endpoint

use crate::config::CredentialsConfig;
use crate::utils::error::{Result, TrustError};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Authenticated principal returned by a verifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub username: String,
    pub role: String,
}

/// Checks a username/password pair
#[async_trait::async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(None)` for unknown users and wrong passwords alike
    async fn verify(&self, username: &str, password: &str) -> Result<Option<Identity>>;
}

/// Users declared in configuration with argon2 password hashes
#[derive(Debug, Default)]
pub struct StaticCredentialVerifier {
    users: HashMap<String, (Identity, String)>,
}

impl StaticCredentialVerifier {
    pub fn from_config(config: &CredentialsConfig) -> Self {
        let users = config
            .users
            .iter()
            .map(|user| {
                let identity = Identity {
                    subject: user.subject.clone().unwrap_or_else(|| user.username.clone()),
                    username: user.username.clone(),
                    role: user.role.clone(),
                };
                (user.username.clone(), (identity, user.password_hash.clone()))
            })
            .collect();
        Self { users }
    }

    /// Add a user with a plaintext password, hashing it
    pub fn with_user(mut self, username: &str, password: &str, role: &str) -> Result<Self> {
        let identity = Identity {
            subject: username.to_string(),
            username: username.to_string(),
            role: role.to_string(),
        };
        self.users
            .insert(username.to_string(), (identity, hash_password(password)?));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<Option<Identity>> {
        let Some((identity, hash)) = self.users.get(username) else {
            debug!("Login for unknown user {}", username);
            return Ok(None);
        };

        if verify_password(password, hash)? {
            Ok(Some(identity.clone()))
        } else {
            Ok(None)
        }
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TrustError::crypto(format!("Failed to hash password: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| TrustError::crypto(format!("Failed to parse password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(TrustError::crypto(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
