use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Read-only set of accounts allowed to sign in.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = UserRecord>,
    {
        let mut users = HashMap::new();
        for record in records {
            let username = record.username.trim().to_string();
            if username.is_empty() {
                return Err(anyhow!("User record with empty username"));
            }
            PasswordHash::new(&record.password_hash)
                .map_err(|err| anyhow!("Invalid password hash for '{username}': {err}"))?;
            if users.insert(username.clone(), record).is_some() {
                return Err(anyhow!("Duplicate user '{username}'"));
            }
        }
        Ok(Self { users })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read users file {}", path.display()))?;
        let records: Vec<UserRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse users file {}", path.display()))?;
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns the account when `password` matches; `None` for any mismatch.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&UserRecord> {
        let record = self.users.get(username.trim())?;
        let parsed = match PasswordHash::new(&record.password_hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(username = %record.username, %err, "stored password hash unreadable");
                return None;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()
            .map(|_| record)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("Failed to hash password: {err}"))
}
