use std::path::{Path, PathBuf};

use anyhow::anyhow;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use tracing::{debug, info};

use crate::error::AuthError;
use crate::models::AuthRecord;
use crate::services::AuthService;
use crate::storage::{read_json, write_json};

/// Password kept as an Argon2id PHC string in a JSON file.
pub struct LocalAuth {
    path: PathBuf,
}

impl LocalAuth {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<AuthRecord>, AuthError> {
        read_json(&self.path).map_err(AuthError::Storage)
    }

    fn store(&self, password: &str) -> Result<(), AuthError> {
        let record = AuthRecord {
            password_hash: hash_password(password)?,
        };
        write_json(&self.path, &record).map_err(AuthError::Storage)
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Storage(anyhow!("Password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Storage(anyhow!("Bad stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl AuthService for LocalAuth {
    fn is_password_set(&self) -> Result<bool, AuthError> {
        Ok(self.load()?.is_some())
    }

    fn set_password(&mut self, password: &str) -> Result<(), AuthError> {
        if self.load()?.is_some() {
            return Err(AuthError::AlreadySet);
        }
        self.store(password)?;
        info!("password set");
        Ok(())
    }

    fn check_password(&self, password: &str) -> Result<bool, AuthError> {
        match self.load()? {
            Some(record) => verify_password(password, &record.password_hash),
            None => {
                debug!("password check without a stored password");
                Ok(false)
            }
        }
    }

    fn change_password(&mut self, old: &str, new: &str) -> Result<(), AuthError> {
        let record = self.load()?.ok_or(AuthError::NotSet)?;
        if !verify_password(old, &record.password_hash)? {
            return Err(AuthError::IncorrectPassword);
        }
        self.store(new)?;
        info!("password changed");
        Ok(())
    }
}
