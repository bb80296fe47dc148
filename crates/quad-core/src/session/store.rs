//! Durable session storage.
//!
//! Persists the two session entries — the opaque auth token and the
//! serialized current user — under the quad home directory. The token
//! file is written with restricted permissions (0600). Nothing else in
//! the client reads or writes these entries.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use quad_types::AuthUser;
use tracing::warn;

use crate::config::paths;

/// Durable auth-token filename.
const TOKEN_FILE: &str = "auth_token";
/// Durable current-user filename.
const USER_FILE: &str = "current_user.json";

/// Owner of the durable session entries.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Store rooted at the quad home directory.
    pub fn new() -> Self {
        Self {
            root: paths::quad_home(),
        }
    }

    /// Store rooted at an explicit directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.root.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.root.join(USER_FILE)
    }

    /// Reads the stored auth token. Missing or empty entries are `None`.
    pub fn read_token(&self) -> Option<String> {
        let contents = fs::read_to_string(self.token_path()).ok()?;
        let token = contents.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    /// Writes the auth token with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn write_token(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        self.ensure_root()?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(token.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&path, token)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }

    /// Reads the stored user.
    ///
    /// Fails closed: a missing or malformed entry yields `None` (logged
    /// at WARN), never an error — a corrupt entry must not block startup.
    pub fn read_user(&self) -> Option<AuthUser> {
        let path = self.user_path();
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(
                    "Discarding malformed stored user at {}: {err}",
                    path.display()
                );
                None
            }
        }
    }

    /// Writes the current user.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn write_user(&self, user: &AuthUser) -> Result<()> {
        let path = self.user_path();
        self.ensure_root()?;

        let contents = serde_json::to_string_pretty(user).context("Failed to serialize user")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
        Ok(())
    }

    /// Writes token and user together after a successful login.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn save_session(&self, token: &str, user: &AuthUser) -> Result<()> {
        self.write_token(token)?;
        self.write_user(user)?;
        Ok(())
    }

    /// Removes both durable entries. Missing entries are fine; cannot fail.
    pub fn clear(&self) {
        let _ = fs::remove_file(self.token_path());
        let _ = fs::remove_file(self.user_path());
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory {}", self.root.display()))
    }
}
