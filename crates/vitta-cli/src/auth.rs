//! Allow-list login and session token storage
//!
//! Credentials are checked against a hard-coded allow-list; no server
//! round-trip is involved. "Remember me" decides where the issued token
//! lives: a JSON file under the config dir with restricted permissions
//! (0o600), or only in the process-scoped session context.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::Config;

/// The only accounts that can log in
const ALLOWED_USERS: &[(&str, &str, &str)] = &[("test@example.com", "123456", "John")];

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("failed to access token storage: {0}")]
    Storage(#[from] io::Error),
}

/// An issued session token with its display identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub email: String,
    pub name: String,
}

/// Where an issued token is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    /// Token file under the config dir, survives restarts
    Persistent,
    /// Held only in this process
    Process,
}

/// Process-scoped session context: the persistent file plus an in-memory
/// slot for tokens issued without "remember me".
#[derive(Debug, Default)]
pub struct SessionContext {
    process_token: Option<SessionToken>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check credentials against the allow-list and issue a token into
    /// the requested scope
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        scope: TokenScope,
    ) -> Result<SessionToken, AuthError> {
        let name = check_credentials(email, password).ok_or(AuthError::InvalidCredentials)?;

        let session = SessionToken {
            token: format!("auth-token-{}", uuid::Uuid::new_v4()),
            email: email.to_string(),
            name: name.to_string(),
        };

        match scope {
            TokenScope::Persistent => save_token(&session)?,
            TokenScope::Process => self.process_token = Some(session.clone()),
        }
        Ok(session)
    }

    /// Clear the token from both scopes
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.process_token = None;
        remove_token()?;
        Ok(())
    }

    /// The current session, persistent scope first
    pub fn current(&self) -> Option<SessionToken> {
        load_token().or_else(|| self.process_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}

/// Look up the display name for a matching email/password pair
fn check_credentials(email: &str, password: &str) -> Option<&'static str> {
    ALLOWED_USERS
        .iter()
        .find(|(e, p, _)| *e == email && *p == password)
        .map(|(_, _, name)| *name)
}

fn token_file() -> PathBuf {
    Config::config_dir().join("session.json")
}

fn load_token() -> Option<SessionToken> {
    let path = token_file();
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => serde_json::from_str(&content).ok(),
        Err(_) => None,
    }
}

fn save_token(session: &SessionToken) -> io::Result<()> {
    let dir = Config::config_dir();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        #[cfg(unix)]
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700))?;
    }

    let path = token_file();
    let content = serde_json::to_string_pretty(session)?;
    fs::write(&path, content)?;

    // Owner read/write only
    #[cfg(unix)]
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

fn remove_token() -> io::Result<()> {
    let path = token_file();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
