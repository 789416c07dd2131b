//! Account registry and its file persistence
//!
//! This module keeps every known account in memory, together with the set of
//! usernames that are currently logged in:
//! - Login either admits an existing account, creates a new one, or refuses a
//!   username that is already logged in
//! - Saved game state lives in memory only; lifetime wins are persisted
//! - The accounts file holds one `username,wins` line per account
//!
//! The store is not synchronized itself. The server wraps it in a mutex so
//! each check-then-act sequence runs under one lock.

use log::{info, warn};
use shared::{LoginOutcome, UserData};
use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("accounts file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// All accounts known to the server
#[derive(Debug)]
pub struct AccountStore {
    /// Where accounts are persisted
    path: PathBuf,
    /// Accounts indexed by username
    users: HashMap<String, UserData>,
    /// Usernames with an active session
    logged_in: HashSet<String>,
}

impl AccountStore {
    /// Opens the accounts file at `path`
    ///
    /// A missing file is an empty registry. Lines that are not
    /// `username,wins` are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut users = HashMap::new();
        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_account_line(line) {
                Some(user) => {
                    users.insert(user.username.clone(), user);
                }
                None => warn!("Skipping malformed line {} in {}: {:?}", number + 1, path.display(), line),
            }
        }
        info!("Loaded {} accounts from {}", users.len(), path.display());

        Ok(Self {
            path,
            users,
            logged_in: HashSet::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn is_logged_in(&self, username: &str) -> bool {
        self.logged_in.contains(username.trim())
    }

    /// Marks `username` as logged in, creating the account when it is new
    ///
    /// Refuses with [`LoginOutcome::Duplicate`] while the username already
    /// has an active session.
    pub fn login(&mut self, username: &str) -> Result<LoginOutcome, StoreError> {
        let username = username.trim();
        if self.logged_in.contains(username) {
            return Ok(LoginOutcome::Duplicate);
        }

        let outcome = if self.users.contains_key(username) {
            LoginOutcome::Existing
        } else {
            let user = UserData::new(username, 0);
            self.append(&user)?;
            self.users.insert(username.to_string(), user);
            info!("Created account {}", username);
            LoginOutcome::Created
        };

        self.logged_in.insert(username.to_string());
        Ok(outcome)
    }

    /// Ends the session of `username`. Returns false when it had none.
    pub fn logout(&mut self, username: &str) -> Result<bool, StoreError> {
        if !self.logged_in.remove(username.trim()) {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn load(&self, username: &str) -> Option<UserData> {
        self.users.get(username.trim()).cloned()
    }

    /// Replaces the stored data of an existing account. Returns false when
    /// the account does not exist.
    pub fn save(&mut self, user: UserData) -> Result<bool, StoreError> {
        let Some(stored) = self.users.get_mut(&user.username) else {
            return Ok(false);
        };
        let wins_changed = stored.lifetime_wins != user.lifetime_wins;
        *stored = user;

        if wins_changed {
            self.flush()?;
        }
        Ok(true)
    }

    /// Rewrites the accounts file from memory
    pub fn flush(&self) -> Result<(), StoreError> {
        let mut names: Vec<&String> = self.users.keys().collect();
        names.sort();

        let mut text = String::new();
        for name in names {
            text.push_str(&account_line(&self.users[name]));
            text.push('\n');
        }
        fs::write(&self.path, text).map_err(|source| self.io_error(source))
    }

    fn append(&self, user: &UserData) -> Result<(), StoreError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", account_line(user)))
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn account_line(user: &UserData) -> String {
    format!("{},{}", user.username, user.lifetime_wins)
}

/// Splits on the last comma, since usernames may contain commas.
fn parse_account_line(line: &str) -> Option<UserData> {
    let (username, wins) = line.rsplit_once(',')?;
    let username = username.trim();
    if username.is_empty() {
        return None;
    }
    let wins = wins.trim().parse().ok()?;
    Some(UserData::new(username, wins))
}
