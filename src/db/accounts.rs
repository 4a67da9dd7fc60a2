//! Local identity provider backed by SQLite.
//!
//! Passwords are stored as salted SHA-256 digests. The signed-in user is kept
//! in a small JSON session file next to the database so the CLI stays signed
//! in between runs.
//!
//! ## Usage
//!
//! ```rust
//! use gigtask::api::IdentityProvider;
//! use gigtask::db::accounts::Accounts;
//!
//! let dir = tempfile::tempdir()?;
//! let accounts = Accounts::in_memory(dir.path().join("session.json"))?;
//! let user = accounts.sign_up("ann@example.com", "secret1")?;
//! assert_eq!(accounts.current_user(), Some(user));
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::db::Db;
use crate::api::identity::{AuthError, AuthStateCallback, IdentityProvider, User};
use crate::api::subscription::{Subscribers, Subscription};
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use chrono::Local;
use parking_lot::{Mutex, ReentrantMutex};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";
pub const MIN_PASSWORD_LENGTH: usize = 6;

const SELECT_ACCOUNT: &str = "SELECT id, email, display_name, password_salt, password_hash FROM accounts WHERE email = ?1";

struct AccountRow {
    user: User,
    salt: String,
    hash: String,
}

pub struct Accounts {
    conn: Mutex<Connection>,
    session_path: PathBuf,
    current: Mutex<Option<User>>,
    // Held across a state change and its notification so listeners see changes in order.
    publish: ReentrantMutex<()>,
    auth_state: Subscribers<Option<User>>,
}

impl Accounts {
    /// Opens the accounts store in the configured database and restores the session.
    pub fn new() -> Result<Accounts> {
        let session_path = DataStorage::new().get_path(SESSION_FILE_NAME)?;
        Ok(Self::from_db(Db::new()?, session_path))
    }

    pub fn open<P: AsRef<Path>>(path: P, session_path: impl Into<PathBuf>) -> Result<Accounts> {
        Ok(Self::from_db(Db::open(path)?, session_path.into()))
    }

    pub fn in_memory(session_path: impl Into<PathBuf>) -> Result<Accounts> {
        Ok(Self::from_db(Db::in_memory()?, session_path.into()))
    }

    fn from_db(db: Db, session_path: PathBuf) -> Accounts {
        let current = read_session(&session_path);
        Accounts {
            conn: Mutex::new(db.conn),
            session_path,
            current: Mutex::new(current),
            publish: ReentrantMutex::new(()),
            auth_state: Subscribers::new(),
        }
    }

    fn find_account(&self, email: &str) -> Result<Option<AccountRow>, AuthError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(SELECT_ACCOUNT, params![email], |row| {
                Ok(AccountRow {
                    user: User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        display_name: row.get(2)?,
                    },
                    salt: row.get(3)?,
                    hash: row.get(4)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    /// Persists the new state and tells every listener about it.
    fn set_current(&self, user: Option<User>) -> Result<(), AuthError> {
        let _publishing = self.publish.lock();
        match &user {
            Some(user) => {
                let json = serde_json::to_string_pretty(user).map_err(|e| AuthError::Backend(e.to_string()))?;
                fs::write(&self.session_path, json)?;
            }
            None => {
                if self.session_path.exists() {
                    fs::remove_file(&self.session_path)?;
                }
            }
        }

        *self.current.lock() = user.clone();
        self.auth_state.notify(&user);
        Ok(())
    }
}

fn read_session(path: &Path) -> Option<User> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
            None
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0]);
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl IdentityProvider for Accounts {
    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        if self.find_account(&email)?.is_some() {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            display_name: None,
        };
        let salt = uuid::Uuid::new_v4().simple().to_string();
        {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT INTO accounts (id, email, display_name, password_salt, password_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![user.id, user.email, user.display_name, salt, password_digest(&salt, password), Local::now()],
            )?;
        }
        tracing::info!(user_id = %user.id, "account created");

        self.set_current(Some(user.clone()))?;
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        let account = self.find_account(&email)?.ok_or(AuthError::UserNotFound)?;
        if password_digest(&account.salt, password) != account.hash {
            tracing::warn!(user_id = %account.user.id, "rejected sign-in with wrong password");
            return Err(AuthError::WrongPassword);
        }

        self.set_current(Some(account.user.clone()))?;
        Ok(account.user)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None)
    }

    fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        let account = self.find_account(&email)?.ok_or(AuthError::UserNotFound)?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO password_resets (account_id, requested_at) VALUES (?1, ?2)",
            params![account.user.id, Local::now()],
        )?;
        tracing::info!(user_id = %account.user.id, "password reset requested");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.lock().clone()
    }

    fn on_auth_state_changed(&self, callback: AuthStateCallback) -> Subscription {
        let _publishing = self.publish.lock();
        self.auth_state
            .subscribe_with(|| Ok::<_, Infallible>(self.current_user()), callback)
            .unwrap_or_else(|never| match never {})
    }
}
