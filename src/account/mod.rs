//! Registration, login and the profile of the local user. Accounts are stored under the email
//! itself, the active session under [SESSION_KEY]. Passwords are kept as entered, matching the
//! records already present on devices.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{habits::repository::HABIT_KEY_PREFIX, storage::kv_store::KeyValueStore};

pub const SESSION_KEY: &str = "currentUserEmail";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("email '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("user '{0}' not found")]
    UnknownUser(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("nobody is logged in")]
    NotLoggedIn,
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

/// Stored value of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CredentialEntity {
    #[serde(default)]
    name: String,
    password: String,
}

impl CredentialEntity {
    /// Early records hold the bare password instead of a JSON object.
    fn decode(value: &str) -> Self {
        serde_json::from_str(value).unwrap_or_else(|_| CredentialEntity {
            name: String::new(),
            password: value.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub name: String,
}

pub struct AccountService<S: KeyValueStore> {
    store: S,
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AccountError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AccountError::Validation(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

/// Keys owned by other parts of the store. They never hold an account.
fn is_reserved_key(key: &str) -> bool {
    key.starts_with(HABIT_KEY_PREFIX) || key == SESSION_KEY
}

fn validate_email(email: &str) -> Result<&str, AccountError> {
    let email = required(email, "email")?;
    if !email.contains('@') || is_reserved_key(email) {
        return Err(AccountError::Validation(format!("'{email}' is not a valid email")));
    }
    Ok(email)
}

impl<S: KeyValueStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<(), AccountError> {
        let email = validate_email(email)?;
        let name = required(name, "name")?;
        if password.is_empty() {
            return Err(AccountError::Validation("password is required".into()));
        }

        if self.store.get(email).await?.is_some() {
            return Err(AccountError::AlreadyRegistered(email.to_owned()));
        }

        self.save(
            email,
            &CredentialEntity {
                name: name.to_owned(),
                password: password.to_owned(),
            },
        )
        .await?;
        info!("Registered {email}");
        Ok(())
    }

    /// Checks the credentials and remembers `email` as the active user.
    pub async fn login(&self, email: &str, password: &str) -> Result<Profile, AccountError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(AccountError::Validation("password is required".into()));
        }

        let credentials = self.load(email).await?;
        if credentials.password != password {
            warn!("Rejected login for {email}");
            return Err(AccountError::InvalidCredentials);
        }

        self.store.set(SESSION_KEY, email.to_owned()).await?;
        info!("Logged in {email}");
        Ok(Profile {
            email: email.to_owned(),
            name: credentials.name,
        })
    }

    /// Forgets the active user. Does nothing when nobody is logged in.
    pub async fn logout(&self) -> Result<(), AccountError> {
        self.store.remove(SESSION_KEY).await?;
        Ok(())
    }

    pub async fn current_profile(&self) -> Result<Profile, AccountError> {
        let email = self.current_email().await?;
        let credentials = self.load(&email).await?;
        Ok(Profile {
            email,
            name: credentials.name,
        })
    }

    pub async fn update_profile_name(&self, name: &str) -> Result<Profile, AccountError> {
        let name = required(name, "name")?;
        let email = self.current_email().await?;
        let mut credentials = self.load(&email).await?;
        credentials.name = name.to_owned();
        self.save(&email, &credentials).await?;
        Ok(Profile {
            email,
            name: credentials.name,
        })
    }

    async fn current_email(&self) -> Result<String, AccountError> {
        self.store
            .get(SESSION_KEY)
            .await?
            .ok_or(AccountError::NotLoggedIn)
    }

    async fn load(&self, email: &str) -> Result<CredentialEntity, AccountError> {
        if is_reserved_key(email) {
            return Err(AccountError::UnknownUser(email.to_owned()));
        }
        match self.store.get(email).await? {
            Some(value) => Ok(CredentialEntity::decode(&value)),
            None => Err(AccountError::UnknownUser(email.to_owned())),
        }
    }

    async fn save(&self, email: &str, credentials: &CredentialEntity) -> Result<(), AccountError> {
        let value = serde_json::to_string(credentials).map_err(anyhow::Error::from)?;
        self.store.set(email, value).await?;
        Ok(())
    }
}
