//! Login state.
//!
//! A [`Session`] keeps the logged-in flag, username, and login time in a
//! session-scoped [`KeyValueStore`]. Credentials are checked by an
//! [`Authenticator`].

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// Session key set to `"true"` while logged in.
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";

/// Session key holding the logged-in username.
pub const USERNAME_KEY: &str = "username";

/// Session key holding the RFC 3339 login time.
pub const LOGIN_TIME_KEY: &str = "loginTime";

/// Durable key holding the username from the last "remember me" login.
pub const REMEMBERED_USER_KEY: &str = "rememberedUser";

/// Decides whether a username/password pair may log in.
pub trait Authenticator {
    /// Whether the pair is accepted.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Accepts exactly one configured username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAuthenticator {
    username: String,
    password: String,
}

impl StaticAuthenticator {
    /// Accept only `username` with `password`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build from the `[auth]` config section.
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl Default for StaticAuthenticator {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

/// The current login, backed by a session-scoped store.
#[derive(Debug)]
pub struct Session<S> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Wrap a session-scoped store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check credentials and start a session.
    ///
    /// Empty fields are rejected before the authenticator is consulted. When
    /// `remember` is given the username is also written there under
    /// [`REMEMBERED_USER_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] for an empty field,
    /// [`Error::InvalidCredentials`] when the authenticator rejects the pair,
    /// or a storage error.
    pub fn login(
        &mut self,
        authenticator: &dyn Authenticator,
        username: &str,
        password: &str,
        remember: Option<&mut dyn KeyValueStore>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if username.is_empty() {
            return Err(Error::MissingCredential { field: "username" });
        }
        if password.is_empty() {
            return Err(Error::MissingCredential { field: "password" });
        }
        if !authenticator.verify(username, password) {
            debug!("Rejected login for {}", username);
            return Err(Error::InvalidCredentials);
        }

        if let Some(local) = remember {
            local.set(REMEMBERED_USER_KEY, username)?;
        }

        self.store.set(IS_LOGGED_IN_KEY, "true")?;
        self.store.set(USERNAME_KEY, username)?;
        self.store.set(
            LOGIN_TIME_KEY,
            &now.to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;

        info!("Logged in as {}", username);
        Ok(())
    }

    /// End the session by removing every session key.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn logout(&mut self) -> Result<()> {
        for key in [IS_LOGGED_IN_KEY, USERNAME_KEY, LOGIN_TIME_KEY] {
            self.store.remove(key)?;
        }
        info!("Logged out");
        Ok(())
    }

    /// Whether a session is active.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.store.get(IS_LOGGED_IN_KEY)?.as_deref() == Some("true"))
    }

    /// Fail unless a session is active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when logged out.
    pub fn require_auth(&self) -> Result<()> {
        if self.is_authenticated()? {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    /// The logged-in username.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn username(&self) -> Result<Option<String>> {
        self.store.get(USERNAME_KEY)
    }

    /// When the session started. An unparsable value reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn login_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .store
            .get(LOGIN_TIME_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

/// Username saved by the last "remember me" login.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn remembered_user(local: &impl KeyValueStore) -> Result<Option<String>> {
    local.get(REMEMBERED_USER_KEY)
}
