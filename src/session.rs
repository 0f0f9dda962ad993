//! Mock login session.
//!
//! There is no real authentication: logging in stores a user name and a
//! random token. The browser build keeps the session in `localStorage` so it
//! survives reloads; native builds keep it in memory.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<String>,
    pub token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A fresh session for `user` with a random token.
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            user: Some(user.into()),
            token: Some(Uuid::new_v4().simple().to_string()),
        }
    }

    /// Authenticated and carrying a token.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated && self.token.is_some()
    }
}

/// Where the current session lives.
#[derive(Debug, Default)]
pub struct SessionStore {
    cached: RefCell<Option<Session>>,
}

impl SessionStore {
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "agrimap-session";

    pub fn new() -> Self {
        Self::default()
    }

    /// The stored session, or an anonymous one.
    pub fn current(&self) -> Session {
        if let Some(session) = self.cached.borrow().as_ref() {
            return session.clone();
        }
        let session = self.read().unwrap_or_default();
        *self.cached.borrow_mut() = Some(session.clone());
        session
    }

    pub fn login(&self, user: &str) -> Result<Session, ConfigError> {
        let session = Session::for_user(user);
        self.write(&session)?;
        log::info!("Logged in as {}", user);
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ConfigError> {
        self.write(&Session::anonymous())?;
        log::info!("Logged out");
        Ok(())
    }

    fn write(&self, session: &Session) -> Result<(), ConfigError> {
        #[cfg(target_arch = "wasm32")]
        {
            let json = serde_json::to_string(session)?;
            crate::config::local_storage()?
                .set_item(Self::LOCALSTORAGE_KEY, &json)
                .map_err(|e| {
                    ConfigError::StorageError(format!("Failed to save session: {:?}", e))
                })?;
        }
        *self.cached.borrow_mut() = Some(session.clone());
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn read(&self) -> Option<Session> {
        let storage = crate::config::local_storage().ok()?;
        let json = storage.get_item(Self::LOCALSTORAGE_KEY).ok()??;
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Discarding unreadable session: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read(&self) -> Option<Session> {
        None
    }
}
