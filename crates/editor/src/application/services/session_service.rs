//! Session Service - local session persistence.
//!
//! Reads and writes the `user`/`token` pair behind the `StorageProvider`
//! port: read once at startup, written on login. A malformed stored user
//! parses to `None` rather than failing startup.

use crate::ports::outbound::{storage_keys, StorageProvider};
use crate::session_types::{AuthToken, Session, SessionUser};

#[derive(Clone)]
pub struct SessionService<S: StorageProvider> {
    storage: S,
}

impl<S: StorageProvider> SessionService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load whatever session local storage holds.
    pub fn load(&self) -> Session {
        let user = self
            .storage
            .load(storage_keys::USER)
            .and_then(|raw| match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(error) => {
                    tracing::warn!(%error, "stored user is malformed; ignoring it");
                    None
                }
            });
        let token = self.storage.load(storage_keys::TOKEN).map(AuthToken::new);
        Session { user, token }
    }

    pub fn set_user(&self, user: &SessionUser) {
        match serde_json::to_string(user) {
            Ok(raw) => self.storage.save(storage_keys::USER, &raw),
            Err(error) => tracing::error!(%error, "could not serialize the session user"),
        }
    }

    pub fn set_token(&self, token: &AuthToken) {
        self.storage.save(storage_keys::TOKEN, token.as_str());
    }

    /// Forget the stored session.
    pub fn clear(&self) {
        self.storage.remove(storage_keys::USER);
        self.storage.remove(storage_keys::TOKEN);
    }
}
