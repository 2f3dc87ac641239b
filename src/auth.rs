//! Session state held by the [`crate::api::Client`].
//!
//! A session is the triple returned by wallet authentication: the bearer token, the
//! server-side user id, and the wallet address the user connected with. The three fields
//! are written and cleared together, and mirrored into a [`SessionStore`] under
//! `{prefix}_token`, `{prefix}_user_id` and `{prefix}_wallet_address`.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::Result;
use crate::storage::SessionStore;

/// Default namespace for the persisted session keys.
pub const DEFAULT_STORAGE_PREFIX: &str = "betting";

/// Snapshot of the client's authentication state.
///
/// Any field may be `None`. The client never produces a partial session itself, but one
/// can be loaded from a store that was edited externally.
#[derive(Clone, Default)]
pub struct Session {
    pub(crate) token: Option<SecretString>,
    pub(crate) user_id: Option<String>,
    pub(crate) wallet_address: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

impl Session {
    #[must_use]
    pub fn new(token: String, user_id: String, wallet_address: String) -> Self {
        Self {
            token: Some(SecretString::from(token)),
            user_id: Some(user_id),
            wallet_address: Some(wallet_address),
        }
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    /// Whether a token is held. Only the token gates authenticated calls.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// The three storage keys for one namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionKeys {
    pub(crate) token: String,
    pub(crate) user_id: String,
    pub(crate) wallet_address: String,
}

impl SessionKeys {
    pub(crate) fn new(prefix: &str) -> Self {
        Self {
            token: format!("{prefix}_token"),
            user_id: format!("{prefix}_user_id"),
            wallet_address: format!("{prefix}_wallet_address"),
        }
    }

    /// Reads whatever is persisted; absent keys become `None`.
    pub(crate) fn load<S: SessionStore + ?Sized>(&self, store: &S) -> Result<Session> {
        Ok(Session {
            token: store.get(&self.token)?.map(SecretString::from),
            user_id: store.get(&self.user_id)?,
            wallet_address: store.get(&self.wallet_address)?,
        })
    }

    /// Writes all three keys as one batch, removing those the session lacks. On failure the
    /// store keeps the previous session.
    pub(crate) fn persist<S: SessionStore + ?Sized>(
        &self,
        store: &S,
        session: &Session,
    ) -> Result<()> {
        store.apply(&[
            (
                self.token.as_str(),
                session.token.as_ref().map(ExposeSecret::expose_secret),
            ),
            (self.user_id.as_str(), session.user_id.as_deref()),
            (
                self.wallet_address.as_str(),
                session.wallet_address.as_deref(),
            ),
        ])
    }
}
