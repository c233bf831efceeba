// ── Auth context ──
//
// Holds the one process-wide credential. Only `login` and `logout` write
// it; the course store and other consumers read the token or subscribe.
// The durable copy lives behind `TokenStore`, which nothing else touches.

use std::fmt;
use std::sync::{Arc, Mutex};

use coursely_api::{CourseClient, UserInfo};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Key the token is persisted under.
pub const TOKEN_KEY: &str = "token";

// ── Durable token storage ────────────────────────────────────────────

/// Durable storage for the session token.
///
/// Implementations are synchronous; a read or write is a small local
/// operation (file, keyring, memory) and never holds the runtime for long.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> Result<Option<SecretString>, CoreError>;

    /// Persist `token`, replacing any previous one.
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;

    /// Remove the persisted token. Removing a missing token is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`, as if a previous run saved it.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<SecretString>>, CoreError> {
        self.token.lock().map_err(|_| CoreError::Storage {
            message: "in-memory token store lock poisoned".into(),
        })
    }
}

impl fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTokenStore").finish_non_exhaustive()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.slot()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot()? = None;
        Ok(())
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Who the token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl From<UserInfo> for Identity {
    fn from(user: UserInfo) -> Self {
        Self {
            name: user.name,
            email: user.email,
        }
    }
}

/// The current credential.
///
/// `identity` is `None` after a token is restored from storage: only the
/// token is persisted, so the identity is unknown until the next login.
#[derive(Clone)]
pub struct Session {
    pub token: SecretString,
    pub identity: Option<Identity>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("identity", &self.identity)
            .finish()
    }
}

// ── AuthContext ──────────────────────────────────────────────────────

struct AuthInner {
    client: CourseClient,
    tokens: Arc<dyn TokenStore>,
    session: watch::Sender<Option<Session>>,
}

/// Process-wide authentication state.
///
/// Cheaply cloneable; every clone shares the same session.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthInner>,
}

impl AuthContext {
    /// Build a context and restore any persisted token.
    ///
    /// A storage read failure is logged and the context starts signed out.
    pub fn new(client: CourseClient, tokens: Arc<dyn TokenStore>) -> Self {
        let restored = match tokens.load() {
            Ok(Some(token)) if !token.expose_secret().is_empty() => {
                debug!("restored session token from storage");
                Some(Session {
                    token,
                    identity: None,
                })
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "failed to restore session token; starting signed out");
                None
            }
        };

        let (session, _) = watch::channel(restored);
        Self {
            inner: Arc::new(AuthInner {
                client,
                tokens,
                session,
            }),
        }
    }

    /// The HTTP gateway this context authenticates against.
    pub fn client(&self) -> &CourseClient {
        &self.inner.client
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Exchange credentials for a session.
    ///
    /// The token is persisted before the session is published. On any
    /// failure (rejected credentials, transport, storage) the previous
    /// session and the stored token are left as they were.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, CoreError> {
        let resp = self
            .inner
            .client
            .login(email, password)
            .await
            .map_err(|e| match e {
                coursely_api::Error::Status { message, .. } => {
                    CoreError::Authentication { message }
                }
                other => CoreError::from(other),
            })?;

        self.inner.tokens.save(&resp.token)?;

        let session = Session {
            token: resp.token,
            identity: resp.user.map(Identity::from),
        };
        self.inner.session.send_replace(Some(session.clone()));
        info!(email, "logged in");
        Ok(session)
    }

    /// Drop the session and its durable copy.
    ///
    /// The in-memory session is always cleared; a storage failure is
    /// returned afterwards.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.inner.session.send_replace(None);
        self.inner.tokens.clear()?;
        info!("logged out");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The current bearer token. Empty tokens read as absent.
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .filter(|s| !s.token.expose_secret().is_empty())
            .map(|s| s.token.clone())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .and_then(|s| s.identity.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Watch login and logout transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("base_url", &self.inner.client.base_url().as_str())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
