//! Identity Resolver
//!
//! Decides, per action, whether the caller is a logged-in user or an
//! anonymous visitor. Anonymous visitors get a random identifier that is
//! generated once per profile and then reused forever.

use crate::secure_string::SecureString;
use crate::session::SessionStore;
use crate::storage::{SharedStore, ANONYMOUS_ID_KEY};
use tracing::{debug, warn};
use uuid::Uuid;


/// Who is making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    /// Caller holds a session token
    Authenticated {
        /// Bearer token sent as `Authorization`
        token: SecureString,
    },
    /// Caller has no session
    Anonymous {
        /// Per-profile identifier sent as `X-Anonymous-Id`
        anonymous_id: String,
    },
}

impl CallerIdentity {
    /// `true` for anonymous callers
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, CallerIdentity::Anonymous { .. })
    }

    /// Short label for logs
    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            CallerIdentity::Authenticated { .. } => "authenticated",
            CallerIdentity::Anonymous { .. } => "anonymous",
        }
    }
}

/// Resolves the caller identity from the profile store
#[derive(Clone)]
pub struct IdentityResolver {
    store: SharedStore,
    session: SessionStore,
}

impl IdentityResolver {
    /// Create a resolver over a profile store
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            session: SessionStore::new(store.clone()),
            store,
        }
    }

    /// Resolve the current caller
    ///
    /// Never fails. A stored, non-blank token wins; otherwise the anonymous
    /// identifier is returned, creating it on first use.
    #[must_use]
    pub fn resolve(&self) -> CallerIdentity {
        match self.session.token() {
            Ok(Some(token)) => return CallerIdentity::Authenticated { token },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read session token, treating caller as anonymous"),
        }

        CallerIdentity::Anonymous {
            anonymous_id: self.anonymous_id(),
        }
    }

    /// Read or lazily create the anonymous identifier
    ///
    /// If storage is unavailable a fresh identifier is returned that lives
    /// only for this call.
    #[must_use]
    pub fn anonymous_id(&self) -> String {
        match self.store.get(ANONYMOUS_ID_KEY) {
            Ok(Some(id)) if !id.trim().is_empty() => id,
            Ok(_) => {
                let id = generate_anonymous_id();
                match self.store.set(ANONYMOUS_ID_KEY, &id) {
                    Ok(()) => debug!("Generated anonymous identifier"),
                    Err(e) => {
                        warn!(error = %e, "Failed to persist anonymous identifier, using it for this call only")
                    }
                }
                id
            }
            Err(e) => {
                warn!(error = %e, "Failed to read anonymous identifier, using a temporary one");
                generate_anonymous_id()
            }
        }
    }
}

fn generate_anonymous_id() -> String {
    Uuid::new_v4().to_string()
}
