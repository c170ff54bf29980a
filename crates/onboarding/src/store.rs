//! Key-value persistence for the onboarding session.
//!
//! The store only moves opaque strings; [`load_session`], [`persist_session`]
//! and [`clear_session`] are the boundary where JSON meets the session type.

use {async_trait::async_trait, tracing::warn};

use crate::{Result, session::OnboardingSession};

/// Single-value-per-key storage. Writes overwrite, there is no partial write.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>>;
    async fn write(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Restore the session stored under `key`.
///
/// Never fails: an absent entry, an unreadable store or a corrupt blob all
/// yield the default session (step 1, no answers).
pub async fn load_session(store: &dyn SessionStore, key: &str) -> OnboardingSession {
    let raw = match store.read(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return OnboardingSession::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read onboarding session, starting over");
            return OnboardingSession::default();
        },
    };
    match serde_json::from_str(&raw) {
        Ok(session) => session,
        Err(e) => {
            warn!(key, error = %e, "failed to parse saved onboarding session, starting over");
            OnboardingSession::default()
        },
    }
}

/// Overwrite the entry under `key` with `session`.
pub async fn persist_session(
    store: &dyn SessionStore,
    key: &str,
    session: &OnboardingSession,
) -> Result<()> {
    let json = serde_json::to_string(session)?;
    store.write(key, &json).await
}

/// Remove the entry under `key`.
pub async fn clear_session(store: &dyn SessionStore, key: &str) -> Result<()> {
    store.remove(key).await
}
