//! Session state: the in-memory, observable view of the persisted credential.
//!
//! `Session` is the only writer of the [`CredentialStore`]. Everything else
//! (route guard, request dispatcher, views) reads [`SessionSnapshot`]s.

use crate::observable::{Observable, SubscriptionId};
use crate::storage::{Credential, CredentialStore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tag issued by the backend. Compared by set membership only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    User,
    Other(String),
}

impl Role {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ADMIN" => Self::Admin,
            "USER" => Self::User,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_tag().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Authenticated {
    token: String,
    role: Role,
}

/// Immutable view of the session at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    auth: Option<Authenticated>,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.token.as_str())
    }

    pub fn role(&self) -> Option<&Role> {
        self.auth.as_ref().map(|a| &a.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.role() == Some(role)
    }
}

impl From<Credential> for SessionSnapshot {
    fn from(credential: Credential) -> Self {
        Self {
            auth: credential.into_parts().map(|(token, role)| Authenticated {
                token,
                role: Role::from_tag(&role),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot log in with an empty token")]
    EmptyToken,
}

#[derive(Clone)]
pub struct Session {
    store: CredentialStore,
    state: Observable<SessionSnapshot>,
}

impl Session {
    /// Load whatever credential the store currently holds.
    pub fn new(store: CredentialStore) -> Self {
        let initial = SessionSnapshot::from(store.read());
        Self {
            store,
            state: Observable::new(initial),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.get()
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token().map(str::to_string))
    }

    pub fn role(&self) -> Option<Role> {
        self.state.with(|s| s.role().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(SessionSnapshot::is_authenticated)
    }

    /// Persist a freshly issued credential and notify subscribers.
    ///
    /// A storage failure is logged but does not block the in-memory login;
    /// the session simply won't survive a reload.
    pub fn login(&self, token: &str, role: &str) -> Result<(), SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        if let Err(e) = self.store.save(token, role) {
            log::warn!("session: credential not persisted: {e}");
        }

        let snapshot = SessionSnapshot::from(Credential::new(token, role));
        log::info!(
            "session: logged in (role={})",
            snapshot.role().map(Role::as_tag).unwrap_or_default()
        );
        self.state.replace(snapshot);
        Ok(())
    }

    /// Clear the credential. Calling this while logged out does nothing.
    pub fn logout(&self) {
        if !self.is_authenticated() {
            return;
        }

        if let Err(e) = self.store.clear() {
            log::warn!("session: credential not cleared from storage: {e}");
        }
        log::info!("session: logged out");
        self.state.replace(SessionSnapshot::anonymous());
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&SessionSnapshot) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::UnavailableStore;
    use crate::storage::MemoryStore;
    use std::sync::{Arc, Mutex};

    fn memory_session() -> (Session, CredentialStore) {
        let store = CredentialStore::new(MemoryStore::new());
        (Session::new(store.clone()), store)
    }

    #[test]
    fn test_role_tags_roundtrip() {
        assert_eq!(Role::from_tag("ADMIN"), Role::Admin);
        assert_eq!(Role::from_tag("USER"), Role::User);
        assert_eq!(Role::from_tag("MODERATOR"), Role::Other("MODERATOR".into()));
        assert_eq!(Role::Other("MODERATOR".into()).as_tag(), "MODERATOR");
        // Tags are case-sensitive opaque strings.
        assert_eq!(Role::from_tag("admin"), Role::Other("admin".into()));
    }

    #[test]
    fn test_role_serde_uses_plain_tag() {
        let v = serde_json::to_value(Role::Admin).expect("serialize");
        assert_eq!(v, serde_json::json!("ADMIN"));
        let r: Role = serde_json::from_str("\"USER\"").expect("deserialize");
        assert_eq!(r, Role::User);
    }

    #[test]
    fn test_new_session_loads_persisted_credential() {
        let store = CredentialStore::new(MemoryStore::new());
        store.save("persisted", "USER").unwrap();

        let session = Session::new(store);
        assert_eq!(session.token().as_deref(), Some("persisted"));
        assert_eq!(session.role(), Some(Role::User));
    }

    #[test]
    fn test_login_persists_and_read_returns_exact_pair() {
        let (session, store) = memory_session();
        session.login("abc123", "ADMIN").expect("login");

        assert_eq!(store.read(), Credential::new("abc123", "ADMIN"));
        assert!(session.is_authenticated());
        assert_eq!(session.snapshot().token(), Some("abc123"));
        assert!(session.snapshot().has_role(&Role::Admin));
    }

    #[test]
    fn test_logout_clears_store() {
        let (session, store) = memory_session();
        session.login("abc123", "ADMIN").unwrap();
        session.logout();

        assert_eq!(store.read(), Credential::absent());
        assert_eq!(session.snapshot(), SessionSnapshot::anonymous());
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let (session, store) = memory_session();
        assert_eq!(session.login("", "ADMIN"), Err(SessionError::EmptyToken));
        assert!(!session.is_authenticated());
        assert!(!store.read().is_present());
    }

    #[test]
    fn test_subscribers_notified_on_login_and_logout() {
        let (session, _) = memory_session();
        let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(vec![]));

        let sink = Arc::clone(&seen);
        session.subscribe(move |s| sink.lock().unwrap().push(s.is_authenticated()));

        session.login("t", "USER").unwrap();
        session.logout();

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_logout_when_logged_out_is_silent_noop() {
        let (session, _) = memory_session();
        let hits = Arc::new(Mutex::new(0));

        let sink = Arc::clone(&hits);
        session.subscribe(move |_| *sink.lock().unwrap() += 1);

        session.logout();
        session.logout();
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn test_no_half_credential_observable_across_sequences() {
        let (session, store) = memory_session();
        let observed_half = Arc::new(Mutex::new(false));

        let sink = Arc::clone(&observed_half);
        session.subscribe(move |s| {
            if s.token().is_some() != s.role().is_some() {
                *sink.lock().unwrap() = true;
            }
        });

        let steps: [Option<(&str, &str)>; 6] = [
            Some(("a", "USER")),
            None,
            None,
            Some(("b", "ADMIN")),
            Some(("c", "USER")),
            None,
        ];
        for step in steps {
            match step {
                Some((t, r)) => session.login(t, r).unwrap(),
                None => session.logout(),
            }
            let c = store.read();
            assert_eq!(c.token().is_some(), c.role().is_some());
            let s = session.snapshot();
            assert_eq!(s.token().is_some(), s.role().is_some());
        }

        assert!(!*observed_half.lock().unwrap());
    }

    #[test]
    fn test_login_still_applies_in_memory_when_storage_is_unavailable() {
        let session = Session::new(CredentialStore::new(UnavailableStore));
        assert!(!session.is_authenticated());

        session.login("t", "USER").expect("login");
        assert!(session.is_authenticated());

        session.logout();
        assert!(!session.is_authenticated());
    }
}
