use crate::api::{ApiClient, ApiError, EnvConfig};
use crate::search::{ScopedSearch, SearchScope};
use crate::session::{Session, SessionSnapshot};
use crate::storage::CredentialStore;
use leptos::prelude::*;

mod folder_view;

pub(crate) use folder_view::{accepts_notes, still_open, FolderView, Preview};

/// Everything the views share, built once in `App` and handed out via context.
///
/// The core objects (`session`, `search`) stay the source of truth; the
/// signals here are mirrors fed by subscriptions so views can track them.
#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,
    pub session: Session,
    pub api: ApiClient,
    pub search: ScopedSearch,

    /// Mirror of `session`, updated on every login/logout.
    pub auth: RwSignal<SessionSnapshot>,

    /// Which list the navbar search box currently edits.
    pub search_scope: RwSignal<SearchScope>,
    pub folder_query: RwSignal<String>,
    pub note_query: RwSignal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_parts(EnvConfig::new(), Session::new(CredentialStore::browser()))
    }

    pub fn with_parts(config: EnvConfig, session: Session) -> Self {
        let api = ApiClient::new(&config.api_url, session.clone());
        let search = ScopedSearch::new();

        let auth = RwSignal::new(session.snapshot());
        session.subscribe(move |snapshot| auth.set(snapshot.clone()));

        let folder_query = RwSignal::new(String::new());
        let note_query = RwSignal::new(String::new());
        search
            .scope(SearchScope::Folders)
            .subscribe(move |q| folder_query.set(q.clone()));
        search
            .scope(SearchScope::Notes)
            .subscribe(move |q| note_query.set(q.clone()));

        Self {
            config,
            session,
            api,
            search,
            auth,
            search_scope: RwSignal::new(SearchScope::default()),
            folder_query,
            note_query,
        }
    }

    pub fn query(&self, scope: SearchScope) -> RwSignal<String> {
        match scope {
            SearchScope::Folders => self.folder_query,
            SearchScope::Notes => self.note_query,
        }
    }

    pub fn set_query(&self, scope: SearchScope, query: String) {
        self.search.scope(scope).set_query(query);
    }

    /// Queries only make sense inside an authenticated view, so they go too.
    pub fn logout(&self) {
        self.session.logout();
        self.search.clear_all();
    }

    /// Log a failed request and apply the configured 401 policy.
    pub fn report_api_error(&self, operation: &str, err: &ApiError) {
        log::warn!("{operation} failed: {err}");
        if self.config.logout_on_unauthorized && matches!(err, ApiError::Unauthorized) {
            log::info!("{operation}: credential rejected, clearing session");
            self.logout();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use crate::storage::MemoryStore;

    fn memory_state(logout_on_unauthorized: bool) -> AppState {
        let mut config = EnvConfig::with_api_url("http://localhost:8080");
        config.logout_on_unauthorized = logout_on_unauthorized;
        AppState::with_parts(config, Session::new(CredentialStore::new(MemoryStore::new())))
    }

    #[test]
    fn test_auth_signal_follows_session() {
        let state = memory_state(false);
        assert!(!state.auth.get_untracked().is_authenticated());

        state.session.login("abc123", "ADMIN").unwrap();
        assert!(state.auth.get_untracked().has_role(&Role::Admin));

        state.logout();
        assert!(!state.auth.get_untracked().is_authenticated());
    }

    #[test]
    fn test_query_signals_follow_their_scope_only() {
        let state = memory_state(false);
        state.set_query(SearchScope::Notes, "lab".to_string());

        assert_eq!(state.query(SearchScope::Notes).get_untracked(), "lab");
        assert_eq!(state.query(SearchScope::Folders).get_untracked(), "");
    }

    #[test]
    fn test_logout_clears_queries() {
        let state = memory_state(false);
        state.session.login("t", "USER").unwrap();
        state.set_query(SearchScope::Folders, "phys".to_string());

        state.logout();
        assert_eq!(state.folder_query.get_untracked(), "");
    }

    #[test]
    fn test_unauthorized_policy_is_opt_in() {
        let state = memory_state(false);
        state.session.login("t", "USER").unwrap();
        state.report_api_error("list folders", &ApiError::Unauthorized);
        assert!(state.session.is_authenticated());

        let state = memory_state(true);
        state.session.login("t", "USER").unwrap();
        state.report_api_error("list folders", &ApiError::Forbidden);
        assert!(state.session.is_authenticated());
        state.report_api_error("list folders", &ApiError::Unauthorized);
        assert!(!state.session.is_authenticated());
        assert!(!state.auth.get_untracked().is_authenticated());
    }
}
