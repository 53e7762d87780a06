//! Query state and substring filtering for the folder and note lists.

use crate::models::{Folder, Note};
use crate::observable::{Observable, SubscriptionId};

/// Entities that can be narrowed by a search query.
pub trait Searchable {
    /// The field the query is matched against.
    fn search_text(&self) -> &str;
}

impl Searchable for Folder {
    fn search_text(&self) -> &str {
        &self.name
    }
}

impl Searchable for Note {
    fn search_text(&self) -> &str {
        &self.title
    }
}

/// Order-preserving, case-insensitive containment filter. An empty query keeps everything.
pub fn filter_by_query<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.search_text().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct SearchState {
    query: Observable<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: Observable::new(String::new()),
        }
    }

    pub fn query(&self) -> String {
        self.query.get()
    }

    /// Stored verbatim: no trimming or case folding.
    pub fn set_query(&self, query: impl Into<String>) {
        self.query.replace(query.into());
    }

    pub fn clear(&self) {
        if !self.query.with(String::is_empty) {
            self.query.replace(String::new());
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&String) + Send + Sync + 'static) -> SubscriptionId {
        self.query.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.query.unsubscribe(id)
    }
}

/// Which list view a query belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum SearchScope {
    #[default]
    Folders,
    Notes,
}

impl SearchScope {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Folders => "Search folders...",
            Self::Notes => "Search notes...",
        }
    }
}

/// One independent query per list view.
#[derive(Clone, Default)]
pub struct ScopedSearch {
    folders: SearchState,
    notes: SearchState,
}

impl ScopedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self, scope: SearchScope) -> &SearchState {
        match scope {
            SearchScope::Folders => &self.folders,
            SearchScope::Notes => &self.notes,
        }
    }

    pub fn clear_all(&self) {
        self.folders.clear();
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn folder(id: &str, name: &str) -> Folder {
        Folder {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            file_url: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let folders = vec![folder("1", "Physics"), folder("2", "Maths"), folder("3", "PHYSICAL ed")];
        let hits = filter_by_query(&folders, "pHyS");
        let ids: Vec<_> = hits.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_empty_query_returns_collection_unchanged() {
        let notes = vec![note("b", "Zeta"), note("a", "Alpha"), note("c", "Mid")];
        assert_eq!(filter_by_query(&notes, ""), notes);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let notes = vec![note("1", "Lecture 1"), note("2", "Lab"), note("3", "lecture 2")];
        let once = filter_by_query(&notes, "LECT");
        let twice = filter_by_query(&once, "LECT");
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_query_is_not_trimmed() {
        let folders = vec![folder("1", "Data Structures"), folder("2", "Databases")];
        let hits = filter_by_query(&folders, "data ");
        assert_eq!(hits, vec![folder("1", "Data Structures")]);
    }

    #[test]
    fn test_filter_drops_non_matching() {
        let folders = vec![folder("1", "Operating Systems"), folder("2", "Networks")];
        assert_eq!(filter_by_query(&folders, "systems"), vec![folder("1", "Operating Systems")]);
        assert!(filter_by_query(&folders, "compilers").is_empty());
    }

    #[test]
    fn test_search_state_notifies_verbatim_query() {
        let state = SearchState::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&seen);
        state.subscribe(move |q| sink.lock().unwrap().push(q.clone()));

        state.set_query(" Lab");
        assert_eq!(state.query(), " Lab");
        assert_eq!(*seen.lock().unwrap(), vec![" Lab".to_string()]);

        let notes = vec![note("1", "Physics Lab"), note("2", "Lab")];
        assert_eq!(filter_by_query(&notes, &state.query()), vec![note("1", "Physics Lab")]);
    }

    #[test]
    fn test_clear_only_notifies_when_non_empty() {
        let state = SearchState::new();
        let hits = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&hits);
        state.subscribe(move |_| *sink.lock().unwrap() += 1);

        state.clear();
        state.set_query("x");
        state.clear();
        assert_eq!(*hits.lock().unwrap(), 2);
        assert_eq!(state.query(), "");
    }

    #[test]
    fn test_scopes_do_not_share_queries() {
        let search = ScopedSearch::new();
        search.scope(SearchScope::Folders).set_query("phys");

        assert_eq!(search.scope(SearchScope::Folders).query(), "phys");
        assert_eq!(search.scope(SearchScope::Notes).query(), "");

        search.clear_all();
        assert_eq!(search.scope(SearchScope::Folders).query(), "");
    }
}
