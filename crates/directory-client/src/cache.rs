//! Client-side cache of list envelopes and user details.
//!
//! Keys are structurally compared values, never reference identities: a
//! [`ListKey`] built from equal parameters hits the same entry regardless
//! of where it was constructed. Subscribers observe changes through an
//! explicit broadcast channel rather than shared mutable state.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use directory_model::{Role, User, UserId};
use pagination::{Page, PageRequest};

/// Value-equality key identifying one cached list result.
///
/// Holds the normalised query tuple: the search term is trimmed and blank
/// terms collapse to `None`, so keys compare independent of incidental
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    search: Option<String>,
    role: Option<Role>,
    page: u32,
    limit: u32,
}

impl ListKey {
    /// Build a key from query parameters, normalising the search term.
    pub fn new(search: Option<&str>, role: Option<Role>, page: PageRequest) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_owned);
        Self {
            search,
            role,
            page: page.page(),
            limit: page.limit(),
        }
    }

    /// Normalised search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Role condition, if any.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Requested page, 1-based.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

/// Key addressing one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// A list fetch for the given query key.
    List(ListKey),
    /// A detail fetch for the given user.
    Detail(UserId),
}

/// Change notification delivered to cache subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The envelope for a list key was replaced.
    ListUpdated(ListKey),
    /// The detail entry for a user was replaced.
    DetailUpdated(UserId),
    /// A list key needs a background refresh.
    ListStale(ListKey),
}

#[derive(Default)]
struct CacheState {
    lists: HashMap<ListKey, Page<User>>,
    details: HashMap<UserId, User>,
    stale_lists: HashSet<ListKey>,
    inflight: HashMap<FetchKey, CancellationToken>,
}

/// In-memory cache with change notification and an in-flight registry.
pub struct DirectoryCache {
    state: Mutex<CacheState>,
    events: broadcast::Sender<CacheEvent>,
}

const EVENT_CHANNEL_CAPACITY: usize = 64;

impl Default for DirectoryCache {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(CacheState::default()),
            events,
        }
    }
}

impl DirectoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        // The cache holds plain data; a poisoned lock cannot leave it in a
        // torn state, so recover the guard.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: CacheEvent) {
        // Send fails only when nobody is subscribed.
        drop(self.events.send(event));
    }

    /// Subscribe to cache change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Last-known envelope for a list key.
    #[must_use]
    pub fn list(&self, key: &ListKey) -> Option<Page<User>> {
        self.lock().lists.get(key).cloned()
    }

    /// Last-known detail for a user.
    #[must_use]
    pub fn detail(&self, id: &UserId) -> Option<User> {
        self.lock().details.get(id).cloned()
    }

    /// Replace the envelope for a list key.
    pub fn insert_list(&self, key: ListKey, page: Page<User>) {
        self.lock().lists.insert(key.clone(), page);
        self.notify(CacheEvent::ListUpdated(key));
    }

    /// Replace the detail entry for a user.
    pub fn insert_detail(&self, user: User) {
        let id = user.id().clone();
        self.lock().details.insert(id.clone(), user);
        self.notify(CacheEvent::DetailUpdated(id));
    }

    /// Mark a list key as needing a background refresh.
    pub fn mark_stale(&self, key: &ListKey) {
        self.lock().stale_lists.insert(key.clone());
        self.notify(CacheEvent::ListStale(key.clone()));
    }

    /// Whether a list key is awaiting a refresh.
    #[must_use]
    pub fn is_stale(&self, key: &ListKey) -> bool {
        self.lock().stale_lists.contains(key)
    }

    /// Clear the stale marker after a refresh lands.
    pub fn clear_stale(&self, key: &ListKey) {
        self.lock().stale_lists.remove(key);
    }

    /// Register a new fetch for a key, cancelling any fetch it supersedes.
    ///
    /// The returned token must be passed to the transport so the
    /// superseded request stops at the I/O boundary.
    #[must_use]
    pub fn begin_fetch(&self, key: FetchKey) -> CancellationToken {
        let token = CancellationToken::new();
        let mut state = self.lock();
        if let Some(previous) = state.inflight.insert(key, token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the in-flight fetch for a key, if any.
    pub fn cancel_fetch(&self, key: &FetchKey) {
        if let Some(token) = self.lock().inflight.remove(key) {
            token.cancel();
        }
    }

    /// Deregister a completed fetch.
    ///
    /// A cancelled token means the fetch was superseded and a newer
    /// registration owns the slot; leave it untouched.
    pub fn finish_fetch(&self, key: &FetchKey, token: &CancellationToken) {
        if !token.is_cancelled() {
            self.lock().inflight.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pagination::PageRequest;

    fn key(search: Option<&str>, page: u32, limit: u32) -> ListKey {
        ListKey::new(
            search,
            None,
            PageRequest::new(page, limit).expect("valid page request"),
        )
    }

    fn sample_user(name: &str) -> User {
        User::new(
            UserId::random(),
            name,
            format!("{}@x.com", name.to_lowercase()),
            Role::Viewer,
            true,
            Utc::now(),
        )
        .expect("valid user")
    }

    fn sample_page(users: Vec<User>) -> Page<User> {
        let total = users.len() as u64;
        Page::new(users, PageRequest::default(), total)
    }

    #[test]
    fn keys_compare_by_value_with_normalised_search() {
        assert_eq!(key(Some(" li "), 1, 10), key(Some("li"), 1, 10));
        assert_eq!(key(Some("   "), 1, 10), key(None, 1, 10));
        assert_ne!(key(Some("li"), 1, 10), key(Some("li"), 2, 10));
    }

    #[test]
    fn list_entries_are_looked_up_by_equal_keys() {
        let cache = DirectoryCache::new();
        let page = sample_page(vec![sample_user("Ada")]);
        cache.insert_list(key(Some("ad"), 1, 10), page.clone());

        // A freshly built equal key hits the same entry.
        assert_eq!(cache.list(&key(Some(" ad "), 1, 10)), Some(page));
        assert!(cache.list(&key(None, 1, 10)).is_none());
    }

    #[test]
    fn subscribers_observe_updates_and_stale_marks() {
        let cache = DirectoryCache::new();
        let mut events = cache.subscribe();
        let list_key = key(None, 1, 10);
        let user = sample_user("Ada");
        let id = user.id().clone();

        cache.insert_list(list_key.clone(), sample_page(vec![user.clone()]));
        cache.insert_detail(user);
        cache.mark_stale(&list_key);

        assert_eq!(
            events.try_recv().expect("list event"),
            CacheEvent::ListUpdated(list_key.clone())
        );
        assert_eq!(
            events.try_recv().expect("detail event"),
            CacheEvent::DetailUpdated(id)
        );
        assert_eq!(
            events.try_recv().expect("stale event"),
            CacheEvent::ListStale(list_key)
        );
    }

    #[test]
    fn begin_fetch_cancels_the_superseded_token() {
        let cache = DirectoryCache::new();
        let fetch_key = FetchKey::List(key(None, 1, 10));

        let first = cache.begin_fetch(fetch_key.clone());
        let second = cache.begin_fetch(fetch_key.clone());

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn finish_fetch_ignores_superseded_tokens() {
        let cache = DirectoryCache::new();
        let fetch_key = FetchKey::List(key(None, 1, 10));

        let first = cache.begin_fetch(fetch_key.clone());
        let second = cache.begin_fetch(fetch_key.clone());

        // The superseded fetch completing must not drop the newer
        // registration.
        cache.finish_fetch(&fetch_key, &first);
        cache.cancel_fetch(&fetch_key);
        assert!(second.is_cancelled());
    }

    #[test]
    fn stale_marks_clear_after_refresh() {
        let cache = DirectoryCache::new();
        let list_key = key(None, 1, 10);

        cache.mark_stale(&list_key);
        assert!(cache.is_stale(&list_key));
        cache.clear_stale(&list_key);
        assert!(!cache.is_stale(&list_key));
    }
}
