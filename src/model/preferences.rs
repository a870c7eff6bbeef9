//! Application-wide preferences: favorites, watch later, theme, language
//! and the transient notification slot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::store::{PreferenceStore, FAVORITES_KEY, LANGUAGE_KEY, THEME_KEY, WATCH_LATER_KEY};
use super::types::{Language, MovieSummary, Notification, NotificationKind, Theme};

/// How long a notification stays up unless replaced or dismissed
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Ordered, id-unique movie list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceList {
    movies: Vec<MovieSummary>,
}

impl PreferenceList {
    pub fn from_movies(movies: Vec<MovieSummary>) -> Self {
        let mut list = Self::default();
        for movie in movies {
            list.insert(movie);
        }
        list
    }

    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Append unless the id is already present. Returns whether it was added.
    pub fn insert(&mut self, movie: MovieSummary) -> bool {
        if self.contains(&movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    /// Returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.movies.len();
        self.movies.retain(|m| m.id != id);
        self.movies.len() != before
    }

    pub fn clear(&mut self) {
        self.movies.clear();
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

}

/// What a list mutation did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListChange {
    Added,
    AlreadyPresent,
    Removed,
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Favorites,
    WatchLater,
}

impl ListKind {
    fn key(self) -> &'static str {
        match self {
            ListKind::Favorites => FAVORITES_KEY,
            ListKind::WatchLater => WATCH_LATER_KEY,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ListKind::Favorites => "favorites",
            ListKind::WatchLater => "watch later",
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PreferenceState {
    favorites: PreferenceList,
    watch_later: PreferenceList,
    theme: Theme,
    language: Language,
}

impl PreferenceState {
    fn list_mut(&mut self, kind: ListKind) -> &mut PreferenceList {
        match kind {
            ListKind::Favorites => &mut self.favorites,
            ListKind::WatchLater => &mut self.watch_later,
        }
    }
}

#[derive(Default)]
struct NotificationSlot {
    current: Option<Notification>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

/// Point-in-time copy of all preference state for rendering
#[derive(Clone, Debug, Default)]
pub struct PreferenceSnapshot {
    pub favorites: Vec<MovieSummary>,
    pub watch_later: Vec<MovieSummary>,
    pub theme: Theme,
    pub language: Language,
    pub notification: Option<Notification>,
}

/// Shared handle to the preference state.
///
/// Cloning is cheap; every clone sees the same state. Mutations update memory
/// first and then write the affected key through to the store.
#[derive(Clone)]
pub struct PreferenceContext {
    store: PreferenceStore,
    state: Arc<Mutex<PreferenceState>>,
    notification: Arc<Mutex<NotificationSlot>>,
}

impl PreferenceContext {
    /// Read every key from `store`, defaulting whatever is missing or corrupt.
    pub async fn load(store: PreferenceStore) -> Self {
        let favorites = store
            .get_json::<Vec<MovieSummary>>(FAVORITES_KEY)
            .await
            .map(PreferenceList::from_movies)
            .unwrap_or_default();
        let watch_later = store
            .get_json::<Vec<MovieSummary>>(WATCH_LATER_KEY)
            .await
            .map(PreferenceList::from_movies)
            .unwrap_or_default();
        let theme = store
            .get(THEME_KEY)
            .await
            .and_then(|t| Theme::from_str(&t))
            .unwrap_or_default();
        let language = store
            .get(LANGUAGE_KEY)
            .await
            .and_then(|l| Language::from_code(&l))
            .unwrap_or_default();

        tracing::info!(
            favorites = favorites.movies().len(),
            watch_later = watch_later.movies().len(),
            theme = theme.as_str(),
            language = language.code(),
            "Preferences loaded"
        );

        Self {
            store,
            state: Arc::new(Mutex::new(PreferenceState {
                favorites,
                watch_later,
                theme,
                language,
            })),
            notification: Arc::new(Mutex::new(NotificationSlot::default())),
        }
    }

    pub async fn snapshot(&self) -> PreferenceSnapshot {
        let state = self.state.lock().await;
        let notification = self.notification.lock().await.current.clone();
        PreferenceSnapshot {
            favorites: state.favorites.movies().to_vec(),
            watch_later: state.watch_later.movies().to_vec(),
            theme: state.theme,
            language: state.language,
            notification,
        }
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Callers hold the state guard so writes land in mutation order
    async fn persist_list(&self, kind: ListKind, list: &PreferenceList) {
        if let Err(e) = self.store.set_json(kind.key(), list.movies()).await {
            tracing::error!(list = kind.name(), error = %e, "Failed to persist list");
        }
    }

    async fn add(&self, kind: ListKind, movie: MovieSummary) -> ListChange {
        let mut state = self.state.lock().await;
        let list = state.list_mut(kind);

        if !list.insert(movie) {
            drop(state);
            self.show_notification(
                format!("Movie is already in {}!", kind.name()),
                NotificationKind::Info,
            )
            .await;
            return ListChange::AlreadyPresent;
        }

        let len = list.movies().len();
        self.persist_list(kind, state.list_mut(kind)).await;
        drop(state);
        tracing::debug!(list = kind.name(), len, "Added movie");
        self.show_notification(format!("Added to {}!", kind.name()), NotificationKind::Success)
            .await;
        ListChange::Added
    }

    async fn remove(&self, kind: ListKind, id: &str) -> ListChange {
        let mut state = self.state.lock().await;
        let list = state.list_mut(kind);
        if list.remove(id) {
            self.persist_list(kind, state.list_mut(kind)).await;
        }
        drop(state);

        self.show_notification(
            format!("Removed from {}!", kind.name()),
            NotificationKind::Success,
        )
        .await;
        ListChange::Removed
    }

    async fn contains(&self, kind: ListKind, id: &str) -> bool {
        self.state.lock().await.list_mut(kind).contains(id)
    }

    pub async fn add_to_favorites(&self, movie: MovieSummary) -> ListChange {
        self.add(ListKind::Favorites, movie).await
    }

    pub async fn remove_from_favorites(&self, id: &str) -> ListChange {
        self.remove(ListKind::Favorites, id).await
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.contains(ListKind::Favorites, id).await
    }

    pub async fn toggle_favorite(&self, movie: MovieSummary) -> ListChange {
        if self.is_favorite(&movie.id).await {
            self.remove_from_favorites(&movie.id).await
        } else {
            self.add_to_favorites(movie).await
        }
    }

    pub async fn favorites(&self) -> Vec<MovieSummary> {
        self.state.lock().await.favorites.movies().to_vec()
    }

    pub async fn add_to_watch_later(&self, movie: MovieSummary) -> ListChange {
        self.add(ListKind::WatchLater, movie).await
    }

    pub async fn remove_from_watch_later(&self, id: &str) -> ListChange {
        self.remove(ListKind::WatchLater, id).await
    }

    pub async fn is_in_watch_later(&self, id: &str) -> bool {
        self.contains(ListKind::WatchLater, id).await
    }

    pub async fn toggle_watch_later(&self, movie: MovieSummary) -> ListChange {
        if self.is_in_watch_later(&movie.id).await {
            self.remove_from_watch_later(&movie.id).await
        } else {
            self.add_to_watch_later(movie).await
        }
    }

    pub async fn clear_watch_later(&self) -> ListChange {
        let mut state = self.state.lock().await;
        state.watch_later.clear();
        self.persist_list(ListKind::WatchLater, &state.watch_later).await;
        drop(state);

        self.show_notification("Watch later list cleared!", NotificationKind::Success)
            .await;
        ListChange::Cleared
    }

    pub async fn watch_later(&self) -> Vec<MovieSummary> {
        self.state.lock().await.watch_later.movies().to_vec()
    }

    // ========================================================================
    // Theme & language
    // ========================================================================

    pub async fn theme(&self) -> Theme {
        self.state.lock().await.theme
    }

    pub async fn set_theme(&self, theme: Theme) -> Theme {
        let mut state = self.state.lock().await;
        state.theme = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()).await {
            tracing::error!(error = %e, "Failed to persist theme");
        }
        theme
    }

    pub async fn toggle_theme(&self) -> Theme {
        let next = self.theme().await.toggled();
        self.set_theme(next).await
    }

    pub async fn language(&self) -> Language {
        self.state.lock().await.language
    }

    pub async fn set_language(&self, language: Language) -> Language {
        let mut state = self.state.lock().await;
        state.language = language;
        if let Err(e) = self.store.set(LANGUAGE_KEY, language.code()).await {
            tracing::error!(error = %e, "Failed to persist language");
        }
        language
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Replace the current notification and (re)arm its expiry timer.
    pub async fn show_notification(&self, message: impl Into<String>, kind: NotificationKind) {
        let mut slot = self.notification.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        slot.generation += 1;
        slot.current = Some(Notification {
            message: message.into(),
            kind,
        });

        let generation = slot.generation;
        let shared = Arc::clone(&self.notification);
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            let mut slot = shared.lock().await;
            // An abort can lose the race with the sleep finishing
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
    }

    pub async fn dismiss_notification(&self) {
        let mut slot = self.notification.lock().await;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation += 1;
        slot.current = None;
    }

    pub async fn notification(&self) -> Option<Notification> {
        self.notification.lock().await.current.clone()
    }
}
