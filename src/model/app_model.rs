//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::categories::{Category, CategoryFilter, CategoryFlow, CategorySnapshot};
use super::content::{ContentState, ContentView};
use super::omdb_client::SharedCatalog;
use super::preferences::{PreferenceContext, PreferenceSnapshot};
use super::search::{SearchFlow, SearchSession};
use super::types::{ActiveSection, LibraryItem, MovieDetail, MovieSummary, UiState};

const ERROR_TTL: Duration = Duration::from_secs(5);

/// Everything the view needs for one frame
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub ui_state: UiState,
    pub content_state: ContentState,
    pub search: SearchSession,
    pub categories: CategorySnapshot,
    pub prefs: PreferenceSnapshot,
}

impl AppSnapshot {
    /// Movies listed by the current view, in display order
    pub fn visible_movies(&self) -> Vec<MovieSummary> {
        match &self.content_state.view {
            ContentView::Home { .. } => self.categories.visible_movies(),
            ContentView::SearchResults { .. } => self.search.results.clone(),
            ContentView::Favorites { .. } => self.prefs.favorites.clone(),
            ContentView::WatchLater { .. } => self.prefs.watch_later.clone(),
            ContentView::Detail { .. } => Vec::new(),
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.prefs.favorites.iter().any(|m| m.id == id)
    }

    pub fn is_in_watch_later(&self, id: &str) -> bool {
        self.prefs.watch_later.iter().any(|m| m.id == id)
    }
}

/// Main application model containing all state.
///
/// Cloning shares the same underlying state.
#[derive(Clone)]
pub struct AppModel {
    pub prefs: PreferenceContext,
    pub search: SearchFlow,
    pub categories: CategoryFlow,
    catalog: SharedCatalog,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(catalog: SharedCatalog, prefs: PreferenceContext, category_delay: Duration) -> Self {
        Self {
            search: SearchFlow::new(catalog.clone(), prefs.clone()),
            categories: CategoryFlow::new(catalog.clone(), prefs.clone(), category_delay),
            catalog,
            prefs,
            ui_state: Arc::new(Mutex::new(UiState::default())),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            ui_state: self.get_ui_state().await,
            content_state: self.get_content_state().await,
            search: self.search.snapshot().await,
            categories: self.categories.snapshot().await,
            prefs: self.prefs.snapshot().await,
        }
    }

    // ========================================================================
    // Sections & sidebar
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        self.ui_state.lock().await.active_section = section;
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Library => {
                state.library_selected = state.library_selected.saturating_sub(1);
            }
            ActiveSection::Categories => {
                state.category_selected = state.category_selected.saturating_sub(1);
            }
            _ => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Library => {
                if state.library_selected < LibraryItem::ALL.len() - 1 {
                    state.library_selected += 1;
                }
            }
            ActiveSection::Categories => {
                // "All" plus one entry per category
                if state.category_selected < Category::ALL.len() {
                    state.category_selected += 1;
                }
            }
            _ => {}
        }
    }

    pub async fn selected_library_item(&self) -> LibraryItem {
        let index = self.ui_state.lock().await.library_selected;
        LibraryItem::ALL
            .get(index)
            .copied()
            .unwrap_or(LibraryItem::Home)
    }

    /// Apply the highlighted category filter and show the home view.
    pub async fn apply_selected_category(&self) -> CategoryFilter {
        let index = self.ui_state.lock().await.category_selected;
        let filter = CategoryFilter::from_index(index);
        self.categories.set_filter(filter).await;
        self.open_library_item(LibraryItem::Home).await;
        filter
    }

    // ========================================================================
    // Search box
    // ========================================================================

    /// Returns the query as it reads after the edit
    pub async fn update_search_query(&self, query: String) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query = query;
        state.search_query.clone()
    }

    pub async fn append_to_search(&self, c: char) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
        state.search_query.clone()
    }

    pub async fn backspace_search(&self) -> String {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop();
        state.search_query.clone()
    }

    /// Point the content area at whatever the search box now implies:
    /// results while there is a query, home once it is cleared.
    pub async fn follow_search_query(&self, query: &str) {
        let mut state = self.content_state.lock().await;
        let showing_results = matches!(state.view, ContentView::SearchResults { .. });
        if query.trim().is_empty() {
            if showing_results {
                state.reset(ContentView::for_library(LibraryItem::Home));
            }
        } else if !showing_results {
            state.reset(ContentView::for_library(LibraryItem::SearchResults));
        }
    }

    // ========================================================================
    // Errors & overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() > ERROR_TTL {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }

    // ========================================================================
    // Main content
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn open_library_item(&self, item: LibraryItem) {
        self.content_state
            .lock()
            .await
            .reset(ContentView::for_library(item));
    }

    pub async fn set_movie_detail(&self, detail: MovieDetail) {
        self.content_state.lock().await.push(ContentView::Detail {
            detail: Box::new(detail),
            scroll: 0,
        });
    }

    /// Mark a content load as started. False if one is already in flight.
    pub async fn begin_content_loading(&self) -> bool {
        let mut content_state = self.content_state.lock().await;
        if content_state.is_loading {
            return false;
        }
        content_state.is_loading = true;
        true
    }

    pub async fn set_content_loading(&self, loading: bool) {
        self.content_state.lock().await.is_loading = loading;
    }

    pub async fn navigate_back(&self) -> bool {
        self.content_state.lock().await.back()
    }

    async fn visible_movies(&self) -> Vec<MovieSummary> {
        let view = self.content_state.lock().await.view.clone();
        match view {
            ContentView::Home { .. } => self.categories.snapshot().await.visible_movies(),
            ContentView::SearchResults { .. } => self.search.snapshot().await.results,
            ContentView::Favorites { .. } => self.prefs.favorites().await,
            ContentView::WatchLater { .. } => self.prefs.watch_later().await,
            ContentView::Detail { .. } => Vec::new(),
        }
    }

    pub async fn content_move_up(&self) {
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::Detail { scroll, .. } => *scroll = scroll.saturating_sub(1),
            view => {
                if let Some(index) = view.selected_index_mut() {
                    *index = index.saturating_sub(1);
                }
            }
        }
    }

    pub async fn content_move_down(&self) {
        let len = self.visible_movies().await.len();
        let mut state = self.content_state.lock().await;
        match &mut state.view {
            ContentView::Detail { scroll, .. } => *scroll = scroll.saturating_add(1),
            view => {
                if let Some(index) = view.selected_index_mut() {
                    if *index + 1 < len {
                        *index += 1;
                    }
                }
            }
        }
    }

    /// Pull the selection back inside lists that shrank, e.g. after a removal
    pub async fn clamp_content_selection(&self) {
        let len = self.visible_movies().await.len();
        self.content_state.lock().await.clamp_selection(len);
    }

    /// The highlighted movie, or the open one in the detail view
    pub async fn selected_movie(&self) -> Option<MovieSummary> {
        let view = self.content_state.lock().await.view.clone();
        match view {
            ContentView::Detail { detail, .. } => Some(detail.summary),
            view => {
                let index = view.selected_index()?;
                self.visible_movies().await.into_iter().nth(index)
            }
        }
    }

    /// True when the selection sits on the last loaded search result and
    /// another page is available.
    pub async fn should_load_more_search(&self) -> bool {
        let selected = match self.content_state.lock().await.view {
            ContentView::SearchResults { selected_index } => selected_index,
            _ => return false,
        };
        let session = self.search.snapshot().await;
        session.has_more && !session.loading && selected + 1 >= session.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::store::PreferenceStore;
    use crate::model::testing::{movie, movies, FakeCatalog};

    async fn model_with(catalog: FakeCatalog) -> AppModel {
        let prefs = PreferenceContext::load(PreferenceStore::in_memory()).await;
        AppModel::new(Arc::new(catalog), prefs, Duration::from_millis(100))
    }

    #[tokio::test]
    async fn typing_switches_between_home_and_results() {
        let model = model_with(FakeCatalog::default()).await;

        model.append_to_search('x').await;
        model.follow_search_query("x").await;
        assert!(matches!(
            model.get_content_state().await.view,
            ContentView::SearchResults { .. }
        ));

        let query = model.backspace_search().await;
        model.follow_search_query(&query).await;
        assert!(matches!(model.get_content_state().await.view, ContentView::Home { .. }));
    }

    #[tokio::test]
    async fn detail_back_returns_to_list() {
        let model = model_with(FakeCatalog::default()).await;
        model.open_library_item(LibraryItem::Favorites).await;

        let detail = MovieDetail {
            summary: movie("tt1", "One"),
            plot: None,
            runtime: None,
            rating: None,
            rated: None,
            released: None,
            genres: Vec::new(),
            director: None,
            cast: Vec::new(),
            awards: None,
        };
        model.set_movie_detail(detail).await;
        assert_eq!(model.selected_movie().await.map(|m| m.id), Some("tt1".into()));

        assert!(model.navigate_back().await);
        assert!(matches!(model.get_content_state().await.view, ContentView::Favorites { .. }));
        assert!(!model.navigate_back().await);
    }

    #[tokio::test]
    async fn selection_stays_within_results_and_triggers_load_more() {
        let model = model_with(
            FakeCatalog::default().with_page("alien", 1, movies("a", 0, 10), 25),
        )
        .await;
        model.search.run_query("alien".into()).await;
        model.open_library_item(LibraryItem::SearchResults).await;

        for _ in 0..20 {
            model.content_move_down().await;
        }
        assert_eq!(model.get_content_state().await.view.selected_index(), Some(9));
        assert_eq!(model.selected_movie().await.map(|m| m.id), Some("a-9".into()));
        assert!(model.should_load_more_search().await);

        model.content_move_up().await;
        assert!(!model.should_load_more_search().await);
    }

    #[tokio::test]
    async fn removing_last_favorite_clamps_selection() {
        let model = model_with(FakeCatalog::default()).await;
        model.prefs.add_to_favorites(movie("a", "A")).await;
        model.prefs.add_to_favorites(movie("b", "B")).await;
        model.open_library_item(LibraryItem::Favorites).await;
        model.content_move_down().await;

        model.prefs.remove_from_favorites("b").await;
        model.clamp_content_selection().await;
        assert_eq!(model.selected_movie().await.map(|m| m.id), Some("a".into()));
    }

    #[tokio::test]
    async fn category_selection_filters_home() {
        let model = model_with(FakeCatalog::default()).await;
        model.set_active_section(ActiveSection::Categories).await;
        for _ in 0..50 {
            model.move_selection_down().await;
        }
        assert_eq!(model.get_ui_state().await.category_selected, Category::ALL.len());

        let filter = model.apply_selected_category().await;
        assert_eq!(filter, CategoryFilter::Only(Category::WatchLaterPicks));
        assert_eq!(model.categories.snapshot().await.filter, filter);
    }

    #[tokio::test]
    async fn stale_errors_are_cleared() {
        let model = model_with(FakeCatalog::default()).await;
        model.set_error("boom".into()).await;
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);

        if let Some(past) = Instant::now().checked_sub(Duration::from_secs(6)) {
            model.ui_state.lock().await.error_timestamp = Some(past);
            model.auto_clear_old_errors().await;
            assert!(!model.has_error().await);
        }
    }
}
