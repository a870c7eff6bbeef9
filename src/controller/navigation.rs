//! Navigation-related controller methods (library, categories, search, detail)

use crate::model::{ActiveSection, ContentView, LibraryItem};
use super::AppController;

impl AppController {
    /// Feed an edit of the search box to the debouncer.
    pub async fn search_edited(&self, query: String) {
        self.model.follow_search_query(&query).await;
        self.search_input.set(query);
    }

    pub async fn clear_search(&self) {
        let query = self.model.update_search_query(String::new()).await;
        self.search_edited(query).await;
    }

    pub async fn open_library_item(&self) {
        let item = self.model.selected_library_item().await;
        tracing::debug!(item = item.label(), "Opening library item");
        self.model.open_library_item(item).await;
        self.model.set_active_section(ActiveSection::MainContent).await;
    }

    pub async fn select_category(&self) {
        let filter = self.model.apply_selected_category().await;
        tracing::debug!(?filter, "Category filter changed");
        self.model.set_active_section(ActiveSection::MainContent).await;
    }

    /// Fetch full details for the highlighted movie and show them.
    pub async fn open_selected_movie(&self) {
        let view = self.model.get_content_state().await.view;
        if matches!(view, ContentView::Detail { .. }) {
            return;
        }
        let Some(movie) = self.model.selected_movie().await else {
            return;
        };

        if !self.model.begin_content_loading().await {
            tracing::debug!(id = %movie.id, "Detail load already in flight");
            return;
        }
        tracing::debug!(id = %movie.id, title = %movie.title, "Opening movie detail");

        match self.model.catalog().get_detail(&movie.id).await {
            Ok(detail) => {
                self.model.set_movie_detail(detail).await;
            }
            Err(e) => {
                tracing::error!(id = %movie.id, error = %e, "Failed to load movie detail");
                self.model.set_content_loading(false).await;
                self.model.set_error(Self::format_error(&e)).await;
            }
        }
    }

    /// Load the next search page in the background if one is due.
    pub async fn load_more_if_needed(&self) {
        if self.model.should_load_more_search().await {
            self.spawn_load_more();
        }
    }

    pub fn spawn_load_more(&self) {
        let search = self.model.search.clone();
        tokio::spawn(async move {
            search.load_more().await;
        });
    }

    pub async fn go_back(&self) {
        if !self.model.navigate_back().await {
            // Nothing to return to; land on home
            let view = self.model.get_content_state().await.view;
            if !matches!(view, ContentView::Home { .. }) {
                self.model.open_library_item(LibraryItem::Home).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::controller::AppController;
    use crate::model::testing::{movie, movies, FakeCatalog};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::model::{
        ActiveSection, AppModel, ContentView, Debouncer, LibraryItem, MovieDetail,
        PreferenceContext, PreferenceStore,
    };

    async fn controller_with(catalog: FakeCatalog) -> AppController {
        let prefs = PreferenceContext::load(PreferenceStore::in_memory()).await;
        let model = AppModel::new(Arc::new(catalog), prefs, Duration::from_millis(100));
        let input = Arc::new(Debouncer::new(String::new(), Duration::from_millis(500)));
        model.search.attach(input.subscribe());
        AppController::new(model, input)
    }

    fn detail(id: &str) -> MovieDetail {
        MovieDetail {
            summary: movie(id, "Heat"),
            plot: Some("A group of professional bank robbers...".into()),
            runtime: Some("170 min".into()),
            rating: Some("8.3".into()),
            rated: None,
            released: None,
            genres: vec!["Crime".into()],
            director: Some("Michael Mann".into()),
            cast: vec!["Al Pacino".into()],
            awards: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_query_reaches_results_view() {
        let controller = controller_with(
            FakeCatalog::default().with_page("heat", 1, movies("h", 0, 10), 30),
        )
        .await;

        for c in "heat".chars() {
            let query = controller.model.append_to_search(c).await;
            controller.search_edited(query).await;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;

        let snapshot = controller.model.snapshot().await;
        assert!(matches!(snapshot.content_state.view, ContentView::SearchResults { .. }));
        assert_eq!(snapshot.visible_movies().len(), 10);
    }

    #[tokio::test]
    async fn detail_failure_sets_error() {
        let controller = controller_with(FakeCatalog::default()).await;
        controller.model.prefs.add_to_favorites(movie("tt404", "Gone")).await;
        controller.model.open_library_item(LibraryItem::Favorites).await;

        controller.open_selected_movie().await;
        let ui = controller.model.get_ui_state().await;
        assert_eq!(ui.error_message.as_deref(), Some("Incorrect IMDb ID."));
        assert!(!controller.model.get_content_state().await.is_loading);
    }

    #[tokio::test]
    async fn detail_opens_and_back_returns() {
        let controller = controller_with(FakeCatalog::default().with_detail(detail("tt0113277"))).await;
        controller.model.prefs.add_to_watch_later(movie("tt0113277", "Heat")).await;
        controller.model.open_library_item(LibraryItem::WatchLater).await;

        controller.open_selected_movie().await;
        match controller.model.get_content_state().await.view {
            ContentView::Detail { detail, .. } => {
                assert_eq!(detail.director.as_deref(), Some("Michael Mann"))
            }
            other => panic!("unexpected view {other:?}"),
        }

        controller.go_back().await;
        assert!(matches!(
            controller.model.get_content_state().await.view,
            ContentView::WatchLater { .. }
        ));
        controller.go_back().await;
        assert!(matches!(
            controller.model.get_content_state().await.view,
            ContentView::Home { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_enter_opens_one_detail() {
        let controller = controller_with(
            FakeCatalog::default()
                .with_detail(detail("tt0113277"))
                .with_delay("tt0113277", Duration::from_secs(1)),
        )
        .await;
        controller.model.prefs.add_to_watch_later(movie("tt0113277", "Heat")).await;
        controller.model.open_library_item(LibraryItem::WatchLater).await;
        controller.model.set_active_section(ActiveSection::MainContent).await;

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        controller.handle_key_event(enter).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(controller.model.get_content_state().await.is_loading);
        controller.handle_key_event(enter).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        let content = controller.model.get_content_state().await;
        assert!(!content.is_loading);
        assert!(matches!(content.view, ContentView::Detail { .. }));

        controller.go_back().await;
        assert!(matches!(
            controller.model.get_content_state().await.view,
            ContentView::WatchLater { .. }
        ));
    }
}
