//! Favorites, watch later, theme and language actions

use crate::model::{ContentView, ListChange};
use super::AppController;

impl AppController {
    pub async fn toggle_favorite_selected(&self) -> Option<ListChange> {
        let movie = self.model.selected_movie().await?;
        let change = self.model.prefs.toggle_favorite(movie).await;
        self.model.clamp_content_selection().await;
        Some(change)
    }

    pub async fn toggle_watch_later_selected(&self) -> Option<ListChange> {
        let movie = self.model.selected_movie().await?;
        let change = self.model.prefs.toggle_watch_later(movie).await;
        self.model.clamp_content_selection().await;
        Some(change)
    }

    /// Only acts while the watch later list is on screen
    pub async fn clear_watch_later(&self) -> Option<ListChange> {
        let view = self.model.get_content_state().await.view;
        if !matches!(view, ContentView::WatchLater { .. }) {
            return None;
        }
        let change = self.model.prefs.clear_watch_later().await;
        self.model.clamp_content_selection().await;
        Some(change)
    }

    pub async fn toggle_theme(&self) {
        let theme = self.model.prefs.toggle_theme().await;
        tracing::debug!(theme = theme.as_str(), "Theme toggled");
    }

    /// Switch to the next language, then re-run the current search and
    /// reload the categories in it.
    pub async fn cycle_language(&self) {
        let next = self.model.prefs.language().await.next();
        let language = self.model.prefs.set_language(next).await;
        tracing::info!(language = language.code(), "Language changed");

        let search = self.model.search.clone();
        tokio::spawn(async move {
            search.refresh().await;
        });
        self.model.categories.spawn_load();
    }

    /// Returns whether there was a notification to dismiss
    pub async fn dismiss_notification(&self) -> bool {
        if self.model.prefs.notification().await.is_some() {
            self.model.prefs.dismiss_notification().await;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::controller::AppController;
    use crate::model::testing::{movies, FakeCatalog};
    use crate::model::{
        AppModel, Debouncer, Language, LibraryItem, ListChange, PreferenceContext,
        PreferenceStore, Theme,
    };

    async fn controller_with(catalog: FakeCatalog) -> AppController {
        let prefs = PreferenceContext::load(PreferenceStore::in_memory()).await;
        let model = AppModel::new(Arc::new(catalog), prefs, Duration::from_millis(1));
        let input = Arc::new(Debouncer::new(String::new(), Duration::from_millis(500)));
        AppController::new(model, input)
    }

    #[tokio::test]
    async fn toggle_favorite_adds_then_removes() {
        let controller = controller_with(
            FakeCatalog::default().with_page("alien", 1, movies("a", 0, 3), 3),
        )
        .await;
        controller.model.search.run_query("alien".into()).await;
        controller.model.open_library_item(LibraryItem::SearchResults).await;

        assert_eq!(controller.toggle_favorite_selected().await, Some(ListChange::Added));
        assert!(controller.model.prefs.is_favorite("a-0").await);
        assert_eq!(controller.toggle_favorite_selected().await, Some(ListChange::Removed));
        assert!(!controller.model.prefs.is_favorite("a-0").await);
    }

    #[tokio::test]
    async fn nothing_selected_is_a_no_op() {
        let controller = controller_with(FakeCatalog::default()).await;
        controller.model.open_library_item(LibraryItem::Favorites).await;
        assert_eq!(controller.toggle_watch_later_selected().await, None);
        assert_eq!(controller.clear_watch_later().await, None);
    }

    #[tokio::test]
    async fn clear_watch_later_only_from_its_view() {
        let controller = controller_with(
            FakeCatalog::default().with_page("alien", 1, movies("a", 0, 3), 3),
        )
        .await;
        controller.model.search.run_query("alien".into()).await;
        controller.model.open_library_item(LibraryItem::SearchResults).await;
        controller.toggle_watch_later_selected().await;

        assert_eq!(controller.clear_watch_later().await, None);
        controller.model.open_library_item(LibraryItem::WatchLater).await;
        assert_eq!(controller.clear_watch_later().await, Some(ListChange::Cleared));
        assert!(controller.model.prefs.watch_later().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn language_change_reruns_search() {
        let controller = controller_with(
            FakeCatalog::default().with_page("amelie", 1, movies("a", 0, 2), 2),
        )
        .await;
        controller.model.search.run_query("amelie".into()).await;

        controller.cycle_language().await;
        assert_eq!(controller.model.prefs.language().await, Language::Es);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let session = controller.model.search.snapshot().await;
        assert_eq!(session.query, "amelie");
        assert_eq!(session.results.len(), 2);
    }

    #[tokio::test]
    async fn theme_and_notification() {
        let controller = controller_with(FakeCatalog::default()).await;
        controller.toggle_theme().await;
        assert_eq!(controller.model.prefs.theme().await, Theme::Light);

        assert!(!controller.dismiss_notification().await);
        controller.model.prefs.clear_watch_later().await;
        assert!(controller.dismiss_notification().await);
        assert!(controller.model.prefs.notification().await.is_none());
    }
}
