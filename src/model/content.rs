//! Content view state for the main panel

use super::types::{LibraryItem, MovieDetail};

/// Represents the current view in the main content area.
///
/// List views only carry their selection; the movies themselves are read
/// from the live search, category and preference state at render time.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentView {
    /// Category sections
    Home { selected_index: usize },
    SearchResults { selected_index: usize },
    Detail { detail: Box<MovieDetail>, scroll: u16 },
    Favorites { selected_index: usize },
    WatchLater { selected_index: usize },
}

impl Default for ContentView {
    fn default() -> Self {
        ContentView::Home { selected_index: 0 }
    }
}

impl ContentView {
    pub fn for_library(item: LibraryItem) -> Self {
        match item {
            LibraryItem::Home => ContentView::Home { selected_index: 0 },
            LibraryItem::SearchResults => ContentView::SearchResults { selected_index: 0 },
            LibraryItem::Favorites => ContentView::Favorites { selected_index: 0 },
            LibraryItem::WatchLater => ContentView::WatchLater { selected_index: 0 },
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self {
            ContentView::Home { selected_index }
            | ContentView::SearchResults { selected_index }
            | ContentView::Favorites { selected_index }
            | ContentView::WatchLater { selected_index } => Some(*selected_index),
            ContentView::Detail { .. } => None,
        }
    }

    pub fn selected_index_mut(&mut self) -> Option<&mut usize> {
        match self {
            ContentView::Home { selected_index }
            | ContentView::SearchResults { selected_index }
            | ContentView::Favorites { selected_index }
            | ContentView::WatchLater { selected_index } => Some(selected_index),
            ContentView::Detail { .. } => None,
        }
    }

    pub fn title(&self) -> String {
        match self {
            ContentView::Home { .. } => "Home".into(),
            ContentView::SearchResults { .. } => "Search Results".into(),
            ContentView::Detail { detail, .. } => detail.summary.title.clone(),
            ContentView::Favorites { .. } => "Favorites".into(),
            ContentView::WatchLater { .. } => "Watch Later".into(),
        }
    }
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: ContentView,
    pub navigation_stack: Vec<ContentView>,
    pub is_loading: bool,
}

impl ContentState {
    /// Replace the view; the previous one is remembered for `back`.
    pub fn push(&mut self, view: ContentView) {
        let previous = std::mem::replace(&mut self.view, view);
        self.navigation_stack.push(previous);
        self.is_loading = false;
    }

    /// Switch to a top-level view, forgetting history.
    pub fn reset(&mut self, view: ContentView) {
        self.navigation_stack.clear();
        self.view = view;
        self.is_loading = false;
    }

    pub fn back(&mut self) -> bool {
        match self.navigation_stack.pop() {
            Some(previous) => {
                self.view = previous;
                true
            }
            None => false,
        }
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        if let Some(index) = self.view.selected_index_mut() {
            *index = (*index).min(len.saturating_sub(1));
        }
    }
}
