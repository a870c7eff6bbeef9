//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Movie records, preference values and UI state
//! - `store`: JSON-file key/value persistence
//! - `omdb_client`: OMDb HTTP client behind the `MovieCatalog` trait
//! - `debounce`: Quiet-period debouncing for the search box
//! - `preferences`: Favorites, watch later, theme, language and notifications
//! - `search`: Search session with pagination
//! - `categories`: Curated home-page categories
//! - `content`: Main content view state
//! - `app_model`: Main application model with state management methods

mod types;
mod store;
mod omdb_client;
mod debounce;
mod preferences;
mod search;
mod categories;
mod content;
mod app_model;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all public types for convenient access
pub use types::{
    ActiveSection, Language, LibraryItem, MovieDetail, MovieSummary, Notification,
    NotificationKind, Theme, UiState,
};

pub use store::PreferenceStore;

pub use omdb_client::{
    normalize_query, ApiResult, ClientError, MovieCatalog, OmdbClient, SearchPage, SharedCatalog,
};

pub use debounce::Debouncer;

pub use preferences::{ListChange, PreferenceContext, PreferenceSnapshot, NOTIFICATION_TTL};

pub use search::{SearchFlow, SearchSession, PAGE_SIZE};

pub use categories::{Category, CategoryFilter, CategoryFlow, CategorySnapshot};

pub use content::{ContentState, ContentView};

pub use app_model::{AppModel, AppSnapshot};
