//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input
//! and coordinates between the model and view.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `navigation`: Library/category/search/detail navigation
//! - `preferences`: Favorites, watch later, theme and language actions

mod input;
mod navigation;
mod preferences;

use std::sync::Arc;

use crate::model::{AppModel, ClientError, Debouncer};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: AppModel,
    pub(crate) search_input: Arc<Debouncer<String>>,
}

impl AppController {
    /// `search_input` receives every edit of the search box; whatever it
    /// settles on should already be attached to the model's search flow.
    pub fn new(model: AppModel, search_input: Arc<Debouncer<String>>) -> Self {
        Self { model, search_input }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub(crate) fn format_error(error: &ClientError) -> String {
        match error {
            ClientError::Status(401) => {
                "Invalid API key. Check OMDB_API_KEY and restart.".to_string()
            }
            ClientError::Status(429) => "Rate limited. Please wait a moment.".to_string(),
            ClientError::UpstreamDeclined(message) if message.contains("limit reached") => {
                "Daily request limit reached. Try again tomorrow.".to_string()
            }
            ClientError::UpstreamDeclined(message) if message.trim().is_empty() => {
                "Something went wrong.".to_string()
            }
            ClientError::EmptyInput => "Nothing selected.".to_string(),
            other => other.to_string(),
        }
    }
}
