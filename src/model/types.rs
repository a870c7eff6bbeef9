//! Core type definitions for the application

use std::fmt;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OMDb's marker for a missing field value
pub const NOT_AVAILABLE: &str = "N/A";

/// A movie as returned by a title search.
///
/// Field names follow the OMDb wire format so persisted lists can be read
/// back by anything that speaks it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default, with = "poster_marker")]
    pub poster: Option<String>,
    #[serde(rename = "Type", default)]
    pub media_type: String,
}

mod poster_marker {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::NOT_AVAILABLE;

    pub fn serialize<S: Serializer>(poster: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(poster.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.filter(|p| !p.is_empty() && p != NOT_AVAILABLE))
    }
}

/// Full detail record for a single title
#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetail {
    pub summary: MovieSummary,
    pub plot: Option<String>,
    pub runtime: Option<String>,
    pub rating: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub genres: Vec<String>,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub awards: Option<String>,
}

impl MovieDetail {
    /// IMDb rating (out of 10) mapped onto five stars
    pub fn star_rating(&self) -> u8 {
        let score = self
            .rating
            .as_deref()
            .and_then(|r| r.parse::<f32>().ok())
            .unwrap_or(0.0);
        (score / 2.0).round().clamp(0.0, 5.0) as u8
    }

    pub fn release_date(&self) -> Option<NaiveDate> {
        self.released
            .as_deref()
            .and_then(|r| NaiveDate::parse_from_str(r, "%d %b %Y").ok())
    }

    /// YouTube search link for the title's trailer
    pub fn trailer_search_url(&self) -> String {
        let term = format!("{} {} trailer", self.summary.title, self.summary.year);
        reqwest::Url::parse_with_params("https://www.youtube.com/results", &[("search_query", term)])
            .map(|u| u.to_string())
            .unwrap_or_default()
    }
}

/// Color scheme preference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Preferred result language
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Hi,
    Ja,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::Hi,
        Language::Ja,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Hi => "hi",
            Language::Ja => "ja",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::Hi => "हिन्दी",
            Language::Ja => "日本語",
        }
    }

    /// Keywords whose presence in a title or plot suggests the language's cinema
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Language::En => &[],
            Language::Es => &["spanish", "españa", "mexico", "argentina"],
            Language::Fr => &["french", "france", "français"],
            Language::Hi => &["bollywood", "hindi", "india", "indian"],
            Language::Ja => &["japanese", "japan", "anime"],
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.native_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
}

/// Transient status message shown over the UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Library,
    Categories,
    MainContent,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Library,
            ActiveSection::Library => ActiveSection::Categories,
            ActiveSection::Categories => ActiveSection::MainContent,
            ActiveSection::MainContent => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::MainContent,
            ActiveSection::Library => ActiveSection::Search,
            ActiveSection::Categories => ActiveSection::Library,
            ActiveSection::MainContent => ActiveSection::Categories,
        }
    }
}

/// An entry in the Library sidebar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibraryItem {
    Home,
    SearchResults,
    Favorites,
    WatchLater,
}

impl LibraryItem {
    pub const ALL: [LibraryItem; 4] = [
        LibraryItem::Home,
        LibraryItem::SearchResults,
        LibraryItem::Favorites,
        LibraryItem::WatchLater,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LibraryItem::Home => "Home",
            LibraryItem::SearchResults => "Search results",
            LibraryItem::Favorites => "Favorites",
            LibraryItem::WatchLater => "Watch later",
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub library_selected: usize,
    /// 0 is "All", then one entry per category
    pub category_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            library_selected: 0,
            category_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
