//! OMDb API client and the catalog seam the flows are written against

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::{log_api_request, log_api_result};
use super::types::{Language, MovieDetail, MovieSummary, NOT_AVAILABLE};

pub type ApiResult<T> = Result<T, ClientError>;

/// Every way a metadata request can fail.
///
/// The `Display` text is what the user sees, so each variant reads as a
/// complete sentence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("API key not configured. Set OMDB_API_KEY or add omdb_api_key to config.json.")]
    Configuration,

    #[error("Network error. Please check your internet connection.")]
    Transport { detail: String },

    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The service answered but declined, e.g. "Movie not found!"
    #[error("{0}")]
    UpstreamDeclined(String),

    #[error("Unexpected response from the movie service: {0}")]
    Decode(String),

    #[error("Nothing to look up")]
    EmptyInput,
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            ClientError::Status(status.as_u16())
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport { detail: e.to_string() }
        }
    }
}

/// One page of search results
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<MovieSummary>,
    pub total_results: u32,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Source of movie metadata.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search titles. An empty query yields an empty page without a request.
    async fn search(&self, query: &str, page: u32, language: Language) -> ApiResult<SearchPage>;

    async fn get_detail(&self, id: &str) -> ApiResult<MovieDetail>;
}

pub type SharedCatalog = Arc<dyn MovieCatalog>;

#[derive(Debug, Deserialize)]
struct SearchRow {
    #[serde(flatten)]
    summary: MovieSummary,
    #[serde(rename = "Plot")]
    plot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "Search", default)]
    search: Vec<SearchRow>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    #[serde(flatten)]
    summary: MovieSummary,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    rating: Option<String>,
    #[serde(rename = "Rated")]
    rated: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Awards")]
    awards: Option<String>,
}

impl From<DetailBody> for MovieDetail {
    fn from(body: DetailBody) -> Self {
        Self {
            summary: body.summary,
            plot: present(body.plot),
            runtime: present(body.runtime),
            rating: present(body.rating),
            rated: present(body.rated),
            released: present(body.released),
            genres: split_list(body.genre),
            director: present(body.director),
            cast: split_list(body.actors),
            awards: present(body.awards),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}

fn split_list(value: Option<String>) -> Vec<String> {
    present(value)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Trim, lowercase, then capitalize the first letter of every word.
pub fn normalize_query(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Move rows mentioning one of the language's keywords to the front.
///
/// Stable on both partitions; with no matches the order is untouched.
fn prioritize_language(rows: Vec<SearchRow>, language: Language) -> Vec<SearchRow> {
    let keywords = language.keywords();
    if keywords.is_empty() {
        return rows;
    }

    let (matches, rest): (Vec<_>, Vec<_>) = rows.into_iter().partition(|row| {
        let title = row.summary.title.to_lowercase();
        let plot = row.plot.as_deref().unwrap_or_default().to_lowercase();
        keywords.iter().any(|k| title.contains(k) || plot.contains(k))
    });

    if matches.is_empty() {
        return rest;
    }
    matches.into_iter().chain(rest).collect()
}

/// OMDb HTTP client
#[derive(Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("CineScope/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn api_key(&self) -> ApiResult<&str> {
        self.api_key.as_deref().ok_or(ClientError::Configuration)
    }

    /// Issue one GET and unwrap OMDb's `Response` envelope.
    async fn fetch(&self, params: &[(&str, String)]) -> ApiResult<Value> {
        let api_key = self.api_key()?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", api_key)])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        match body.get("Response").and_then(Value::as_str) {
            Some("True") => Ok(body),
            _ => {
                let message = body
                    .get("Error")
                    .and_then(Value::as_str)
                    .unwrap_or("The movie service returned no data")
                    .to_string();
                Err(ClientError::UpstreamDeclined(message))
            }
        }
    }

    async fn search_once(&self, term: &str, page: u32) -> ApiResult<(Vec<SearchRow>, u32)> {
        log_api_request!("search", term, page);
        let body = self
            .fetch(&[
                ("s", term.to_string()),
                ("page", page.to_string()),
                ("type", "movie".to_string()),
            ])
            .await?;

        let parsed: SearchBody =
            serde_json::from_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        let total = parsed
            .total_results
            .as_deref()
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(parsed.search.len() as u32);
        Ok((parsed.search, total))
    }

    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
        language: Language,
    ) -> ApiResult<SearchPage> {
        if query.trim().is_empty() {
            return Ok(SearchPage::empty());
        }
        self.api_key()?;

        let page = page.max(1);
        let normalized = normalize_query(query);

        let mut result = self.search_once(&normalized, page).await;
        if matches!(result, Err(ClientError::UpstreamDeclined(_))) && normalized != query {
            tracing::debug!(normalized = %normalized, raw = query, "No matches for normalized query, retrying raw");
            result = self.search_once(query, page).await;
        }
        log_api_result!("search", result);

        let (rows, total) = result?;
        let results = prioritize_language(rows, language)
            .into_iter()
            .map(|row| row.summary)
            .collect();

        Ok(SearchPage {
            results,
            total_results: total,
        })
    }

    pub async fn movie_details(&self, id: &str) -> ApiResult<MovieDetail> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ClientError::EmptyInput);
        }

        log_api_request!("detail", id);
        let result = self
            .fetch(&[("i", id.to_string()), ("plot", "full".to_string())])
            .await
            .and_then(|body| {
                serde_json::from_value::<DetailBody>(body)
                    .map(MovieDetail::from)
                    .map_err(|e| ClientError::Decode(e.to_string()))
            });
        log_api_result!("detail", result);
        result
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn search(&self, query: &str, page: u32, language: Language) -> ApiResult<SearchPage> {
        self.search_movies(query, page, language).await
    }

    async fn get_detail(&self, id: &str) -> ApiResult<MovieDetail> {
        self.movie_details(id).await
    }
}
