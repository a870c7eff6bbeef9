//! In-memory catalog for exercising the flows without HTTP

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::omdb_client::{ApiResult, ClientError, MovieCatalog, SearchPage};
use super::types::{Language, MovieDetail, MovieSummary};

pub fn movie(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year: "2010".into(),
        poster: None,
        media_type: "movie".into(),
    }
}

/// `count` movies with ids `{prefix}-{start}..`
pub fn movies(prefix: &str, start: usize, count: usize) -> Vec<MovieSummary> {
    (start..start + count)
        .map(|n| movie(&format!("{prefix}-{n}"), &format!("{prefix} {n}")))
        .collect()
}

#[derive(Default)]
pub struct FakeCatalog {
    pages: Mutex<HashMap<(String, u32), ApiResult<SearchPage>>>,
    delays: Mutex<HashMap<String, Duration>>,
    details: Mutex<HashMap<String, MovieDetail>>,
    calls: Mutex<Vec<(String, u32, Language)>>,
}

impl FakeCatalog {
    pub fn with_page(self, query: &str, page: u32, results: Vec<MovieSummary>, total: u32) -> Self {
        self.pages.lock().unwrap().insert(
            (query.to_string(), page),
            Ok(SearchPage {
                results,
                total_results: total,
            }),
        );
        self
    }

    pub fn with_error(self, query: &str, page: u32, error: ClientError) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), Err(error));
        self
    }

    /// Every search for `query` (or detail lookup for that id) takes `delay`
    pub fn with_delay(self, query: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
        self
    }

    pub fn with_detail(self, detail: MovieDetail) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(detail.summary.id.clone(), detail);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32, Language)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    async fn search(&self, query: &str, page: u32, language: Language) -> ApiResult<SearchPage> {
        if query.trim().is_empty() {
            return Ok(SearchPage::empty());
        }
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), page, language));

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_else(|| Err(ClientError::UpstreamDeclined("Movie not found!".into())))
    }

    async fn get_detail(&self, id: &str) -> ApiResult<MovieDetail> {
        let delay = self.delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::UpstreamDeclined("Incorrect IMDb ID.".into()))
    }
}
