//! Debounced search with incremental pagination

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::omdb_client::{ApiResult, SearchPage, SharedCatalog};
use super::preferences::PreferenceContext;
use super::types::MovieSummary;

/// OMDb always pages in tens
pub const PAGE_SIZE: usize = 10;
pub const FALLBACK_ERROR: &str = "Something went wrong.";

/// Results for the current (debounced) query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchSession {
    pub query: String,
    /// 1-based; 0 while idle
    pub page: u32,
    pub results: Vec<MovieSummary>,
    pub total_results: u32,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchSession {
    pub fn is_idle(&self) -> bool {
        self.query.is_empty()
    }

    fn has_more_after(&self, page_len: usize) -> bool {
        page_len >= PAGE_SIZE && (self.results.len() as u64) <= u64::from(self.total_results)
    }
}

fn error_message(message: String) -> String {
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}

/// Owns the search session and applies catalog responses to it.
///
/// Every request is stamped with the generation current when it was issued;
/// responses from an older generation are dropped so a slow, superseded
/// query can never overwrite a newer one.
#[derive(Clone)]
pub struct SearchFlow {
    catalog: SharedCatalog,
    prefs: PreferenceContext,
    session: Arc<Mutex<SearchSession>>,
    generation: Arc<AtomicU64>,
}

impl SearchFlow {
    pub fn new(catalog: SharedCatalog, prefs: PreferenceContext) -> Self {
        Self {
            catalog,
            prefs,
            session: Arc::new(Mutex::new(SearchSession::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn snapshot(&self) -> SearchSession {
        self.session.lock().await.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Start over with `query`: page 1, no results, fresh request.
    pub async fn run_query(&self, query: String) {
        let query = query.trim().to_string();

        // Stamped under the session lock so the newest generation always
        // owns the session's query
        let generation = {
            let mut session = self.session.lock().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if query.is_empty() {
                *session = SearchSession::default();
                return;
            }
            *session = SearchSession {
                query: query.clone(),
                page: 1,
                loading: true,
                ..SearchSession::default()
            };
            generation
        };

        let language = self.prefs.language().await;
        tracing::debug!(query = %query, language = language.code(), generation, "Performing search");
        let outcome = self.catalog.search(&query, 1, language).await;

        if !self.is_current(generation) {
            tracing::debug!(query = %query, generation, "Discarding stale search response");
            return;
        }
        self.apply_first_page(outcome).await;
    }

    async fn apply_first_page(&self, outcome: ApiResult<SearchPage>) {
        let mut session = self.session.lock().await;
        session.loading = false;

        match outcome {
            Ok(page) => {
                let page_len = page.results.len();
                session.results = page.results;
                session.total_results = page.total_results;
                session.has_more = session.has_more_after(page_len);
                session.error = None;
                tracing::info!(
                    query = %session.query,
                    results = page_len,
                    total = session.total_results,
                    "Search completed successfully"
                );
            }
            Err(e) => {
                tracing::warn!(query = %session.query, error = %e, "Search failed");
                session.results.clear();
                session.total_results = 0;
                session.has_more = false;
                session.error = Some(error_message(e.to_string()));
            }
        }
    }

    /// Fetch the next page of the current query and append it.
    pub async fn load_more(&self) {
        let generation = self.generation.load(Ordering::SeqCst);
        let (query, next_page) = {
            let mut session = self.session.lock().await;
            if session.is_idle() || session.loading || !session.has_more {
                return;
            }
            session.loading = true;
            (session.query.clone(), session.page + 1)
        };

        let language = self.prefs.language().await;
        tracing::debug!(query = %query, page = next_page, "Loading more results");
        let outcome = self.catalog.search(&query, next_page, language).await;

        if !self.is_current(generation) {
            tracing::debug!(query = %query, page = next_page, "Discarding stale page");
            return;
        }

        let mut session = self.session.lock().await;
        session.loading = false;
        match outcome {
            Ok(page) => {
                let page_len = page.results.len();
                session.page = next_page;
                session.results.extend(page.results);
                if page.total_results > 0 {
                    session.total_results = page.total_results;
                }
                session.has_more = session.has_more_after(page_len);
                tracing::info!(
                    query = %query,
                    page = next_page,
                    loaded = page_len,
                    has_more = session.has_more,
                    "Loaded more results"
                );
            }
            Err(e) => {
                // Keep what we already have; just stop paging
                tracing::warn!(query = %query, page = next_page, error = %e, "Load more failed");
                session.has_more = false;
            }
        }
    }

    /// Re-run the current query, e.g. after the language changed.
    pub async fn refresh(&self) {
        let query = self.session.lock().await.query.clone();
        if !query.is_empty() {
            self.run_query(query).await;
        }
    }

    /// Run a fresh search for every value the debounced input settles on.
    ///
    /// Each search runs in its own task so a slow response never delays the
    /// next query; stale answers are dropped by the generation check.
    pub fn attach(&self, mut settled: watch::Receiver<String>) -> JoinHandle<()> {
        let flow = self.clone();
        tokio::spawn(async move {
            while settled.changed().await.is_ok() {
                let query = settled.borrow_and_update().clone();
                let flow = flow.clone();
                tokio::spawn(async move { flow.run_query(query).await });
            }
        })
    }
}
