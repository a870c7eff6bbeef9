//! Curated home-page categories resolved from fixed seed titles

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::omdb_client::SharedCatalog;
use super::preferences::PreferenceContext;
use super::types::MovieSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Trending,
    Action,
    Drama,
    Comedy,
    Thriller,
    KDrama,
    CDrama,
    Bollywood,
    Top10,
    WatchLaterPicks,
}

impl Category {
    /// Load and display order
    pub const ALL: [Category; 10] = [
        Category::Trending,
        Category::Action,
        Category::Drama,
        Category::Comedy,
        Category::Thriller,
        Category::KDrama,
        Category::CDrama,
        Category::Bollywood,
        Category::Top10,
        Category::WatchLaterPicks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Trending => "Trending Now",
            Category::Action => "Action",
            Category::Drama => "Drama",
            Category::Comedy => "Comedy",
            Category::Thriller => "Thriller",
            Category::KDrama => "K-Drama",
            Category::CDrama => "C-Drama",
            Category::Bollywood => "Bollywood",
            Category::Top10 => "Top 10",
            Category::WatchLaterPicks => "Watch Later Picks",
        }
    }

    pub fn seed_titles(self) -> &'static [&'static str] {
        match self {
            Category::Trending => &[
                "Avengers: Endgame",
                "Spider-Man: No Way Home",
                "The Batman",
                "Black Panther",
                "Top Gun: Maverick",
                "Dune",
            ],
            Category::Action => &[
                "John Wick",
                "Fast & Furious",
                "Mission: Impossible",
                "Mad Max: Fury Road",
                "The Matrix",
                "Terminator",
            ],
            Category::Drama => &[
                "The Shawshank Redemption",
                "Forrest Gump",
                "The Godfather",
                "Good Will Hunting",
                "A Beautiful Mind",
                "The Pursuit of Happyness",
            ],
            Category::Comedy => &[
                "Superbad",
                "Anchorman",
                "Step Brothers",
                "Pineapple Express",
                "The Hangover",
                "Deadpool",
            ],
            Category::Thriller => &[
                "Inception",
                "The Dark Knight",
                "Interstellar",
                "Shutter Island",
                "Gone Girl",
                "Se7en",
            ],
            Category::KDrama => &[
                "Parasite",
                "Train to Busan",
                "Oldboy",
                "The Handmaiden",
                "Burning",
                "Decision to Leave",
            ],
            Category::CDrama => &[
                "Hero",
                "Crouching Tiger, Hidden Dragon",
                "House of Flying Daggers",
                "Ip Man",
                "Kung Fu Hustle",
                "Red Cliff",
            ],
            Category::Bollywood => &[
                "3 Idiots",
                "Dangal",
                "Baahubali",
                "Zindagi Na Milegi Dobara",
                "Queen",
                "Andhadhun",
            ],
            Category::Top10 => &[
                "Top Gun: Maverick",
                "Avatar",
                "Titanic",
                "Star Wars",
                "Jurassic Park",
                "The Lion King",
            ],
            Category::WatchLaterPicks => &[
                "Dune",
                "No Time to Die",
                "The Matrix",
                "Blade Runner",
                "Tenet",
                "Oppenheimer",
            ],
        }
    }
}

/// Which sections the home view shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Sidebar position: 0 is "All", then `Category::ALL` in order
    pub fn from_index(index: usize) -> Self {
        match index.checked_sub(1).and_then(|i| Category::ALL.get(i)) {
            Some(category) => CategoryFilter::Only(*category),
            None => CategoryFilter::All,
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CategorySnapshot {
    /// Completed categories in load order
    pub sections: Vec<(Category, Vec<MovieSummary>)>,
    pub loading: bool,
    pub filter: CategoryFilter,
}

impl CategorySnapshot {
    pub fn visible(&self) -> impl Iterator<Item = &(Category, Vec<MovieSummary>)> {
        self.sections
            .iter()
            .filter(|(category, _)| self.filter.matches(*category))
    }

    /// Visible movies flattened in display order
    pub fn visible_movies(&self) -> Vec<MovieSummary> {
        self.visible()
            .flat_map(|(_, movies)| movies.iter().cloned())
            .collect()
    }

    pub fn section(&self, category: Category) -> Option<&[MovieSummary]> {
        self.sections
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, movies)| movies.as_slice())
    }
}

#[derive(Clone)]
pub struct CategoryFlow {
    catalog: SharedCatalog,
    prefs: PreferenceContext,
    state: Arc<Mutex<CategorySnapshot>>,
    generation: Arc<AtomicU64>,
    delay: Duration,
}

impl CategoryFlow {
    pub fn new(catalog: SharedCatalog, prefs: PreferenceContext, delay: Duration) -> Self {
        Self {
            catalog,
            prefs,
            state: Arc::new(Mutex::new(CategorySnapshot::default())),
            generation: Arc::new(AtomicU64::new(0)),
            delay,
        }
    }

    pub async fn snapshot(&self) -> CategorySnapshot {
        self.state.lock().await.clone()
    }

    pub async fn set_filter(&self, filter: CategoryFilter) {
        self.state.lock().await.filter = filter;
    }

    /// Resolve every category's seed titles, one lookup at a time.
    ///
    /// A seed that fails or finds nothing is left out of its category. A
    /// newer pass makes this one stop at its next step.
    pub async fn load_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let language = self.prefs.language().await;
        self.state.lock().await.loading = true;
        tracing::info!(language = language.code(), generation, "Loading categories");

        let mut first = true;
        for category in Category::ALL {
            let mut found = Vec::new();

            for title in category.seed_titles() {
                if !first {
                    tokio::time::sleep(self.delay).await;
                }
                first = false;
                if !self.is_current(generation) {
                    tracing::debug!(generation, "Category load superseded");
                    return;
                }

                match self.catalog.search(title, 1, language).await {
                    Ok(page) => match page.results.into_iter().next() {
                        Some(movie) => found.push(movie),
                        None => tracing::debug!(title, "Seed title returned no results"),
                    },
                    Err(e) => {
                        tracing::warn!(title, category = category.label(), error = %e, "Failed to load seed title");
                    }
                }
            }

            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                return;
            }
            tracing::debug!(category = category.label(), count = found.len(), "Category loaded");
            match state.sections.iter_mut().find(|(c, _)| *c == category) {
                Some((_, movies)) => *movies = found,
                None => state.sections.push((category, found)),
            }
        }

        if self.is_current(generation) {
            self.state.lock().await.loading = false;
            tracing::info!("Categories loaded");
        }
    }

    pub fn spawn_load(&self) -> JoinHandle<()> {
        let flow = self.clone();
        tokio::spawn(async move { flow.load_all().await })
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::omdb_client::ClientError;
    use crate::model::store::PreferenceStore;
    use crate::model::testing::{movie, FakeCatalog};
    use crate::model::types::Language;

    /// Every seed title resolves to a single movie with the title as id
    fn full_catalog() -> FakeCatalog {
        Category::ALL
            .iter()
            .flat_map(|c| c.seed_titles().iter())
            .fold(FakeCatalog::default(), |catalog, title| {
                catalog.with_page(title, 1, vec![movie(title, title)], 1)
            })
    }

    async fn flow_with(catalog: FakeCatalog) -> (CategoryFlow, Arc<FakeCatalog>, PreferenceContext) {
        let catalog = Arc::new(catalog);
        let prefs = PreferenceContext::load(PreferenceStore::in_memory()).await;
        let flow = CategoryFlow::new(catalog.clone(), prefs.clone(), Duration::from_millis(100));
        (flow, catalog, prefs)
    }

    #[tokio::test(start_paused = true)]
    async fn loads_every_category_in_order() {
        let (flow, catalog, _) = flow_with(full_catalog()).await;
        flow.load_all().await;

        let snapshot = flow.snapshot().await;
        assert!(!snapshot.loading);
        let order: Vec<Category> = snapshot.sections.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::ALL.to_vec());
        for (category, movies) in &snapshot.sections {
            assert_eq!(movies.len(), 6, "{category:?}");
        }
        assert_eq!(catalog.calls().len(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_seeds_are_omitted() {
        let catalog = full_catalog()
            .with_error("Dune", 1, ClientError::Status(500))
            .with_page("Se7en", 1, Vec::new(), 0);
        let (flow, _, _) = flow_with(catalog).await;
        flow.load_all().await;

        let snapshot = flow.snapshot().await;
        let trending = snapshot.section(Category::Trending).unwrap();
        assert_eq!(trending.len(), 5);
        assert!(trending.iter().all(|m| m.id != "Dune"));
        assert_eq!(snapshot.section(Category::Thriller).unwrap().len(), 5);
        assert_eq!(snapshot.section(Category::WatchLaterPicks).unwrap().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn takes_first_result_only() {
        let catalog = full_catalog().with_page(
            "Avatar",
            1,
            vec![movie("tt0499549", "Avatar"), movie("tt1630029", "Avatar 2")],
            2,
        );
        let (flow, _, _) = flow_with(catalog).await;
        flow.load_all().await;

        let top10 = flow.snapshot().await.section(Category::Top10).unwrap().to_vec();
        assert!(top10.iter().any(|m| m.id == "tt0499549"));
        assert!(top10.iter().all(|m| m.id != "tt1630029"));
    }

    #[tokio::test(start_paused = true)]
    async fn sections_appear_incrementally() {
        let (flow, _, _) = flow_with(full_catalog()).await;
        let handle = flow.spawn_load();

        // Six lookups with five pauses between them finish the first category
        tokio::time::sleep(Duration::from_millis(550)).await;
        let snapshot = flow.snapshot().await;
        assert!(snapshot.loading);
        assert_eq!(snapshot.sections.len(), 1);
        assert_eq!(snapshot.sections[0].0, Category::Trending);

        handle.await.unwrap();
        assert_eq!(flow.snapshot().await.sections.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_pass_supersedes_older() {
        let (flow, catalog, prefs) = flow_with(full_catalog()).await;
        let first = flow.spawn_load();
        tokio::time::sleep(Duration::from_millis(250)).await;

        prefs.set_language(Language::Ja).await;
        flow.load_all().await;
        first.await.unwrap();

        let calls = catalog.calls();
        let japanese = calls.iter().filter(|(_, _, l)| *l == Language::Ja).count();
        assert_eq!(japanese, 60);
        assert!(calls.len() < 120);
        assert!(!flow.snapshot().await.loading);
    }

    #[tokio::test]
    async fn filter_selects_visible_sections() {
        let mut snapshot = CategorySnapshot {
            sections: vec![
                (Category::Trending, vec![movie("a", "A")]),
                (Category::Drama, vec![movie("b", "B"), movie("c", "C")]),
            ],
            ..CategorySnapshot::default()
        };
        assert_eq!(snapshot.visible_movies().len(), 3);

        snapshot.filter = CategoryFilter::from_index(3);
        assert_eq!(snapshot.filter, CategoryFilter::Only(Category::Drama));
        let ids: Vec<String> = snapshot.visible_movies().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["b", "c"]);

        assert_eq!(CategoryFilter::from_index(0), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_index(99), CategoryFilter::All);
    }
}
