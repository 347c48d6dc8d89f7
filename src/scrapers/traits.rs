use crate::models::BusinessCollection;
use crate::scrapers::types::SearchParams;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Common trait for listing scrapers, so the binary does not care which
/// browser backend produced the collection
#[async_trait]
pub trait ListingScraper: Send + Sync {
    /// Run a full search and return one business per discovered listing
    async fn scrape(&self, params: &SearchParams) -> Result<BusinessCollection>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}

/// A live maps results page.
///
/// The discoverer and extractor only talk to the browser through this trait.
/// Handles are opaque and only valid while the page is alive.
pub trait MapsPage {
    type Handle;

    /// Block until the first search result is rendered, or fail with a timeout
    fn wait_for_results(&mut self) -> Result<()>;

    /// Scroll the results panel forward far enough to trigger lazy loading
    fn scroll_forward(&mut self) -> Result<()>;

    /// Number of result elements currently rendered
    fn rendered_count(&mut self) -> Result<usize>;

    /// The first `n` rendered result elements, in rendered order
    fn listings(&mut self, n: usize) -> Result<Vec<Self::Handle>>;

    /// Click a listing so its detail view loads
    fn activate(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Heading text of the detail view currently shown, if any
    fn detail_heading(&mut self) -> Result<Option<String>>;

    /// Let the page work for a while
    fn pause(&mut self, duration: Duration);

    /// HTML of the page, including the currently loaded detail view
    fn page_html(&mut self) -> Result<String>;

    /// Outer HTML of the listing element itself
    fn listing_html(&mut self, handle: &Self::Handle) -> Result<String>;
}
