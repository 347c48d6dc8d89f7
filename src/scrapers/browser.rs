use crate::error::ScrapeError;
use crate::models::BusinessCollection;
use crate::scrapers::pipeline::{collect_listings, CollectOptions};
use crate::scrapers::traits::{ListingScraper, MapsPage};
use crate::scrapers::types::{DiscoveryPolicy, LayoutProfile, ReadinessStrategy, SearchParams};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const SEARCH_BOX: &str = "input#searchboxinput";

/// Scroll distance per step; large enough to hit the bottom of the feed.
const SCROLL_DELTA: u32 = 200_000;

/// Settings for one browser-driven scrape
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub base_url: String,
    pub headless: bool,
    pub profile: LayoutProfile,
    pub readiness: ReadinessStrategy,
    pub discovery: DiscoveryPolicy,
    pub navigation_timeout: Duration,
    pub element_timeout: Duration,
    pub scroll_pause: Duration,
}

impl BrowserOptions {
    fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            profile: self.profile,
            readiness: self.readiness,
            discovery: self.discovery,
        }
    }
}

/// One Chrome process and the tab driving it.
///
/// Dropping the session closes the tab and, with the `Browser`, the Chrome
/// process, so every exit path out of a scrape releases it.
pub struct BrowserSession {
    tab: Arc<Tab>,
    _browser: Browser,
}

impl BrowserSession {
    pub fn launch(options: &BrowserOptions) -> Result<Self> {
        info!("Launching Chrome (headless: {})...", options.headless);

        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .window_size(Some((1280, 900)))
            .idle_browser_timeout(options.navigation_timeout * 2)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(launch_options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open tab")?;
        tab.set_default_timeout(options.navigation_timeout);

        Ok(Self {
            tab,
            _browser: browser,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("Closing browser session");
        if let Err(e) = self.tab.close(false) {
            debug!("Tab close failed: {e:#}");
        }
    }
}

/// Turn a failed browser wait into an error.
///
/// A wait that used up its whole limit is a [`ScrapeError::Timeout`]; one that
/// failed earlier is a browser failure and keeps its cause.
fn wait_failure(
    err: anyhow::Error,
    elapsed: Duration,
    limit: Duration,
    stage: &'static str,
) -> anyhow::Error {
    if elapsed >= limit {
        debug!("Waiting for {stage} gave up: {err:#}");
        ScrapeError::Timeout {
            stage,
            waited: limit,
        }
        .into()
    } else {
        err.context(format!("Browser failed while waiting for {stage}"))
    }
}

/// Read the number returned by the listing-count script
fn listing_count(value: Option<&serde_json::Value>) -> Result<usize> {
    let count = value
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| anyhow!("got {:?}", value))
        .context("Listing count was not a number")?;
    usize::try_from(count).context("Listing count out of range")
}

/// Google Maps scraper driving a real Chrome instance
#[derive(Debug, Clone)]
pub struct MapsBrowserScraper {
    options: BrowserOptions,
}

impl MapsBrowserScraper {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    /// Launch Chrome, search, discover and extract. Blocking.
    pub fn scrape_blocking(&self, params: &SearchParams) -> Result<BusinessCollection> {
        let session = BrowserSession::launch(&self.options)?;
        let tab = session.tab();

        self.open_search(tab, &params.query)?;

        let mut page = BrowserPage::new(tab, &self.options);
        collect_listings(&mut page, params.total, self.options.collect_options())
    }

    fn open_search(&self, tab: &Tab, query: &str) -> Result<()> {
        info!("Opening {}...", self.options.base_url);
        tab.navigate_to(&self.options.base_url)
            .context("Failed to navigate to maps")?;

        let started = Instant::now();
        tab.wait_until_navigated().map_err(|e| {
            wait_failure(
                e,
                started.elapsed(),
                self.options.navigation_timeout,
                "maps page navigation",
            )
        })?;

        dismiss_consent(tab);

        let started = Instant::now();
        let search_box = tab
            .wait_for_element_with_custom_timeout(SEARCH_BOX, self.options.element_timeout)
            .map_err(|e| {
                wait_failure(e, started.elapsed(), self.options.element_timeout, "search box")
            })?;

        info!("Searching for {:?}", query);
        search_box
            .click()
            .context("Failed to focus search box")?
            .type_into(query)
            .context("Failed to type search query")?;
        tab.press_key("Enter").context("Failed to submit search")?;

        Ok(())
    }
}

#[async_trait]
impl ListingScraper for MapsBrowserScraper {
    async fn scrape(&self, params: &SearchParams) -> Result<BusinessCollection> {
        let scraper = self.clone();
        let params = params.clone();
        tokio::task::spawn_blocking(move || scraper.scrape_blocking(&params))
            .await
            .context("Scrape task panicked")?
    }

    fn source_name(&self) -> &'static str {
        "Google Maps"
    }
}

/// Best effort click on the cookie consent dialog, if one is shown
fn dismiss_consent(tab: &Tab) {
    let _ = tab.evaluate(
        r#"
        const button = document.querySelector('form[action*="consent"] button, button[aria-label*="Accept all"]');
        if (button) button.click();
        "#,
        false,
    );
}

/// [`MapsPage`] over a live Chrome tab
pub struct BrowserPage<'a> {
    tab: &'a Tab,
    profile: LayoutProfile,
    navigation_timeout: Duration,
    scroll_pause: Duration,
}

impl<'a> BrowserPage<'a> {
    pub fn new(tab: &'a Tab, options: &BrowserOptions) -> Self {
        Self {
            tab,
            profile: options.profile,
            navigation_timeout: options.navigation_timeout,
            scroll_pause: options.scroll_pause,
        }
    }

    fn js_literal(text: &str) -> Result<String> {
        serde_json::to_string(text).context("Failed to encode selector")
    }
}

impl<'a> MapsPage for BrowserPage<'a> {
    type Handle = Element<'a>;

    /// Results can take a while after the search is submitted, so this waits
    /// as long as a navigation. The first result is hovered so scrolling
    /// targets the feed.
    fn wait_for_results(&mut self) -> Result<()> {
        let started = Instant::now();
        let first = self
            .tab
            .wait_for_element_with_custom_timeout(
                self.profile.listing_selector(),
                self.navigation_timeout,
            )
            .map_err(|e| {
                wait_failure(e, started.elapsed(), self.navigation_timeout, "search results")
            })?;

        if let Err(e) = first.move_mouse_over() {
            debug!("Hover on first listing failed: {e:#}");
        }
        Ok(())
    }

    fn scroll_forward(&mut self) -> Result<()> {
        let script = format!(
            r#"
            (function () {{
                const first = document.querySelector({selector});
                const feed = first ? (first.closest('div[role="feed"]') || first.parentElement) : null;
                if (feed) feed.scrollBy(0, {delta});
                return feed !== null;
            }})()
            "#,
            selector = Self::js_literal(self.profile.listing_selector())?,
            delta = SCROLL_DELTA,
        );
        self.tab
            .evaluate(&script, false)
            .context("Failed to scroll results panel")?;
        thread::sleep(self.scroll_pause);
        Ok(())
    }

    fn rendered_count(&mut self) -> Result<usize> {
        let script = format!(
            "document.querySelectorAll({}).length",
            Self::js_literal(self.profile.listing_selector())?
        );
        let result = self
            .tab
            .evaluate(&script, false)
            .context("Failed to count listings")?;

        listing_count(result.value.as_ref())
    }

    fn listings(&mut self, n: usize) -> Result<Vec<Element<'a>>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut elements = self
            .tab
            .find_elements(self.profile.listing_selector())
            .context("Failed to collect listing elements")?;
        elements.truncate(n);
        Ok(elements)
    }

    fn activate(&mut self, handle: &Element<'a>) -> Result<()> {
        handle.click()?;
        Ok(())
    }

    fn detail_heading(&mut self) -> Result<Option<String>> {
        let script = format!(
            r#"
            (function () {{
                const heading = document.querySelector({marker});
                return heading ? heading.innerText : null;
            }})()
            "#,
            marker = Self::js_literal(self.profile.detail_marker())?,
        );
        let result = self
            .tab
            .evaluate(&script, false)
            .context("Failed to read detail heading")?;

        Ok(result
            .value
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(str::to_string))
    }

    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn page_html(&mut self) -> Result<String> {
        self.tab.get_content()
    }

    fn listing_html(&mut self, handle: &Element<'a>) -> Result<String> {
        handle.get_content()
    }
}
