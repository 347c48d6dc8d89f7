use std::time::Duration;

use anyhow::{Context, Result};
use scraper::Html;
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::models::{Business, BusinessCollection};
use crate::scrapers::fields::{listing_title, read_fields};
use crate::scrapers::traits::MapsPage;
use crate::scrapers::types::{DetailReady, LayoutProfile, ReadinessStrategy};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Click one listing, wait for its detail view and read the profile's fields.
///
/// Page-scoped fields reflect whichever detail view is loaded. With the marker
/// strategy nothing is read until the heading names the clicked listing, or
/// at least differs from the one shown before the click when the listing has
/// no title.
pub fn extract<P: MapsPage>(
    page: &mut P,
    handle: &P::Handle,
    profile: LayoutProfile,
    readiness: ReadinessStrategy,
) -> Result<Business> {
    let listing_html = page
        .listing_html(handle)
        .context("Failed to capture listing element")?;
    let listing_doc = Html::parse_fragment(&listing_html);

    let ready = match listing_title(profile, &listing_doc) {
        Some(title) => DetailReady::Heading(title),
        None => DetailReady::ChangedFrom(page.detail_heading()?),
    };

    page.activate(handle).context("Failed to click listing")?;
    wait_for_detail(page, readiness, &ready)?;

    let page_html = page.page_html().context("Failed to capture detail view")?;
    let page_doc = Html::parse_document(&page_html);

    Ok(read_fields(profile, &page_doc, &listing_doc))
}

/// Block until the detail view satisfies `ready`, polling the heading until
/// the timeout is used up
pub fn wait_for_detail<P: MapsPage>(
    page: &mut P,
    readiness: ReadinessStrategy,
    ready: &DetailReady,
) -> Result<()> {
    let timeout = match readiness {
        ReadinessStrategy::Settle(delay) => {
            page.pause(delay);
            return Ok(());
        }
        ReadinessStrategy::Marker { timeout } => timeout,
    };

    let polls = timeout.as_millis().div_ceil(POLL_INTERVAL.as_millis()).max(1);
    for _ in 0..polls {
        let heading = page.detail_heading()?;
        if ready.is_met(heading.as_deref()) {
            return Ok(());
        }
        page.pause(POLL_INTERVAL);
    }

    let heading = page.detail_heading()?;
    if ready.is_met(heading.as_deref()) {
        return Ok(());
    }
    debug!("Detail view still shows {:?}, wanted {:?}", heading, ready);
    Err(ScrapeError::Timeout {
        stage: "listing detail view",
        waited: timeout,
    }
    .into())
}

/// Extract every handle in order. The first failure aborts the whole pass.
pub fn extract_all<P: MapsPage>(
    page: &mut P,
    handles: &[P::Handle],
    profile: LayoutProfile,
    readiness: ReadinessStrategy,
) -> Result<BusinessCollection> {
    let mut businesses = BusinessCollection::new();

    for (idx, handle) in handles.iter().enumerate() {
        let business = extract(page, handle, profile, readiness)
            .with_context(|| format!("Failed to extract listing {}", idx + 1))?;
        debug!(
            "[{}/{}] {} ({:?} stars, {} reviews)",
            idx + 1,
            handles.len(),
            business.name,
            business.reviews_average,
            business.reviews_count
        );
        businesses.push(business);
    }

    info!("Extracted {} businesses", businesses.len());
    Ok(businesses)
}
