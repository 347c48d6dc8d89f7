use anyhow::Result;
use tracing::info;

use crate::models::BusinessCollection;
use crate::scrapers::discover::discover;
use crate::scrapers::extract::extract_all;
use crate::scrapers::traits::MapsPage;
use crate::scrapers::types::{DiscoveryPolicy, LayoutProfile, ReadinessStrategy};

/// Per-run knobs for [`collect_listings`]
#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    pub profile: LayoutProfile,
    pub readiness: ReadinessStrategy,
    pub discovery: DiscoveryPolicy,
}

/// Wait for the first result, discover up to `target` listings and extract
/// each one. A search whose results never render fails instead of producing
/// an empty collection.
pub fn collect_listings<P: MapsPage>(
    page: &mut P,
    target: usize,
    options: CollectOptions,
) -> Result<BusinessCollection> {
    page.wait_for_results()?;

    let handles = discover(page, target, options.discovery)?;
    info!("Total discovered: {}", handles.len());

    extract_all(page, &handles, options.profile, options.readiness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::scrapers::testing::ScriptedPage;
    use std::time::Duration;

    fn options() -> CollectOptions {
        CollectOptions {
            profile: LayoutProfile::Classic,
            readiness: ReadinessStrategy::Marker {
                timeout: Duration::from_secs(5),
            },
            discovery: DiscoveryPolicy::default(),
        }
    }

    #[test]
    fn results_that_never_render_abort_the_run() {
        let mut page = ScriptedPage::with_counts(&[0]);
        page.no_results = true;

        let err = collect_listings(&mut page, 120, options()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::Timeout { stage: "search results", .. })
        ));
        assert_eq!(page.scrolls, 0);
    }

    #[test]
    fn rendered_results_flow_through_discovery_and_extraction() {
        let mut page = ScriptedPage::with_counts(&[2, 2]);
        page.names = vec!["Alpha".to_string(), "Bravo".to_string()];
        page.pages = page
            .names
            .iter()
            .map(|n| format!(r#"<html><body><h1 class="DUwDvf lfPIob">{n}</h1></body></html>"#))
            .collect();

        let businesses = collect_listings(&mut page, 120, options()).unwrap();

        let names: Vec<_> = businesses.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
    }
}
