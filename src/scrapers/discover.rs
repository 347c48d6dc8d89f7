use anyhow::Result;
use tracing::{debug, info};

use crate::scrapers::traits::MapsPage;
use crate::scrapers::types::DiscoveryPolicy;

/// Scroll the results panel until `target` listings are rendered or the count
/// stops growing, then return up to `target` handles in rendered order.
///
/// There is no iteration cap: a panel whose count keeps changing on every
/// scroll without reaching `target` keeps the loop running.
pub fn discover<P: MapsPage>(
    page: &mut P,
    target: usize,
    policy: DiscoveryPolicy,
) -> Result<Vec<P::Handle>> {
    let mut previous = 0;
    let mut stalls = 0;

    loop {
        page.scroll_forward()?;
        let current = page.rendered_count()?;

        if current >= target {
            let listings = page.listings(target)?;
            info!("Reached target: {} listings discovered", listings.len());
            return Ok(listings);
        }

        if current == previous {
            if stalls < policy.exhaustion_rechecks {
                stalls += 1;
                debug!(
                    "Count unchanged at {}, re-checking ({}/{})",
                    current, stalls, policy.exhaustion_rechecks
                );
                continue;
            }
            let listings = page.listings(current)?;
            info!(
                "Arrived at all available listings: {} discovered",
                listings.len()
            );
            return Ok(listings);
        }

        debug!("Currently rendered: {}", current);
        previous = current;
        stalls = 0;
    }
}
