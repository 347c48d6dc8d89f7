use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::error::ScrapeError;
use crate::scrapers::traits::MapsPage;

/// Scripted results page.
///
/// Each scroll advances to the next count in `counts`; the last count repeats
/// once the script runs out. A click only swaps the detail view after
/// `detail_lag` ticks (heading reads or pauses), so the previous listing's
/// view stays visible in the meantime.
#[derive(Debug, Default)]
pub struct ScriptedPage {
    pub counts: Vec<usize>,
    pub scrolls: usize,
    pub activated: Vec<usize>,
    pub names: Vec<String>,
    pub pages: Vec<String>,
    pub listing_pages: Vec<String>,
    pub detail_lag: usize,
    pub never_renders: Option<usize>,
    pub no_results: bool,
    pub heading_reads: usize,
    pub paused: Vec<Duration>,
    shown: Option<usize>,
    pending: Option<usize>,
    reads_since_click: usize,
}

impl ScriptedPage {
    pub fn with_counts(counts: &[usize]) -> Self {
        Self {
            counts: counts.to_vec(),
            ..Self::default()
        }
    }

    fn tick(&mut self) {
        let Some(pending) = self.pending else {
            return;
        };
        if self.never_renders == Some(pending) {
            return;
        }
        if self.reads_since_click >= self.detail_lag {
            self.shown = Some(pending);
            self.pending = None;
        } else {
            self.reads_since_click += 1;
        }
    }

    fn current(&self) -> usize {
        if self.scrolls == 0 {
            return 0;
        }
        let idx = (self.scrolls - 1).min(self.counts.len().saturating_sub(1));
        self.counts.get(idx).copied().unwrap_or(0)
    }
}

impl MapsPage for ScriptedPage {
    type Handle = usize;

    fn wait_for_results(&mut self) -> Result<()> {
        if self.no_results {
            return Err(ScrapeError::Timeout {
                stage: "search results",
                waited: Duration::from_secs(60),
            }
            .into());
        }
        Ok(())
    }

    fn scroll_forward(&mut self) -> Result<()> {
        self.scrolls += 1;
        Ok(())
    }

    fn rendered_count(&mut self) -> Result<usize> {
        Ok(self.current())
    }

    fn listings(&mut self, n: usize) -> Result<Vec<usize>> {
        Ok((0..n.min(self.current())).collect())
    }

    fn activate(&mut self, handle: &usize) -> Result<()> {
        self.activated.push(*handle);
        self.pending = Some(*handle);
        self.reads_since_click = 0;
        Ok(())
    }

    fn detail_heading(&mut self) -> Result<Option<String>> {
        self.heading_reads += 1;
        self.tick();
        Ok(self.shown.and_then(|idx| self.names.get(idx).cloned()))
    }

    fn pause(&mut self, duration: Duration) {
        self.paused.push(duration);
        self.tick();
    }

    fn page_html(&mut self) -> Result<String> {
        let shown = self.shown.ok_or_else(|| anyhow!("no detail view loaded"))?;
        Ok(self.pages.get(shown).cloned().unwrap_or_default())
    }

    fn listing_html(&mut self, handle: &usize) -> Result<String> {
        Ok(self.listing_pages.get(*handle).cloned().unwrap_or_default())
    }
}
