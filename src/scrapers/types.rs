use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to search for and how many listings to collect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Text typed into the maps search box
    pub query: String,
    /// Target number of listings
    pub total: usize,
}

/// Page-layout version the selectors are written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutProfile {
    /// Older results layout; has no website rule
    Classic,
    #[default]
    Current,
}

/// How the extractor decides the detail view has rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessStrategy {
    /// Wait until the profile's detail marker is present, up to the timeout
    Marker { timeout: Duration },
    /// Sleep for a fixed delay after each click
    Settle(Duration),
}

/// Controls when the discoverer gives up waiting for more results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscoveryPolicy {
    /// Extra scroll rounds with an unchanged count before the list is treated
    /// as exhausted. Zero stops on the first unchanged count.
    pub exhaustion_rechecks: u32,
}

/// What the detail view heading must show before fields are read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailReady {
    /// The heading equals the clicked listing's title
    Heading(String),
    /// Any heading other than the one shown before the click
    ChangedFrom(Option<String>),
}

impl DetailReady {
    pub fn is_met(&self, heading: Option<&str>) -> bool {
        let Some(heading) = heading.map(collapse_whitespace) else {
            return false;
        };
        match self {
            DetailReady::Heading(expected) => heading == collapse_whitespace(expected),
            DetailReady::ChangedFrom(previous) => {
                previous.as_deref().map(collapse_whitespace) != Some(heading)
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
