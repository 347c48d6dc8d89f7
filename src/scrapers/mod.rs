pub mod browser;
pub mod discover;
pub mod extract;
pub mod fields;
pub mod pipeline;
#[cfg(test)]
mod testing;
pub mod traits;
pub mod types;

pub use browser::{BrowserOptions, MapsBrowserScraper};
pub use traits::ListingScraper;
pub use types::{DiscoveryPolicy, LayoutProfile, ReadinessStrategy, SearchParams};
