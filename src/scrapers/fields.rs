//! Declarative field tables for the maps detail view.
//!
//! Each [`LayoutProfile`] owns one table. A rule says where a field lives
//! (page or listing subtree), which CSS selector finds it and what to read
//! off the first match. A missing element leaves the field at its default.

use scraper::{Html, Selector};
use tracing::warn;

use crate::models::Business;
use crate::scrapers::types::LayoutProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Address,
    Website,
    /// Fills both `reviews_average` and `reviews_count`
    Rating,
    Category,
    Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The whole page, which holds whichever detail view is loaded
    Page,
    /// The clicked listing element's own subtree
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    Text,
    Attribute(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub scope: Scope,
    pub selector: &'static str,
    pub read: Read,
}

const ADDRESS_SELECTOR: &str = r#"button[data-item-id="address"] div[class*="fontBodyMedium"]"#;
const CATEGORY_SELECTOR: &str = "button.DkEaL";
const COORDINATE_SELECTOR: &str = r#"meta[itemprop="image"]"#;

const CLASSIC_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        scope: Scope::Page,
        selector: "h1.DUwDvf.lfPIob",
        read: Read::Text,
    },
    FieldRule {
        field: Field::Address,
        scope: Scope::Page,
        selector: ADDRESS_SELECTOR,
        read: Read::Text,
    },
    FieldRule {
        field: Field::Rating,
        scope: Scope::Listing,
        selector: "span.ceNzKf",
        read: Read::Attribute("aria-label"),
    },
    FieldRule {
        field: Field::Category,
        scope: Scope::Page,
        selector: CATEGORY_SELECTOR,
        read: Read::Text,
    },
    FieldRule {
        field: Field::Coordinate,
        scope: Scope::Page,
        selector: COORDINATE_SELECTOR,
        read: Read::Attribute("content"),
    },
];

const CURRENT_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        scope: Scope::Page,
        selector: "h1.DUwDvf",
        read: Read::Text,
    },
    FieldRule {
        field: Field::Address,
        scope: Scope::Page,
        selector: ADDRESS_SELECTOR,
        read: Read::Text,
    },
    FieldRule {
        field: Field::Website,
        scope: Scope::Page,
        selector: r#"a[data-item-id="authority"]"#,
        read: Read::Attribute("href"),
    },
    FieldRule {
        field: Field::Rating,
        scope: Scope::Listing,
        selector: "span.ZkP5Je",
        read: Read::Attribute("aria-label"),
    },
    FieldRule {
        field: Field::Category,
        scope: Scope::Page,
        selector: CATEGORY_SELECTOR,
        read: Read::Text,
    },
    FieldRule {
        field: Field::Coordinate,
        scope: Scope::Page,
        selector: COORDINATE_SELECTOR,
        read: Read::Attribute("content"),
    },
];

impl LayoutProfile {
    pub fn rules(self) -> &'static [FieldRule] {
        match self {
            LayoutProfile::Classic => CLASSIC_RULES,
            LayoutProfile::Current => CURRENT_RULES,
        }
    }

    /// Selector matching one rendered result in the results feed
    pub fn listing_selector(self) -> &'static str {
        match self {
            LayoutProfile::Classic => "div.Nv2PK.THOPZb.CpccDe",
            LayoutProfile::Current => r#"div[role="feed"] div.Nv2PK"#,
        }
    }

    /// Heading of the detail view; its text names the loaded listing
    pub fn detail_marker(self) -> &'static str {
        "h1.DUwDvf"
    }

    /// Link inside a listing whose `aria-label` carries the business name
    pub fn listing_title_selector(self) -> &'static str {
        "a.hfpxzc"
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutProfile::Classic => "classic",
            LayoutProfile::Current => "current",
        }
    }
}

impl FieldRule {
    /// Raw value of the first matching element, or `None` when nothing matches
    pub fn read_from(&self, document: &Html) -> Option<String> {
        let selector = match Selector::parse(self.selector) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Invalid selector {:?} for {:?}: {:?}", self.selector, self.field, e);
                return None;
            }
        };

        let element = document.select(&selector).next()?;
        match self.read {
            Read::Text => Some(element.text().collect::<String>().trim().to_string()),
            Read::Attribute(name) => element.value().attr(name).map(|v| v.trim().to_string()),
        }
    }

    /// Store a raw value on the record. `None` keeps the field's default.
    pub fn apply(&self, raw: Option<String>, business: &mut Business) {
        let Some(raw) = raw else {
            return;
        };

        match self.field {
            Field::Name => business.name = raw,
            Field::Address => business.address = raw,
            Field::Website => business.website = raw,
            Field::Category => business.category = raw,
            Field::Coordinate => business.coordinate = raw,
            Field::Rating => {
                let (average, count) = parse_rating_label(&raw);
                business.reviews_average = average;
                business.reviews_count = count;
            }
        }
    }
}

/// Parse a rating label like `"4.5 stars 128 reviews"`.
///
/// Token 0 is the average with `,` accepted as decimal separator. Token 2 is
/// the review count with `,` and `.` group separators removed. Anything
/// unparsable falls back to `None` / 0, and the count is 0 whenever the
/// average is missing.
pub fn parse_rating_label(label: &str) -> (Option<f64>, u32) {
    let tokens: Vec<&str> = label.split_whitespace().collect();

    let average = tokens
        .first()
        .and_then(|token| token.replace(',', ".").parse::<f64>().ok())
        .filter(|value| value.is_finite());
    if average.is_none() {
        return (None, 0);
    }

    let count = tokens
        .get(2)
        .map(|token| token.replace([',', '.'], ""))
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok())
        .unwrap_or(0);

    (average, count)
}

/// Business name a listing advertises, used to recognise its detail view
pub fn listing_title(profile: LayoutProfile, listing: &Html) -> Option<String> {
    let rule = FieldRule {
        field: Field::Name,
        scope: Scope::Listing,
        selector: profile.listing_title_selector(),
        read: Read::Attribute("aria-label"),
    };
    rule.read_from(listing).filter(|title| !title.is_empty())
}

/// Build a record from a page snapshot and the clicked listing's snapshot
pub fn read_fields(profile: LayoutProfile, page: &Html, listing: &Html) -> Business {
    let mut business = Business::default();
    for rule in profile.rules() {
        let document = match rule.scope {
            Scope::Page => page,
            Scope::Listing => listing,
        };
        rule.apply(rule.read_from(document), &mut business);
    }
    business
}
