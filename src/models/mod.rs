use serde::{Deserialize, Serialize};

/// One business listing as read from the detail view.
///
/// Empty strings mean the field was not present on the page. `reviews_average`
/// stays `None` when the rating label is missing or unparsable, in which case
/// `reviews_count` is always 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub address: String,
    pub website: String,
    pub reviews_average: Option<f64>,
    pub reviews_count: u32,
    pub category: String,
    pub coordinate: String,
}

/// Businesses in the order their listings were discovered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessCollection {
    businesses: Vec<Business>,
}

impl BusinessCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, business: Business) {
        self.businesses.push(business);
    }

    pub fn len(&self) -> usize {
        self.businesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Business> {
        self.businesses.iter()
    }
}

impl FromIterator<Business> for BusinessCollection {
    fn from_iter<I: IntoIterator<Item = Business>>(iter: I) -> Self {
        Self {
            businesses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BusinessCollection {
    type Item = &'a Business;
    type IntoIter = std::slice::Iter<'a, Business>;

    fn into_iter(self) -> Self::IntoIter {
        self.businesses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Business {
        Business {
            name: name.to_string(),
            ..Business::default()
        }
    }

    #[test]
    fn default_business_has_empty_fields_and_zero_reviews() {
        let business = Business::default();
        assert_eq!(business.name, "");
        assert_eq!(business.reviews_average, None);
        assert_eq!(business.reviews_count, 0);
    }

    #[test]
    fn collection_keeps_insertion_order_and_duplicates() {
        let mut collection = BusinessCollection::new();
        collection.push(named("Kopi"));
        collection.push(named("Warung"));
        collection.push(named("Kopi"));

        let names: Vec<_> = collection.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Kopi", "Warung", "Kopi"]);
        assert_eq!(collection.len(), 3);
    }
}
