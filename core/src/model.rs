use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Formats accepted for `review_time`, tried in order.
/// The first is the catalogue export format, e.g. `"07 17, 2002"`.
const REVIEW_TIME_FORMATS: &[&str] = &["%m %d, %Y", "%Y-%m-%d", "%m/%d/%Y"];

/// Which side of the bipartite graph a vertex sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Product,
    Reviewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Product => write!(f, "product"),
            Role::Reviewer => write!(f, "reviewer"),
        }
    }
}

/// One reviewer's opinion of one product, stored on the edge between them.
///
/// Reviews have no identity of their own: two reviews with the same rating,
/// time and text compare equal and hash identically. `rating` is compared by
/// its bit pattern so that `Eq` stays lawful.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    rating: f64,
    review_time: String,
    review_text: String,
}

impl Review {
    pub fn new(
        rating: f64,
        review_time: impl Into<String>,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            rating,
            review_time: review_time.into(),
            review_text: review_text.into(),
        }
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn review_time(&self) -> &str {
        &self.review_time
    }

    pub fn review_text(&self) -> &str {
        &self.review_text
    }

    /// Calendar date of the review, if `review_time` is in a known format.
    pub fn parsed_time(&self) -> Option<NaiveDate> {
        let raw = self.review_time.trim();
        REVIEW_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }
}

impl PartialEq for Review {
    fn eq(&self, other: &Self) -> bool {
        self.rating.to_bits() == other.rating.to_bits()
            && self.review_time == other.review_time
            && self.review_text == other.review_text
    }
}

impl Eq for Review {}

impl Hash for Review {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rating.to_bits().hash(state);
        self.review_time.hash(state);
        self.review_text.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structurally_equal_reviews_collapse_in_set() {
        let a = Review::new(5.0, "07 17, 2002", "works great");
        let b = Review::new(5.0, "07 17, 2002", "works great");
        let c = Review::new(4.0, "07 17, 2002", "works great");

        let set: HashSet<Review> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn test_parsed_time_formats() {
        let catalogue = Review::new(4.0, "07 17, 2002", "");
        assert_eq!(
            catalogue.parsed_time(),
            NaiveDate::from_ymd_opt(2002, 7, 17)
        );

        let iso = Review::new(4.0, "2014-01-05", "");
        assert_eq!(iso.parsed_time(), NaiveDate::from_ymd_opt(2014, 1, 5));

        let garbage = Review::new(4.0, "last tuesday", "");
        assert!(garbage.parsed_time().is_none());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Product).unwrap(), "\"product\"");
        let role: Role = serde_json::from_str("\"reviewer\"").unwrap();
        assert_eq!(role, Role::Reviewer);
        assert_eq!(Role::Reviewer.to_string(), "reviewer");
    }
}
