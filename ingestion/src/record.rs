use reviewgraph_core::model::Review;
use serde::{Deserialize, Serialize};

/// One line of the review export. Fields the graph does not use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub asin: String,
    #[serde(rename = "reviewerID")]
    pub reviewer_id: String,
    /// Star rating, 1.0 to 5.0.
    pub overall: f64,
    #[serde(rename = "reviewTime")]
    pub review_time: String,
    #[serde(rename = "reviewText", default)]
    pub review_text: String,
}

impl ReviewRecord {
    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn to_review(&self) -> Review {
        Review::new(self.overall, self.review_time.clone(), self.review_text.clone())
    }
}
