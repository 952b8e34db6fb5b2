use crate::sentiment::{PolarityScores, SentimentScorer};
use crate::text::{clean_text, word_frequencies};
use chrono::NaiveDate;
use graph::{GraphError, ReviewGraph};
use indexmap::{IndexMap, IndexSet};
use reviewgraph_core::config::AnalysisConfig;
use reviewgraph_core::error::{ErrorCode, ReviewGraphError};
use reviewgraph_core::model::Review;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

impl ReviewGraphError for AnalysisError {
    fn error_code(&self) -> ErrorCode {
        match self {
            AnalysisError::Graph(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSplit {
    pub positive: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Ratings sorted by review date. Reviews whose date cannot be parsed are left out.
pub fn rating_timeline<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Vec<RatingPoint> {
    let mut points: Vec<RatingPoint> = reviews
        .into_iter()
        .filter_map(|review| {
            review.parsed_time().map(|date| RatingPoint {
                date,
                rating: review.rating(),
            })
        })
        .collect();
    points.sort_by_key(|point| point.date);
    points
}

/// Mean compound score of each product's reviews.
pub fn average_sentiment(
    similar: &IndexMap<String, Vec<Review>>,
    scorer: &dyn SentimentScorer,
) -> IndexMap<String, f64> {
    similar
        .iter()
        .filter(|(_, reviews)| !reviews.is_empty())
        .map(|(asin, reviews)| {
            let total: f64 = reviews
                .iter()
                .map(|r| scorer.polarity_scores(r.review_text()).compound)
                .sum();
            (asin.clone(), total / reviews.len() as f64)
        })
        .collect()
}

/// Summed positive and negative shares of each product's reviews.
pub fn sentiment_distribution(
    similar: &IndexMap<String, Vec<Review>>,
    scorer: &dyn SentimentScorer,
) -> IndexMap<String, SentimentSplit> {
    similar
        .iter()
        .map(|(asin, reviews)| {
            let split = reviews.iter().fold(SentimentSplit::default(), |acc, r| {
                let scores = scorer.polarity_scores(r.review_text());
                SentimentSplit {
                    positive: acc.positive + scores.pos,
                    negative: acc.negative + scores.neg,
                }
            });
            (asin.clone(), split)
        })
        .collect()
}

/// Everything the product view shows for one selected product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReport {
    pub asin: String,
    pub review_count: usize,
    /// Summed neg/neu/pos over the product's own reviews; `compound` is the mean.
    pub sentiment: PolarityScores,
    pub rating_timeline: Vec<RatingPoint>,
    /// Number of positive reviews from shared reviewers, per similar product.
    pub similar_review_counts: IndexMap<String, usize>,
    pub average_sentiment: IndexMap<String, f64>,
    pub sentiment_distribution: IndexMap<String, SentimentSplit>,
    pub recommended: Vec<String>,
    pub top_terms: Vec<TermCount>,
}

impl ProductReport {
    pub fn build(
        graph: &ReviewGraph,
        asin: &str,
        scorer: &dyn SentimentScorer,
        config: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        let own_reviews = graph.neighbouring_reviews(asin)?;
        let similar = graph.similar_product_reviews(asin)?;

        let sentiment = summed_scores(own_reviews.iter(), scorer);

        let mut recommended: IndexSet<String> = IndexSet::new();
        let mut corpus = String::new();
        for (other, reviews) in &similar {
            for review in reviews {
                corpus.push_str(&clean_text(review.review_text()));
                corpus.push(' ');
                if scorer.polarity_scores(review.review_text()).compound
                    >= config.recommendation_threshold
                {
                    recommended.insert(other.clone());
                }
            }
        }

        let mut distribution = sentiment_distribution(&similar, scorer);
        distribution.truncate(config.max_distribution_products);

        let report = Self {
            asin: asin.to_string(),
            review_count: own_reviews.len(),
            sentiment,
            rating_timeline: rating_timeline(&own_reviews),
            similar_review_counts: similar
                .iter()
                .map(|(other, reviews)| (other.clone(), reviews.len()))
                .collect(),
            average_sentiment: average_sentiment(&similar, scorer),
            sentiment_distribution: distribution,
            recommended: recommended
                .into_iter()
                .take(config.max_recommendations)
                .collect(),
            top_terms: word_frequencies(&corpus, config.max_wordcloud_terms)
                .into_iter()
                .map(|(term, count)| TermCount { term, count })
                .collect(),
        };

        info!(
            "Built report for {}: {} review(s), {} similar product(s), {} recommended",
            asin,
            report.review_count,
            report.similar_review_counts.len(),
            report.recommended.len()
        );
        Ok(report)
    }
}

fn summed_scores<'a>(
    reviews: impl Iterator<Item = &'a Review>,
    scorer: &dyn SentimentScorer,
) -> PolarityScores {
    let mut totals = PolarityScores::default();
    let mut count = 0usize;
    for review in reviews {
        let scores = scorer.polarity_scores(review.review_text());
        totals.neg += scores.neg;
        totals.neu += scores.neu;
        totals.pos += scores.pos;
        totals.compound += scores.compound;
        count += 1;
    }
    if count > 0 {
        totals.compound /= count as f64;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_timeline_sorts_and_skips_unparseable() {
        let reviews = vec![
            Review::new(2.0, "12 01, 2013", ""),
            Review::new(5.0, "someday", ""),
            Review::new(4.0, "01 15, 2012", ""),
        ];
        let timeline = rating_timeline(&reviews);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].rating, 4.0);
        assert_eq!(timeline[1].date, NaiveDate::from_ymd_opt(2013, 12, 1).unwrap());
    }
}
