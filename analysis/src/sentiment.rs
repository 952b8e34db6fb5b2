use crate::text::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalisation constant for the compound score.
const COMPOUND_ALPHA: f64 = 15.0;
/// Multiplier applied to a word preceded by a negation.
const NEGATION_SCALAR: f64 = -0.74;
const BOOSTER_INCREMENT: f64 = 0.293;
/// How many preceding tokens are searched for a negation.
const NEGATION_WINDOW: usize = 3;

/// Share of negative, neutral and positive signal in a text, plus a single
/// compound score in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

pub trait SentimentScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("easy", 1.9),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("fits", 0.5),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("perfectly", 3.2),
    ("pleased", 1.9),
    ("recommend", 1.5),
    ("reliable", 1.9),
    ("satisfied", 1.8),
    ("sturdy", 1.3),
    ("useful", 1.9),
    ("value", 1.4),
    ("well", 1.1),
    ("wonderful", 2.7),
    ("works", 0.8),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broke", -1.8),
    ("broken", -2.1),
    ("cheap", -0.7),
    ("defective", -1.9),
    ("difficult", -1.5),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("fail", -2.5),
    ("failed", -2.3),
    ("flimsy", -1.4),
    ("garbage", -2.1),
    ("hate", -2.7),
    ("horrible", -2.5),
    ("junk", -1.8),
    ("leak", -1.4),
    ("leaks", -1.4),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("return", -0.6),
    ("returned", -0.9),
    ("terrible", -2.1),
    ("useless", -1.8),
    ("waste", -1.8),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nor", "cannot", "can't", "don't", "doesn't", "didn't",
    "isn't", "wasn't", "won't", "wouldn't", "shouldn't", "aren't", "weren't", "hardly",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
];

/// Closed-list negations plus any `n't` contraction.
fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Rule-based scorer over a word valence lexicon.
///
/// Each lexicon word contributes its valence, nudged by a preceding booster
/// word and flipped (and damped) when one of the previous
/// [`NEGATION_WINDOW`] tokens is a negation. The summed valence `s` becomes
/// the compound score `s / sqrt(s^2 + 15)`.
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

impl LexiconScorer {
    pub fn new(lexicon: HashMap<String, f64>) -> Self {
        Self { lexicon }
    }

    pub fn with_entry(mut self, word: impl Into<String>, valence: f64) -> Self {
        self.lexicon.insert(word.into().to_lowercase(), valence);
        self
    }

    fn valence_at(&self, words: &[String], i: usize) -> f64 {
        let Some(mut valence) = self.lexicon.get(&words[i]).copied() else {
            return 0.0;
        };

        if let Some(prev) = i.checked_sub(1).map(|p| words[p].as_str()) {
            if let Some((_, scalar)) = BOOSTERS.iter().find(|(w, _)| *w == prev) {
                valence += scalar * valence.signum();
            }
        }

        let window_start = i.saturating_sub(NEGATION_WINDOW);
        if words[window_start..i].iter().any(|w| is_negation(w)) {
            valence *= NEGATION_SCALAR;
        }
        valence
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(
            DEFAULT_LEXICON
                .iter()
                .map(|(word, valence)| (word.to_string(), *valence))
                .collect(),
        )
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        let words: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|t| t.chars().any(char::is_alphanumeric))
            .map(|t| t.to_lowercase())
            .collect();
        if words.is_empty() {
            return PolarityScores::default();
        }

        let mut sum = 0.0;
        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for i in 0..words.len() {
            let valence = self.valence_at(&words, i);
            sum += valence;
            if valence > 0.0 {
                pos_sum += valence + 1.0;
            } else if valence < 0.0 {
                neg_sum += valence.abs() + 1.0;
            } else {
                neu_count += 1.0;
            }
        }

        let compound = (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0);
        let total = pos_sum + neg_sum + neu_count;
        PolarityScores {
            neg: neg_sum / total,
            neu: neu_count / total,
            pos: pos_sum / total,
            compound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text_scores_positive() {
        let scores = LexiconScorer::default().polarity_scores("Great filter, works perfectly");
        assert!(scores.compound > 0.5);
        assert!(scores.pos > scores.neg);
        assert!((scores.neg + scores.neu + scores.pos - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let scorer = LexiconScorer::default();
        assert!(scorer.polarity_scores("This is good").compound > 0.0);
        assert!(scorer.polarity_scores("This is not good").compound < 0.0);
    }

    #[test]
    fn test_contractions_negate() {
        let scorer = LexiconScorer::default();
        assert!(scorer.polarity_scores("couldn't recommend").compound < 0.0);
        assert!(scorer.polarity_scores("haven't been happy").compound < 0.0);
        assert!(scorer.polarity_scores("I don\u{2019}t like it").compound < 0.0);
        assert!(scorer.polarity_scores("I like it").compound > 0.0);
    }

    #[test]
    fn test_booster_strengthens_valence() {
        let scorer = LexiconScorer::default();
        let plain = scorer.polarity_scores("good").compound;
        let boosted = scorer.polarity_scores("very good").compound;
        assert!(boosted > plain);
    }

    #[test]
    fn test_empty_and_neutral_text() {
        let scorer = LexiconScorer::default();
        assert_eq!(scorer.polarity_scores(""), PolarityScores::default());

        let neutral = scorer.polarity_scores("the box arrived on tuesday");
        assert_eq!(neutral.compound, 0.0);
        assert_eq!(neutral.neu, 1.0);
    }

    #[test]
    fn test_custom_entry() {
        let scorer = LexiconScorer::default().with_entry("Meh", -0.5);
        assert!(scorer.polarity_scores("meh").compound < 0.0);
    }
}
