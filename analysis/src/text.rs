use std::collections::HashMap;

/// English stopwords, lowercase.
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Split text into word tokens and single-character punctuation tokens.
/// Apostrophes inside a word stay with it (`"don't"`); typographic
/// apostrophes are folded to `'` first.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text
        .chars()
        .map(|c| if matches!(c, '\u{2018}' | '\u{2019}') { '\'' } else { c })
        .collect();

    for (i, &c) in chars.iter().enumerate() {
        let inner_apostrophe = c == '\''
            && !current.is_empty()
            && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());

        if c.is_alphanumeric() || inner_apostrophe {
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn is_stopword(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_punctuation())
}

/// Drop stopwords and punctuation, keeping the original casing of the rest.
/// Surviving tokens are joined with two spaces.
pub fn clean_text(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .filter(|token| !is_stopword(token) && !is_punctuation(token))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Most frequent lowercase words of `text`, highest count first, ties broken
/// alphabetically. Stopwords and punctuation are excluded.
pub fn word_frequencies(text: &str, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text) {
        if is_stopword(&token) || is_punctuation(&token) {
            continue;
        }
        *counts.entry(token.to_lowercase()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_punctuation_and_keeps_contractions() {
        let tokens = tokenize("Don't buy it! Works (sometimes).");
        assert_eq!(
            tokens,
            vec!["Don't", "buy", "it", "!", "Works", "(", "sometimes", ")", "."]
        );
    }

    #[test]
    fn test_tokenize_folds_typographic_apostrophe() {
        assert_eq!(tokenize("I don\u{2019}t care"), vec!["I", "don't", "care"]);
        assert_eq!(clean_text("Don\u{2019}t buy"), "buy");
    }

    #[test]
    fn test_clean_text_removes_stopwords_and_punctuation() {
        let cleaned = clean_text("The filter is GREAT, and I would buy it again!");
        assert_eq!(cleaned, "filter  GREAT  would  buy");
    }

    #[test]
    fn test_clean_text_of_only_stopwords_is_empty() {
        assert_eq!(clean_text("it is what it is."), "");
    }

    #[test]
    fn test_word_frequencies_rank_and_limit() {
        let freq = word_frequencies("Great filter. great price! Filter fits, great.", 2);
        assert_eq!(
            freq,
            vec![("great".to_string(), 3), ("filter".to_string(), 2)]
        );
    }
}
