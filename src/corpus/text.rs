//! Shallow text helpers shared by the embedder, extractor and dialogue engine

use std::sync::OnceLock;

use regex::Regex;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "then", "of", "to", "in", "on", "at", "by",
    "for", "with", "from", "into", "onto", "as", "is", "are", "was", "were", "be", "been",
    "being", "it", "its", "this", "that", "these", "those", "there", "their", "they", "them",
    "he", "she", "we", "you", "i", "me", "my", "our", "your", "his", "her", "not", "no", "so",
    "than", "too", "very", "can", "could", "will", "would", "should", "may", "might", "must",
    "do", "does", "did", "has", "have", "had", "which", "who", "whom", "what", "when", "where",
    "why", "how", "all", "any", "each", "more", "most", "other", "some", "such", "only", "own",
    "same", "also", "just", "over", "under", "about", "between", "through", "both", "itself",
];

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[A-Za-z][A-Za-z'\-]*").expect("static regex"))
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE: OnceLock<Regex> = OnceLock::new();
    SENTENCE.get_or_init(|| Regex::new(r"[^.!?;\n]+").expect("static regex"))
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Lowercased word tokens in order
pub fn words(text: &str) -> Vec<String> {
    word_regex()
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(|c| c == '\'' || c == '-').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Word tokens with stopwords removed
pub fn content_words(text: &str) -> Vec<String> {
    words(text).into_iter().filter(|w| !is_stopword(w)).collect()
}

/// Non-empty trimmed sentences
pub fn sentences(text: &str) -> Vec<&str> {
    sentence_regex()
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether `phrase` (one or more words) occurs in `tokens` as a contiguous run
pub fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > tokens.len() {
        return false;
    }
    tokens
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(t, n)| t == n))
}
