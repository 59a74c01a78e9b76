//! Fuzzy title similarity.
//!
//! Scoring sits behind the [`Scorer`] trait so alternate strategies can be
//! swapped into the pipeline. The default, [`TokenSetScorer`], ignores word
//! order and repeated words: "Duke vs UNC" and "UNC vs Duke" score 100.

use std::collections::BTreeSet;

/// Scores two strings for similarity on a 0-100 scale.
///
/// Implementations must be symmetric and return 0 when either side is
/// empty.
pub trait Scorer {
    fn similarity(&self, a: &str, b: &str) -> u8;

    /// Maximum pairwise similarity over the cross product of two variant
    /// sets. Empty sets score 0.
    fn best_score<'a, A, B>(&self, variants_a: A, variants_b: B) -> u8
    where
        Self: Sized,
        A: IntoIterator<Item = &'a String>,
        B: IntoIterator<Item = &'a String> + Clone,
    {
        variants_a
            .into_iter()
            .flat_map(|a| {
                variants_b
                    .clone()
                    .into_iter()
                    .map(move |b| self.similarity(a, b))
            })
            .max()
            .unwrap_or(0)
    }

    /// Highest-scoring candidate for `query` and its score.
    ///
    /// Ties keep the first candidate seen. Returns `None` for no candidates.
    fn best_match<'c, C>(&self, query: &str, candidates: &'c [C]) -> Option<(&'c C, u8)>
    where
        Self: Sized,
        C: AsRef<str>,
    {
        highest_first(
            candidates
                .iter()
                .map(|candidate| (candidate, self.similarity(query, candidate.as_ref()))),
        )
    }
}

/// Highest-scoring item, keeping the earliest on ties.
pub(crate) fn highest_first<T>(scored: impl IntoIterator<Item = (T, u8)>) -> Option<(T, u8)> {
    scored.into_iter().fold(None, |best, (item, score)| match best {
        Some((_, best_score)) if score <= best_score => best,
        _ => Some((item, score)),
    })
}

/// Token-set ratio over lower-cased alphanumeric tokens.
///
/// With `t0` the sorted shared tokens and `t1`/`t2` that intersection
/// followed by each side's remaining tokens, the score is the best plain
/// ratio among `(t0, t1)`, `(t0, t2)` and `(t1, t2)`. The plain ratio is
/// normalized Levenshtein similarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSetScorer;

impl Scorer for TokenSetScorer {
    fn similarity(&self, a: &str, b: &str) -> u8 {
        token_set_ratio(a, b)
    }
}

/// Token-set similarity with the default scorer.
#[must_use]
pub fn similarity(a: &str, b: &str) -> u8 {
    TokenSetScorer.similarity(a, b)
}

fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn join(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let score = (strsim::normalized_levenshtein(a, b) * 100.0).round();
    score.clamp(0.0, 100.0) as u8
}

fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let shared: Vec<&String> = tokens_a.intersection(&tokens_b).collect();
    let only_a: Vec<&String> = tokens_a.difference(&tokens_b).collect();
    let only_b: Vec<&String> = tokens_b.difference(&tokens_a).collect();

    let t0 = join(&shared);
    let t1 = join(&[shared.as_slice(), only_a.as_slice()].concat());
    let t2 = join(&[shared.as_slice(), only_b.as_slice()].concat());

    ratio(&t0, &t1).max(ratio(&t0, &t2)).max(ratio(&t1, &t2))
}
