//! Title normalization into name variants.
//!
//! Market titles from the two sources name the same school differently
//! ("University of North Carolina", "UNC", "North Carolina"). The
//! normalizer strips institutional noise and emits a small set of
//! plausible spellings for the matcher to compare.

use std::collections::BTreeSet;

use crossline_core::MatchConfig;

/// Noise removed from every title, in order, by literal substring removal.
pub const NOISE_WORDS: [&str; 10] = [
    "university of",
    "university",
    "state",
    "univ",
    "the",
    "st.",
    "saint",
    "college",
    "mens",
    "basketball",
];

/// Deduplicated name variants for one title. Ordered for deterministic
/// iteration.
pub type NameVariantSet = BTreeSet<String>;

/// Produces name variant sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    expand_state_abbreviation: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            expand_state_abbreviation: true,
        }
    }
}

impl Normalizer {
    #[must_use]
    pub fn new(expand_state_abbreviation: bool) -> Self {
        Self {
            expand_state_abbreviation,
        }
    }

    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.expand_state_abbreviation)
    }

    /// Lower-cases `title`, removes every noise word and collapses
    /// whitespace.
    ///
    /// Removal repeats until no noise word remains, since cutting one word
    /// can splice together another. The result is a fixed point: cleaning
    /// it again returns it unchanged.
    #[must_use]
    pub fn clean(&self, title: &str) -> String {
        let mut text = title.to_lowercase();

        loop {
            let before = text.len();
            for word in NOISE_WORDS {
                if text.contains(word) {
                    text = text.replace(word, "");
                }
            }
            if text.len() == before {
                break;
            }
        }

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Returns the variant set for `title`.
    ///
    /// Always contains the cleaned base string, even when it is empty. With
    /// more than one token it also holds the acronym, the first token with a
    /// "u" prefix, and the acronym with a "u" prefix (so "north carolina"
    /// yields "nc", "unorth" and "unc").
    #[must_use]
    pub fn variants(&self, title: &str) -> NameVariantSet {
        let base = self.clean(title);
        let mut variants = NameVariantSet::new();

        let tokens: Vec<&str> = base.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.len() > 1 {
            let acronym: String = tokens.iter().filter_map(|t| t.chars().next()).collect();
            variants.insert(format!("u{}", tokens[0]));
            variants.insert(format!("u{acronym}"));
            variants.insert(acronym);
        }

        if self.expand_state_abbreviation && base.contains("st") {
            variants.insert(base.replace("st", "state"));
        }

        variants.insert(base);
        variants
    }
}

/// Variant set using the default normalizer.
#[must_use]
pub fn normalize(title: &str) -> NameVariantSet {
    Normalizer::default().variants(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Cleaning Tests ====================

    #[test]
    fn test_clean_strips_noise_words() {
        let n = Normalizer::default();
        assert_eq!(n.clean("University of North Carolina"), "north carolina");
        assert_eq!(n.clean("Michigan State University"), "michigan");
        assert_eq!(n.clean("Saint Mary's College"), "mary's");
        assert_eq!(n.clean("The Duke Mens Basketball"), "duke");
    }

    #[test]
    fn test_clean_removes_every_occurrence() {
        let n = Normalizer::default();
        assert_eq!(n.clean("State vs State"), "vs");
    }

    #[test]
    fn test_clean_is_literal_substring_removal() {
        // "the" inside a word is removed too
        let n = Normalizer::default();
        assert_eq!(n.clean("Theodore"), "odore");
    }

    #[test]
    fn test_clean_reaches_fixed_point() {
        let n = Normalizer::default();
        // removing the inner "state" splices the outer one together
        let once = n.clean("stastatete kansas");
        assert_eq!(once, "kansas");
        assert_eq!(n.clean(&once), once);
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        let n = Normalizer::default();
        assert_eq!(n.clean("  Duke   the  Blue Devils "), "duke blue devils");
    }

    // ==================== Variant Tests ====================

    #[test]
    fn test_acronym_variants() {
        let variants = normalize("University of North Carolina");
        assert!(variants.contains("north carolina"));
        assert!(variants.contains("nc"));
        assert!(variants.contains("unorth"));
        assert!(variants.contains("unc"));
    }

    #[test]
    fn test_single_token_has_only_base() {
        let variants = Normalizer::new(false).variants("Duke");
        assert_eq!(variants.len(), 1);
        assert!(variants.contains("duke"));
    }

    #[test]
    fn test_state_expansion_toggle() {
        // "St." is noise but bare "st" survives
        let on = Normalizer::new(true).variants("Boise St");
        assert!(on.contains("boise st"));
        assert!(on.contains("boise state"));

        let off = Normalizer::new(false).variants("Boise St");
        assert!(!off.contains("boise state"));
    }

    #[test]
    fn test_from_config_reads_expansion_flag() {
        let mut config = MatchConfig::default();
        config.expand_state_abbreviation = false;
        assert_eq!(Normalizer::from_config(&config), Normalizer::new(false));
    }

    #[test]
    fn test_empty_title_yields_empty_variant() {
        let variants = normalize("");
        assert_eq!(variants.len(), 1);
        assert!(variants.contains(""));

        let only_noise = normalize("The University");
        assert_eq!(only_noise.len(), 1);
        assert!(only_noise.contains(""));
    }

    #[test]
    fn test_renormalizing_cleaned_title_keeps_it() {
        let n = Normalizer::default();
        for title in [
            "University of North Carolina",
            "Duke vs. UNC",
            "Kansas State Wildcats",
            "Saint Joseph's at St. Bonaventure",
            "Boise St",
        ] {
            let cleaned = n.clean(title);
            assert!(
                n.variants(&cleaned).contains(&cleaned),
                "{cleaned:?} from {title:?} not stable"
            );
        }
    }
}
