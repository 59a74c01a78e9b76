//! Cross-product scan over two event lists.
//!
//! One pass is single-threaded and synchronous: every (A, B) pair is
//! filtered, survivors are priced, and the results come back with
//! aggregate diagnostics. Nothing in a pass is fatal; the worst outcome is
//! an empty result list.

use tracing::{debug, info, trace};

use crossline_core::{ConfigError, KalshiNoPrice, MatchConfig};
use crossline_kalshi::Market;
use crossline_polymarket::GammaEvent;

use crate::evaluator::evaluate;
use crate::filter::FilterPipeline;
use crate::similarity::{highest_first, Scorer, TokenSetScorer};
use crate::sources::{from_kalshi, from_polymarket};
use crate::types::{ArbitrageResult, MarketEvent, ScanSummary};

// =============================================================================
// Scan Report
// =============================================================================

/// Output of one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Result records in cross-product order.
    pub results: Vec<ArbitrageResult>,
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Results sorted by `profit_pct`, best first. Equal profits keep scan
    /// order.
    #[must_use]
    pub fn ranked(&self) -> Vec<&ArbitrageResult> {
        let mut ranked: Vec<&ArbitrageResult> = self.results.iter().collect();
        ranked.sort_by(|x, y| y.profit_pct.cmp(&x.profit_pct));
        ranked
    }

    /// The `n` best results.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<&ArbitrageResult> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Results that are true arbitrages, in scan order.
    pub fn arbitrages(&self) -> impl Iterator<Item = &ArbitrageResult> {
        self.results.iter().filter(|r| r.is_arb)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// Matches source A events against source B events and prices the matches.
#[derive(Debug, Clone)]
pub struct ArbitrageScanner<S = TokenSetScorer> {
    pipeline: FilterPipeline<S>,
}

impl ArbitrageScanner<TokenSetScorer> {
    /// Creates a scanner with the default scorer.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any threshold is out of range.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: FilterPipeline::new(config)?,
        })
    }
}

impl<S: Scorer> ArbitrageScanner<S> {
    /// Creates a scanner with a custom scorer.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any threshold is out of range.
    pub fn with_scorer(config: MatchConfig, scorer: S) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: FilterPipeline::with_scorer(config, scorer)?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        self.pipeline.config()
    }

    #[must_use]
    pub fn pipeline(&self) -> &FilterPipeline<S> {
        &self.pipeline
    }

    /// Scans every pair of `events_a` x `events_b`.
    ///
    /// Only "yes on A, no on B" is priced for each pair.
    #[must_use]
    pub fn scan(&self, events_a: &[MarketEvent], events_b: &[MarketEvent]) -> ScanReport {
        let mut report = ScanReport::default();

        for a in events_a {
            for b in events_b {
                report.summary.pairs_attempted += 1;
                trace!(title_a = %a.title, title_b = %b.title, "Checking pair");

                let pair = match self.pipeline.check(a, b) {
                    Ok(pair) => pair,
                    Err(rejection) => {
                        report.summary.record_rejection(rejection.gate());
                        continue;
                    }
                };

                let evaluation = match evaluate(a.yes_price, b.no_price) {
                    Ok(evaluation) => evaluation,
                    Err(e) => {
                        debug!(
                            title_a = %a.title,
                            title_b = %b.title,
                            error = %e,
                            "Dropping unpriceable pair"
                        );
                        report.summary.malformed_pairs += 1;
                        continue;
                    }
                };

                if evaluation.is_arb {
                    info!(
                        title_a = %a.title,
                        title_b = %b.title,
                        score = pair.match_score,
                        total_cost = %evaluation.total_cost,
                        profit_pct = %evaluation.profit_pct.round_dp(2),
                        "Arbitrage found"
                    );
                    report.summary.arbitrages += 1;
                }

                report.results.push(ArbitrageResult {
                    title_a: a.title.clone(),
                    title_b: b.title.clone(),
                    id_a: a.id.clone(),
                    id_b: b.id.clone(),
                    yes_price_a: a.yes_price,
                    no_price_b: b.no_price,
                    match_score: pair.match_score,
                    total_cost: evaluation.total_cost,
                    profit_pct: evaluation.profit_pct,
                    is_arb: evaluation.is_arb,
                });
            }
        }

        report.summary.results = report.results.len();

        info!(
            events_a = events_a.len(),
            events_b = events_b.len(),
            pairs = report.summary.pairs_attempted,
            results = report.summary.results,
            arbitrages = report.summary.arbitrages,
            rejected = report.summary.rejected(),
            malformed = report.summary.malformed_pairs,
            "Scan complete"
        );

        report
    }

    /// Converts raw Polymarket events and Kalshi markets, then scans them.
    ///
    /// The Kalshi "no" price follows the configured [`KalshiNoPrice`].
    #[must_use]
    pub fn scan_sources(&self, events: &[GammaEvent], markets: &[Market]) -> ScanReport {
        let no_price: KalshiNoPrice = self.config().kalshi_no_price;
        let (events_a, skipped_a) = from_polymarket(events);
        let (events_b, skipped_b) = from_kalshi(markets, no_price);

        let mut report = self.scan(&events_a, &events_b);
        report.summary.skipped_a = skipped_a;
        report.summary.skipped_b = skipped_b;
        report
    }

    /// Best counterpart for `title` among `candidates` after normalization.
    ///
    /// Candidates are compared by their variant sets, the same way the name
    /// gate compares titles. Ties keep the first candidate.
    pub fn best_match<'c, C: AsRef<str>>(
        &self,
        title: &str,
        candidates: &'c [C],
    ) -> Option<(&'c C, u8)> {
        let normalizer = self.pipeline.normalizer();
        let scorer = self.pipeline.scorer();
        let query = normalizer.variants(title);

        highest_first(candidates.iter().map(|candidate| {
            let score = scorer.best_score(&query, &normalizer.variants(candidate.as_ref()));
            (candidate, score)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Exchange;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn poly(title: &str, yes: Decimal) -> MarketEvent {
        MarketEvent::new(Exchange::Polymarket, title, title, yes, Decimal::ONE - yes)
    }

    fn kalshi(title: &str, yes: Decimal, no: Decimal) -> MarketEvent {
        MarketEvent::new(Exchange::Kalshi, title, title, yes, no)
    }

    fn scanner() -> ArbitrageScanner {
        ArbitrageScanner::new(MatchConfig::default()).unwrap()
    }

    // ==================== Scan Tests ====================

    #[test]
    fn test_scan_finds_arbitrage() {
        let a = vec![poly("Duke vs. North Carolina", dec!(0.45))];
        let b = vec![kalshi("North Carolina at Duke", dec!(0.48), dec!(0.50))];

        let report = scanner().scan(&a, &b);

        assert_eq!(report.results.len(), 1);
        let result = &report.results[0];
        assert_eq!(result.total_cost, dec!(0.95));
        assert!(result.is_arb);
        assert!((result.profit_pct - dec!(5.26)).abs() < dec!(0.01));
        assert_eq!(report.summary.arbitrages, 1);
        assert_eq!(report.summary.pairs_attempted, 1);
    }

    #[test]
    fn test_scan_counts_rejections() {
        let a = vec![
            poly("Duke vs. North Carolina", dec!(0.55)),
            poly("Kansas vs. Baylor", dec!(0.60)),
        ];
        let b = vec![
            kalshi("North Carolina at Duke", dec!(0.55), dec!(0.47)),
            kalshi("Gonzaga at Saint Mary's", dec!(0.70), dec!(0.32)),
        ];

        let report = scanner().scan(&a, &b);

        assert_eq!(report.summary.pairs_attempted, 4);
        assert_eq!(report.summary.results, 1);
        assert_eq!(report.summary.rejected(), 3);
        assert_eq!(report.summary.arbitrages, 0);
        assert!(!report.results[0].is_arb);
    }

    #[test]
    fn test_scan_drops_zero_cost_pair() {
        let a = vec![MarketEvent::new(
            Exchange::Polymarket,
            "pm",
            "Duke vs UNC",
            Decimal::ZERO,
            Decimal::ONE,
        )];
        let b = vec![kalshi("Duke vs UNC", dec!(0.50), Decimal::ZERO)];

        let report = scanner().scan(&a, &b);

        assert!(report.is_empty());
        assert_eq!(report.summary.malformed_pairs, 1);
    }

    #[test]
    fn test_scan_empty_inputs() {
        let a = vec![poly("Duke vs UNC", dec!(0.45))];
        assert!(scanner().scan(&a, &[]).is_empty());
        assert!(scanner().scan(&[], &a).is_empty());
        assert_eq!(scanner().scan(&[], &[]).summary, ScanSummary::default());
    }

    // ==================== Ranking Tests ====================

    fn result(title: &str, profit_pct: Decimal) -> ArbitrageResult {
        ArbitrageResult {
            title_a: title.to_string(),
            title_b: title.to_string(),
            id_a: String::new(),
            id_b: String::new(),
            yes_price_a: dec!(0.5),
            no_price_b: dec!(0.5),
            match_score: 100,
            total_cost: dec!(1),
            profit_pct,
            is_arb: profit_pct > Decimal::ZERO,
        }
    }

    #[test]
    fn test_ranked_descending_and_stable() {
        let report = ScanReport {
            results: vec![
                result("a", dec!(-2)),
                result("b", dec!(5)),
                result("c", dec!(1)),
                result("d", dec!(5)),
            ],
            summary: ScanSummary::default(),
        };

        let titles: Vec<&str> = report.ranked().iter().map(|r| r.title_a.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "c", "a"]);

        let top: Vec<&str> = report.top(2).iter().map(|r| r.title_a.as_str()).collect();
        assert_eq!(top, vec!["b", "d"]);

        assert_eq!(report.arbitrages().count(), 3);
    }

    #[test]
    fn test_top_larger_than_results() {
        let report = ScanReport {
            results: vec![result("a", dec!(1))],
            summary: ScanSummary::default(),
        };
        assert_eq!(report.top(5).len(), 1);
    }

    // ==================== Best Match Tests ====================

    #[test]
    fn test_best_match_uses_variants() {
        let candidates = vec!["Duke", "UNC", "Kansas"];
        let (best, score) = scanner()
            .best_match("University of North Carolina", &candidates)
            .unwrap();
        assert_eq!(*best, "UNC");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_best_match_tie_keeps_first_candidate() {
        let candidates = vec!["Kansas at Baylor", "UNC vs Duke", "Duke vs UNC"];
        let (best, score) = scanner().best_match("Duke vs UNC", &candidates).unwrap();
        assert_eq!(*best, "UNC vs Duke");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_best_match_empty() {
        let candidates: Vec<String> = Vec::new();
        assert!(scanner().best_match("Duke", &candidates).is_none());
    }
}
