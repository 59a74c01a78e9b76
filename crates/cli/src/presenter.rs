//! Terminal rendering of scan reports.

use std::fmt::Write;

use rust_decimal::Decimal;

use crossline_arbitrage_cross::{ArbitrageResult, ScanReport};
use crossline_core::StakeSizer;

const TITLE_WIDTH: usize = 32;

fn clip(title: &str) -> String {
    if title.chars().count() <= TITLE_WIDTH {
        return title.to_string();
    }
    let mut clipped: String = title.chars().take(TITLE_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

fn cents(price: Decimal) -> String {
    format!("{}c", (price * Decimal::ONE_HUNDRED).round_dp(1).normalize())
}

fn render_row(out: &mut String, rank: usize, result: &ArbitrageResult, sizer: &StakeSizer) {
    let flag = if result.is_arb { "ARB" } else { "" };
    let _ = writeln!(
        out,
        "{:>3}  {:<w$}  {:<w$}  {:>5}  {:>6}  {:>6}  {:>7}  {:>8}%  {:<3}",
        rank,
        clip(&result.title_a),
        clip(&result.title_b),
        result.match_score,
        cents(result.yes_price_a),
        cents(result.no_price_b),
        result.total_cost.round_dp(4),
        result.profit_pct.round_dp(2),
        flag,
        w = TITLE_WIDTH,
    );

    if let Some(plan) = sizer.plan(result.yes_price_a, result.no_price_b) {
        let _ = writeln!(
            out,
            "     stake ${} -> {} pairs: ${} Polymarket YES + ${} Kalshi NO, payout ${}, profit ${}",
            plan.stake.round_dp(2),
            plan.contracts.round_dp(2),
            plan.yes_leg_cost.round_dp(2),
            plan.no_leg_cost.round_dp(2),
            plan.guaranteed_payout.round_dp(2),
            plan.guaranteed_profit.round_dp(2),
        );
    }
}

/// Renders the ranked results, `limit` rows at most (`None` for all).
#[must_use]
pub fn render_report(report: &ScanReport, limit: Option<usize>, sizer: &StakeSizer) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "\n=== Cross-Exchange Scan ===");
    let _ = writeln!(out, "{summary}");

    if report.is_empty() {
        let _ = writeln!(out, "\nNo matched pairs. No arbitrage found.");
        return out;
    }

    let rows = match limit {
        Some(n) => report.top(n),
        None => report.ranked(),
    };

    let _ = writeln!(
        out,
        "\n{:>3}  {:<w$}  {:<w$}  {:>5}  {:>6}  {:>6}  {:>7}  {:>9}  {:<3}",
        "#",
        "Polymarket",
        "Kalshi",
        "Score",
        "YES",
        "NO",
        "Cost",
        "Profit",
        "",
        w = TITLE_WIDTH,
    );

    for (i, result) in rows.iter().enumerate() {
        render_row(&mut out, i + 1, result, sizer);
    }

    if rows.len() < report.results.len() {
        let _ = writeln!(
            out,
            "\n({} of {} results shown, use --all for everything)",
            rows.len(),
            report.results.len()
        );
    }

    if summary.arbitrages == 0 {
        let _ = writeln!(out, "\nNo arbitrage found.");
    }

    out
}
