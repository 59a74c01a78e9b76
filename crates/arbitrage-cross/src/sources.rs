//! Conversion of raw source records into [`MarketEvent`]s.
//!
//! Polymarket prices arrive as fractional dollars, Kalshi prices as whole
//! cents. Both leave here on the 0.0-1.0 scale. A record that cannot be
//! converted is logged and counted, never fatal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crossline_core::KalshiNoPrice;
use crossline_kalshi::Market;
use crossline_polymarket::{GammaEvent, GammaMarket};

use crate::error::RecordError;
use crate::types::{Exchange, MarketEvent};

/// Parses an ISO-8601 timestamp into UTC.
///
/// # Errors
/// Returns [`RecordError::InvalidTimestamp`] if `raw` is not RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RecordError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| RecordError::InvalidTimestamp {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

fn unit_price(field: &'static str, value: Decimal) -> Result<Decimal, RecordError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RecordError::PriceOutOfRange { field, value });
    }
    Ok(value)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Polymarket
// =============================================================================

/// Converts one Gamma market, titled by its parent event.
///
/// # Errors
/// Returns [`RecordError`] if the title, prices or start date are unusable.
pub fn polymarket_market(
    event: &GammaEvent,
    market: &GammaMarket,
) -> Result<MarketEvent, RecordError> {
    let title = non_empty(event.title.as_deref())
        .or_else(|| non_empty(market.question.as_deref()))
        .ok_or(RecordError::MissingField("title"))?;

    let (yes, no) = market.yes_no_prices()?;
    let yes_price = unit_price("outcomePrices[0]", yes)?;
    let no_price = unit_price("outcomePrices[1]", no)?;

    let id = market
        .condition_id
        .as_deref()
        .or(market.id.as_deref())
        .or(event.id.as_deref())
        .unwrap_or_default();

    let mut converted = MarketEvent::new(Exchange::Polymarket, id, title, yes_price, no_price);
    if let Some(start) = non_empty(event.start_date.as_deref()) {
        converted = converted.with_event_time(parse_timestamp(start)?);
    }
    Ok(converted)
}

/// Converts every market of every event.
///
/// Returns the converted records and the number skipped.
#[must_use]
pub fn from_polymarket(events: &[GammaEvent]) -> (Vec<MarketEvent>, usize) {
    let mut converted = Vec::new();
    let mut skipped = 0;

    for event in events {
        for market in &event.markets {
            match polymarket_market(event, market) {
                Ok(record) => converted.push(record),
                Err(e) => {
                    skipped += 1;
                    debug!(
                        event_id = ?event.id,
                        title = ?event.title,
                        error = %e,
                        "Skipping Polymarket market"
                    );
                }
            }
        }
    }

    (converted, skipped)
}

// =============================================================================
// Kalshi
// =============================================================================

/// Scales a cent quote to dollars. 0 and 100 mark an empty book side.
fn kalshi_side(field: &'static str, cents: Decimal) -> Result<Decimal, RecordError> {
    if cents < Decimal::ZERO || cents > Decimal::ONE_HUNDRED {
        return Err(RecordError::PriceOutOfRange {
            field,
            value: cents / Decimal::ONE_HUNDRED,
        });
    }
    if cents.is_zero() || cents == Decimal::ONE_HUNDRED {
        return Err(RecordError::Unquoted { field, cents });
    }
    unit_price(field, cents / Decimal::ONE_HUNDRED)
}

/// Converts one Kalshi market.
///
/// The yes price is `yes_ask`, falling back to `yes_bid` when the ask is
/// missing or unquoted. The no price is
/// `no_ask` or `100 - yes_ask` per `no_price`.
///
/// # Errors
/// Returns [`RecordError`] if the title is empty, a required side is
/// missing or unquoted, or `close_time` does not parse.
pub fn kalshi_market(market: &Market, no_price: KalshiNoPrice) -> Result<MarketEvent, RecordError> {
    let title = non_empty(Some(market.title.as_str())).ok_or(RecordError::MissingField("title"))?;

    // An empty yes-ask book (0 or 100) falls back to the bid like a missing ask.
    let yes_price = match (market.yes_ask.map(|c| kalshi_side("yes_ask", c)), market.yes_bid) {
        (None | Some(Err(RecordError::Unquoted { .. })), Some(bid)) => kalshi_side("yes_bid", bid)?,
        (Some(quoted), _) => quoted?,
        (None, None) => return Err(RecordError::MissingField("yes_ask")),
    };

    let no_price = match no_price {
        KalshiNoPrice::NoAsk => {
            let cents = market.no_ask.ok_or(RecordError::MissingField("no_ask"))?;
            kalshi_side("no_ask", cents)?
        }
        KalshiNoPrice::InverseYesAsk => {
            let ask = market.yes_ask.ok_or(RecordError::MissingField("yes_ask"))?;
            kalshi_side("100 - yes_ask", Decimal::ONE_HUNDRED - ask)?
        }
    };

    let mut converted = MarketEvent::new(Exchange::Kalshi, &market.ticker, title, yes_price, no_price);
    if let Some(close) = market.close_time_utc() {
        let close = close.map_err(|e| RecordError::InvalidTimestamp {
            value: market.close_time.clone().unwrap_or_default(),
            reason: e.to_string(),
        })?;
        converted = converted.with_event_time(close);
    }
    Ok(converted)
}

/// Converts every market.
///
/// Returns the converted records and the number skipped.
#[must_use]
pub fn from_kalshi(markets: &[Market], no_price: KalshiNoPrice) -> (Vec<MarketEvent>, usize) {
    let mut converted = Vec::with_capacity(markets.len());
    let mut skipped = 0;

    for market in markets {
        match kalshi_market(market, no_price) {
            Ok(record) => converted.push(record),
            Err(e) => {
                skipped += 1;
                debug!(
                    ticker = %market.ticker,
                    error = %e,
                    "Skipping Kalshi market"
                );
            }
        }
    }

    (converted, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossline_kalshi::MarketStatus;
    use rust_decimal_macros::dec;

    fn gamma_event(json: serde_json::Value) -> GammaEvent {
        serde_json::from_value(json).unwrap()
    }

    fn kalshi(
        yes_bid: Option<Decimal>,
        yes_ask: Option<Decimal>,
        no_ask: Option<Decimal>,
    ) -> Market {
        Market {
            ticker: "KXCBBGAME-26MAR07DUKEUNC-DUKE".to_string(),
            event_ticker: "KXCBBGAME-26MAR07DUKEUNC".to_string(),
            title: "Duke at North Carolina".to_string(),
            subtitle: None,
            status: MarketStatus::Open,
            yes_bid,
            yes_ask,
            no_bid: None,
            no_ask,
            last_price: None,
            volume_24h: None,
            close_time: Some("2026-03-08T02:00:00Z".to_string()),
        }
    }

    // ==================== Timestamp Tests ====================

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp("2026-03-07T23:30:00-05:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-08T04:30:00+00:00");
        assert!(matches!(
            parse_timestamp("March 7"),
            Err(RecordError::InvalidTimestamp { .. })
        ));
    }

    // ==================== Polymarket Tests ====================

    #[test]
    fn test_polymarket_each_market_becomes_event() {
        let event = gamma_event(serde_json::json!({
            "id": "9001",
            "title": "Duke vs. North Carolina",
            "startDate": "2026-03-07T23:30:00Z",
            "markets": [
                { "conditionId": "0xa", "outcomePrices": "[\"0.45\", \"0.56\"]" },
                { "conditionId": "0xb", "outcomePrices": ["0.30", "0.71"] }
            ]
        }));

        let (records, skipped) = from_polymarket(&[event]);
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "0xa");
        assert_eq!(records[0].title, "Duke vs. North Carolina");
        assert_eq!(records[0].yes_price, dec!(0.45));
        assert_eq!(records[0].no_price, dec!(0.56));
        assert!(records[0].event_time.is_some());
        assert_eq!(records[1].yes_price, dec!(0.30));
    }

    #[test]
    fn test_polymarket_skips_bad_markets() {
        let event = gamma_event(serde_json::json!({
            "title": "Duke vs. North Carolina",
            "markets": [
                { "outcomePrices": ["0.45"] },
                { "outcomePrices": ["1.45", "0.10"] },
                { "question": "no prices" },
                { "outcomePrices": ["0.45", "0.56"] }
            ]
        }));

        let (records, skipped) = from_polymarket(&[event]);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 3);
        assert_eq!(records[0].event_time, None);
    }

    #[test]
    fn test_polymarket_bad_start_date_skips_record() {
        let event = gamma_event(serde_json::json!({
            "title": "Duke vs. North Carolina",
            "startDate": "tonight",
            "markets": [{ "outcomePrices": ["0.45", "0.56"] }]
        }));

        let market = &event.markets[0];
        assert!(matches!(
            polymarket_market(&event, market),
            Err(RecordError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_polymarket_title_falls_back_to_question() {
        let event = gamma_event(serde_json::json!({
            "markets": [{ "question": "Kansas vs. Baylor", "outcomePrices": ["0.5", "0.5"] }]
        }));
        let record = polymarket_market(&event, &event.markets[0]).unwrap();
        assert_eq!(record.title, "Kansas vs. Baylor");

        let untitled = gamma_event(serde_json::json!({
            "markets": [{ "outcomePrices": ["0.5", "0.5"] }]
        }));
        assert_eq!(
            polymarket_market(&untitled, &untitled.markets[0]),
            Err(RecordError::MissingField("title"))
        );
    }

    // ==================== Kalshi Tests ====================

    #[test]
    fn test_kalshi_scales_cents() {
        let market = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(56)));
        let record = kalshi_market(&market, KalshiNoPrice::NoAsk).unwrap();

        assert_eq!(record.exchange, Exchange::Kalshi);
        assert_eq!(record.id, "KXCBBGAME-26MAR07DUKEUNC-DUKE");
        assert_eq!(record.yes_price, dec!(0.46));
        assert_eq!(record.no_price, dec!(0.56));
        assert!(record.event_time.is_some());
    }

    #[test]
    fn test_kalshi_yes_falls_back_to_bid() {
        let market = kalshi(Some(dec!(44)), None, Some(dec!(56)));
        let record = kalshi_market(&market, KalshiNoPrice::NoAsk).unwrap();
        assert_eq!(record.yes_price, dec!(0.44));
    }

    #[test]
    fn test_kalshi_empty_yes_ask_book_falls_back_to_bid() {
        let market = kalshi(Some(dec!(44)), Some(dec!(0)), Some(dec!(50)));
        let record = kalshi_market(&market, KalshiNoPrice::NoAsk).unwrap();
        assert_eq!(record.yes_price, dec!(0.44));
        assert_eq!(record.no_price, dec!(0.50));

        let market = kalshi(Some(dec!(44)), Some(dec!(100)), Some(dec!(50)));
        let record = kalshi_market(&market, KalshiNoPrice::NoAsk).unwrap();
        assert_eq!(record.yes_price, dec!(0.44));
    }

    #[test]
    fn test_kalshi_empty_yes_book_without_bid_is_unquoted() {
        let market = kalshi(None, Some(dec!(0)), Some(dec!(50)));
        assert_eq!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::Unquoted {
                field: "yes_ask",
                cents: dec!(0)
            })
        );

        let market = kalshi(Some(dec!(0)), Some(dec!(0)), Some(dec!(50)));
        assert_eq!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::Unquoted {
                field: "yes_bid",
                cents: dec!(0)
            })
        );
    }

    #[test]
    fn test_kalshi_inverse_yes_ask() {
        let market = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(60)));
        let record = kalshi_market(&market, KalshiNoPrice::InverseYesAsk).unwrap();
        assert_eq!(record.no_price, dec!(0.54));
    }

    #[test]
    fn test_kalshi_no_ask_100_is_unquoted() {
        let market = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(100)));
        assert_eq!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::Unquoted {
                field: "no_ask",
                cents: dec!(100)
            })
        );
    }

    #[test]
    fn test_kalshi_zero_no_ask_is_unquoted() {
        let market = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(0)));
        assert!(matches!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::Unquoted { .. })
        ));
    }

    #[test]
    fn test_kalshi_missing_sides() {
        let market = kalshi(None, None, Some(dec!(56)));
        assert_eq!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::MissingField("yes_ask"))
        );

        let market = kalshi(Some(dec!(44)), Some(dec!(46)), None);
        assert_eq!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::MissingField("no_ask"))
        );
    }

    #[test]
    fn test_kalshi_out_of_range_cents() {
        let market = kalshi(None, Some(dec!(146)), Some(dec!(56)));
        assert!(matches!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::PriceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_kalshi_bad_close_time() {
        let mut market = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(56)));
        market.close_time = Some("soon".to_string());
        assert!(matches!(
            kalshi_market(&market, KalshiNoPrice::NoAsk),
            Err(RecordError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_from_kalshi_counts_skipped() {
        let good = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(56)));
        let bad = kalshi(Some(dec!(44)), Some(dec!(46)), Some(dec!(100)));
        let (records, skipped) = from_kalshi(&[good, bad], KalshiNoPrice::NoAsk);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
    }
}
