// =============================================================================
// Shared types used across the indicator engines
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

/// An index-aligned indicator series. `None` marks an index where the
/// indicator is undefined (warmup or missing operands).
pub type IndicatorSeries = Vec<Option<f64>>;

/// A single daily OHLC bar.
///
/// Only `close` feeds the indicator engines; the other prices are carried
/// through for candlestick consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

/// Check the input contract of a bar sequence: non-empty, strictly ascending
/// dates, finite prices.
pub fn validate_bars(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(IndicatorError::InvalidInput("bar sequence is empty".into()));
    }

    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            return Err(IndicatorError::InvalidInput(format!(
                "non-finite price in bar {} ({})",
                i, bar.date
            )));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(IndicatorError::InvalidInput(format!(
                "dates not strictly ascending at bar {} ({} after {})",
                i,
                bar.date,
                bars[i - 1].date
            )));
        }
    }

    Ok(())
}

/// Same contract as [`validate_bars`] for the split closes/dates form.
pub fn validate_closes(closes: &[f64], dates: &[NaiveDate]) -> Result<()> {
    if closes.len() != dates.len() {
        return Err(IndicatorError::InvalidInput(format!(
            "{} closes but {} dates",
            closes.len(),
            dates.len()
        )));
    }
    if closes.is_empty() {
        return Err(IndicatorError::InvalidInput("bar sequence is empty".into()));
    }
    if let Some(i) = closes.iter().position(|c| !c.is_finite()) {
        return Err(IndicatorError::InvalidInput(format!(
            "non-finite close at index {i}"
        )));
    }
    if let Some(i) = dates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(IndicatorError::InvalidInput(format!(
            "dates not strictly ascending at index {}",
            i + 1
        )));
    }
    Ok(())
}

/// Extract closing prices, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Extract bar dates, oldest first.
pub fn dates(bars: &[Bar]) -> Vec<NaiveDate> {
    bars.iter().map(|b| b.date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn flat_bar(n: u32, close: f64) -> Bar {
        Bar::new(day(n), close, close, close, close)
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(matches!(
            validate_bars(&[]),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicate_date_rejected() {
        let bars = vec![flat_bar(0, 1.0), flat_bar(1, 1.0), flat_bar(1, 1.0)];
        assert!(matches!(
            validate_bars(&bars),
            Err(IndicatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn descending_date_rejected() {
        let bars = vec![flat_bar(3, 1.0), flat_bar(2, 1.0)];
        assert!(validate_bars(&bars).is_err());
    }

    #[test]
    fn non_finite_price_rejected() {
        let mut bar = flat_bar(1, 1.0);
        bar.high = f64::INFINITY;
        assert!(validate_bars(&[flat_bar(0, 1.0), bar]).is_err());
    }

    #[test]
    fn well_formed_sequence_accepted() {
        let bars: Vec<Bar> = (0..5).map(|i| flat_bar(i, 10.0 + i as f64)).collect();
        assert!(validate_bars(&bars).is_ok());
        assert_eq!(closes(&bars), vec![10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(dates(&bars)[4], day(4));
    }

    #[test]
    fn closes_and_dates_must_match_in_length() {
        assert!(validate_closes(&[1.0, 2.0], &[day(0)]).is_err());
        assert!(validate_closes(&[1.0, f64::NAN], &[day(0), day(1)]).is_err());
        assert!(validate_closes(&[1.0, 2.0], &[day(1), day(0)]).is_err());
        assert!(validate_closes(&[1.0, 2.0], &[day(0), day(1)]).is_ok());
    }
}
