// =============================================================================
// Moving-Average Trend Regime
// =============================================================================
//
// Labels every bar by the ordering of a fast and a slow SMA:
//   Bull    - fast > slow
//   Bear    - fast < slow
//   Neutral - equal, or either average still undefined
//
// `regime_performance` splits the compounded daily return of the series by
// that label, which shows how the instrument behaved inside each regime.

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendRegime {
    Bull,
    Bear,
    Neutral,
}

impl std::fmt::Display for TrendRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bull => write!(f, "BULL"),
            Self::Bear => write!(f, "BEAR"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Per-bar regime from two index-aligned SMA series.
pub fn trend_regime(sma_fast: &[Option<f64>], sma_slow: &[Option<f64>]) -> Vec<TrendRegime> {
    sma_fast
        .iter()
        .zip(sma_slow)
        .map(|pair| match pair {
            (Some(fast), Some(slow)) if fast > slow => TrendRegime::Bull,
            (Some(fast), Some(slow)) if fast < slow => TrendRegime::Bear,
            _ => TrendRegime::Neutral,
        })
        .collect()
}

/// Compounded returns inside bull and bear bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimePerformance {
    /// `prod(1 + r) - 1` over bull bars, 0.0 when there are none.
    pub bull_return: f64,
    /// `prod(1 + r) - 1` over bear bars, 0.0 when there are none.
    pub bear_return: f64,
    pub bull_bars: usize,
    pub bear_bars: usize,
}

/// Split the daily simple returns of `closes` by regime and compound each side.
///
/// The return at bar 0 is 0 (no prior close), as is any return whose prior
/// close is zero.
pub fn regime_performance(closes: &[f64], regimes: &[TrendRegime]) -> Result<RegimePerformance> {
    if closes.len() != regimes.len() {
        return Err(IndicatorError::InvalidInput(format!(
            "{} closes but {} regime labels",
            closes.len(),
            regimes.len()
        )));
    }

    let mut perf = RegimePerformance {
        bull_return: 1.0,
        bear_return: 1.0,
        bull_bars: 0,
        bear_bars: 0,
    };

    for (i, regime) in regimes.iter().enumerate() {
        let r = match i.checked_sub(1).map(|j| closes[j]) {
            Some(prev) if prev != 0.0 => closes[i] / prev - 1.0,
            _ => 0.0,
        };
        match regime {
            TrendRegime::Bull => {
                perf.bull_return *= 1.0 + r;
                perf.bull_bars += 1;
            }
            TrendRegime::Bear => {
                perf.bear_return *= 1.0 + r;
                perf.bear_bars += 1;
            }
            TrendRegime::Neutral => {}
        }
    }

    perf.bull_return -= 1.0;
    perf.bear_return -= 1.0;
    Ok(perf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regime_from_sma_ordering() {
        let fast = vec![None, Some(2.0), Some(1.0), Some(3.0)];
        let slow = vec![Some(1.0), Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(
            trend_regime(&fast, &slow),
            vec![
                TrendRegime::Neutral,
                TrendRegime::Bull,
                TrendRegime::Bear,
                TrendRegime::Neutral
            ]
        );
    }

    #[test]
    fn performance_split() {
        use TrendRegime::*;
        let closes = vec![100.0, 110.0, 99.0, 99.0, 108.9];
        let regimes = vec![Bull, Bull, Bear, Neutral, Bull];
        let perf = regime_performance(&closes, &regimes).unwrap();

        // bull: 0%, +10%, +10% => 1.21
        assert!((perf.bull_return - 0.21).abs() < 1e-10);
        // bear: -10%
        assert!((perf.bear_return + 0.10).abs() < 1e-10);
        assert_eq!((perf.bull_bars, perf.bear_bars), (3, 1));
    }

    #[test]
    fn performance_without_regime_bars_is_zero() {
        let perf = regime_performance(&[1.0, 2.0], &[TrendRegime::Neutral; 2]).unwrap();
        assert_eq!(perf.bull_return, 0.0);
        assert_eq!(perf.bear_return, 0.0);
    }

    #[test]
    fn performance_length_mismatch() {
        assert!(regime_performance(&[1.0, 2.0], &[TrendRegime::Bull]).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(TrendRegime::Bear.to_string(), "BEAR");
    }
}
