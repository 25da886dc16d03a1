// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   macd      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(macd, signal_span)
//   histogram = macd - signal
//
// The signal smoother only ever sees the defined part of the MACD line and
// writes its output back at the same indices, so all three series stay
// index-aligned with the closes.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::indicators::ema::{ema, ema_defined};
use crate::types::IndicatorSeries;

pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

/// The three MACD series, each the same length as the input closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// Compute MACD, its signal line and histogram.
///
/// # Errors
/// - any of `fast`, `slow`, `signal_span` is zero => `InvalidParameter`
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> Result<MacdSeries> {
    for (name, value) in [("fast", fast), ("slow", slow), ("signal_span", signal_span)] {
        if value < 1 {
            return Err(IndicatorError::invalid_parameter(name, value as f64));
        }
    }

    let ema_fast = ema(closes, fast as f64)?;
    let ema_slow = ema(closes, slow as f64)?;
    let macd_line = difference(&ema_fast, &ema_slow);

    let signal = ema_defined(&macd_line, signal_span as f64)?;
    let histogram = difference(&macd_line, &signal);

    Ok(MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    })
}

/// Element-wise `a - b`, undefined wherever either side is undefined.
fn difference(a: &[Option<f64>], b: &[Option<f64>]) -> IndicatorSeries {
    a.iter()
        .zip(b)
        .map(|(x, y)| Some((*x)? - (*y)?))
        .collect()
}
