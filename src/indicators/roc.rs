// =============================================================================
// Rate of Change (ROC) - Momentum Indicator
// =============================================================================
//
// ROC measures the fractional change in price over a look-back period:
//   ROC_t = close_t / close_{t-n} - 1
//
// Positive ROC indicates upward momentum; negative indicates downward.

use crate::error::{IndicatorError, Result};
use crate::types::IndicatorSeries;

/// Look-back of the headline momentum figure (`ret20`).
pub const DEFAULT_RETURN_LOOKBACK: usize = 20;

/// Calculate the rate of change for every index.
///
/// `None` for `i < lookback` and wherever the base close is zero.
pub fn rate_of_change(closes: &[f64], lookback: usize) -> Result<IndicatorSeries> {
    if lookback == 0 {
        return Err(IndicatorError::invalid_parameter("lookback", 0.0));
    }

    Ok((0..closes.len())
        .map(|i| {
            let base = closes[i.checked_sub(lookback)?];
            (base != 0.0).then(|| closes[i] / base - 1.0)
        })
        .collect())
}
