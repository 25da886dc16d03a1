// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean of the trailing `window` values:
//   SMA_t = (x_{t-window+1} + ... + x_t) / window
//
// Maintained as a running sum (add newest, subtract oldest) so the whole
// series costs O(N) regardless of the window length.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::types::IndicatorSeries;

/// Compute the SMA series for `values` over `window`.
///
/// The output has the same length as `values`. Indices `i < window - 1` are
/// `None`; every later index holds the mean of `values[i + 1 - window..=i]`.
///
/// # Errors
/// - `window == 0` => `InvalidParameter`
///
/// An empty input yields an empty series.
pub fn sma(values: &[f64], window: usize) -> Result<IndicatorSeries> {
    if window == 0 {
        return Err(IndicatorError::invalid_parameter("window", 0.0));
    }

    let divisor = window as f64;
    let mut sum = 0.0;
    let mut result = Vec::with_capacity(values.len());

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        result.push(if i + 1 >= window { Some(sum / divisor) } else { None });
    }

    Ok(result)
}
