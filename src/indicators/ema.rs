// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent values, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   k      = 2 / (span + 1)
//   EMA_0  = x_0
//   EMA_t  = x_t * k + EMA_{t-1} * (1 - k)
//
// The very first EMA value is seeded with the first observation itself, not
// with an SMA of the first `span` values, so the series has no warmup gap.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::types::IndicatorSeries;

/// Accumulator for the EMA recurrence.
///
/// `step` is a pure transition: it consumes the state and the next input and
/// returns the new state together with the EMA at that input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaState {
    k: f64,
    value: Option<f64>,
}

impl EmaState {
    /// Fresh state for the given span. Fails when `span < 1` or is not finite.
    pub fn new(span: f64) -> Result<Self> {
        if !span.is_finite() || span < 1.0 {
            return Err(IndicatorError::invalid_parameter("span", span));
        }
        Ok(Self {
            k: 2.0 / (span + 1.0),
            value: None,
        })
    }

    /// Advance by one observation, returning the new state and the EMA at `x`.
    pub fn step(self, x: f64) -> (Self, f64) {
        let value = match self.value {
            None => x,
            Some(prev) => x * self.k + prev * (1.0 - self.k),
        };
        (
            Self {
                k: self.k,
                value: Some(value),
            },
            value,
        )
    }

    /// Current EMA, `None` until the first observation.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Compute the EMA series for `values` with smoothing span `span`.
///
/// The result is defined at every index and `result[0] == values[0]`.
///
/// # Errors
/// - `span < 1` => `InvalidParameter`
pub fn ema(values: &[f64], span: f64) -> Result<IndicatorSeries> {
    let state = EmaState::new(span)?;
    Ok(values
        .iter()
        .scan(state, |state, &x| {
            let (next, value) = state.step(x);
            *state = next;
            Some(Some(value))
        })
        .collect())
}

/// EMA over a series that may carry undefined entries.
///
/// The leading undefined prefix stays undefined and the smoother is seeded at
/// the first defined value, so a series that becomes defined at index `j`
/// yields the EMA of its defined suffix placed back at indices `j..`.
/// An undefined entry after the seed is reported as undefined and leaves the
/// accumulator untouched.
pub fn ema_defined(series: &[Option<f64>], span: f64) -> Result<IndicatorSeries> {
    let state = EmaState::new(span)?;
    Ok(series
        .iter()
        .scan(state, |state, x| {
            Some(x.map(|x| {
                let (next, value) = state.step(x);
                *state = next;
                value
            }))
        })
        .collect())
}
