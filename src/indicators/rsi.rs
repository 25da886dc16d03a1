// =============================================================================
// Relative Strength Index (RSI) - Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether recent momentum favours buyers or sellers.
//
// Step 1 - Per-bar gain / loss from consecutive closes (both 0 at index 0).
// Step 2 - At index `period`, seed average gain / average loss with the simple
//          mean of gains / losses at indices 1..=period.
// Step 3 - Apply Wilder's exponential smoothing for every later index:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 - RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS),  or exactly 100 when avg_loss == 0.
// =============================================================================

use crate::error::{IndicatorError, Result};
use crate::types::IndicatorSeries;

/// Default look-back used by the regime scorer.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Wilder accumulator over per-bar gains and losses.
///
/// Collects the first `period` gain/loss pairs for the seed, then switches to
/// the recursive update. `step` never mutates in place; it returns the next
/// state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WilderState {
    period: usize,
    seen: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderState {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(IndicatorError::invalid_parameter("period", 0.0));
        }
        Ok(Self {
            period,
            seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        })
    }

    /// Feed the gain/loss of one bar (index >= 1).
    pub fn step(self, gain: f64, loss: f64) -> Self {
        let p = self.period as f64;
        let seen = self.seen + 1;

        let (avg_gain, avg_loss) = if seen < self.period {
            // still accumulating raw sums for the seed
            (self.avg_gain + gain, self.avg_loss + loss)
        } else if seen == self.period {
            ((self.avg_gain + gain) / p, (self.avg_loss + loss) / p)
        } else {
            (
                (self.avg_gain * (p - 1.0) + gain) / p,
                (self.avg_loss * (p - 1.0) + loss) / p,
            )
        };

        Self {
            period: self.period,
            seen,
            avg_gain,
            avg_loss,
        }
    }

    /// `(avg_gain, avg_loss)` once the seed has been taken.
    pub fn averages(&self) -> Option<(f64, f64)> {
        (self.seen >= self.period).then_some((self.avg_gain, self.avg_loss))
    }

    /// RSI for the current averages, `None` during warmup.
    pub fn rsi(&self) -> Option<f64> {
        self.averages()
            .map(|(avg_gain, avg_loss)| rsi_from_averages(avg_gain, avg_loss))
    }
}

/// Compute the full RSI series for `closes` with look-back `period`.
///
/// The output is index-aligned with `closes`: indices `i < period` are `None`,
/// the seed lands at `i == period`.
///
/// # Edge cases
/// - `period == 0` => `InvalidParameter`
/// - `closes.len() <= period` => every entry `None`
/// - Average loss of zero (including a flat market) => RSI is exactly 100.0
pub fn rsi(closes: &[f64], period: usize) -> Result<IndicatorSeries> {
    let state = WilderState::new(period)?;

    let mut result = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return Ok(result);
    }
    result.push(None);

    result.extend(closes.windows(2).scan(state, |state, w| {
        let delta = w[1] - w[0];
        *state = state.step(delta.max(0.0), (-delta).max(0.0));
        Some(state.rsi())
    }));

    Ok(result)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
