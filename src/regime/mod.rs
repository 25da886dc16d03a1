// =============================================================================
// Regime Module
// =============================================================================
//
// Bearish regime assessment built on the indicator engines:
// - detector: five-condition snapshot plus trailing bear share
// - trend:    per-bar fast/slow SMA regime and regime-split performance

pub mod detector;
pub mod trend;

pub use detector::{
    bear_share, score, BearFlags, BearScorer, IndicatorFrame, RegimeReport, RegimeSummary,
};
pub use trend::{regime_performance, trend_regime, RegimePerformance, TrendRegime};
