// =============================================================================
// bear-regime - causal daily indicators and a bearish regime scorer
// =============================================================================
//
// The indicator core (`indicators`, `regime`) is pure: it takes an ordered bar
// sequence and returns index-aligned series plus one summary record. File
// loading, configuration and report rendering sit around it for the runner.
// =============================================================================

pub mod error;
pub mod indicators;
pub mod market_data;
pub mod regime;
pub mod report;
pub mod runtime_config;
pub mod types;

pub use error::{IndicatorError, Result};
pub use regime::{score, BearScorer, RegimeReport, RegimeSummary};
pub use runtime_config::{IndicatorParams, RuntimeConfig};
pub use types::{Bar, IndicatorSeries};
