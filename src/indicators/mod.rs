// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the regime
// scorer. Every series is index-aligned with its input and marks undefined
// entries with `None`; bad parameters surface as `IndicatorError`.

pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;

pub use ema::{ema, ema_defined, EmaState};
pub use macd::{macd, MacdSeries};
pub use roc::rate_of_change;
pub use rsi::{rsi, WilderState};
pub use sma::sma;
