// Bar ingestion helpers used by the runner. None of this is needed to compute
// indicators; the engines only ever see `&[Bar]`.

pub mod composite;
pub mod csv;

pub use composite::composite_index;
pub use self::csv::{load_bars, parse_bars, trim_to_lookback};
