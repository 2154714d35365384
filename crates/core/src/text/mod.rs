//! Text pipeline: sanitize raw book text, reflow it into pages, pair pages into spreads.

pub mod paginate;
pub mod sanitize;
pub mod spread;

pub use paginate::{Layout, Page, ParseLayoutError, paginate, split_sentences};
pub use sanitize::sanitize;
pub use spread::{Slot, Spread, spread_at, spread_count};
