pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod matching;
pub mod pid;
pub mod rect;
pub mod store;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use matching::{MatchSet, Query, find_overlaps};
pub use rect::{CornerPair, Point, Rectangle, overlaps, to_corners};
pub use store::{MemoryStore, RectangleStore};
