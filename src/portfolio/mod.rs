//! Portfolio state: position book, sentinels, snapshot loading

pub mod snapshot;
pub mod types;

pub use snapshot::{PortfolioSection, Snapshot};
pub use types::{
    InvalidPortfolioState, PositionBook, PositionRecord, CASH, PORTFOLIO, SENTINELS,
};
