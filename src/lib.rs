//! Theme-park review analyser: load the review dataset once, group it by
//! branch and derive the statistics behind every menu, chart and export.

pub mod app;
pub mod branch;
pub mod chart;
pub mod error;
pub mod loader;
pub mod menu;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use branch::Branch;
pub use error::{Result, ReviewError};
pub use loader::Repository;
pub use reports::ReviewFilter;
pub use types::{RawRow, Review, ReviewField};
