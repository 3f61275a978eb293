//! Reporting utilities: number formatting and text renditions of the dashboard.

mod format;

pub use format::*;
