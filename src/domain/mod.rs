//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - dataset granularities and their date conventions (`Granularity`)
//! - loaded rows (`Transaction`, `PeriodRevenue`)
//! - computed outputs (`Kpis`, `RevenuePoint`, `CountrySegment`)

pub mod types;

pub use types::*;
