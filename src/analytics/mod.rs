//! Dashboard analytics: KPIs, trend, period charts, segmentation, lookup.
//!
//! Everything here is pure and operates on already-loaded rows, so the TUI
//! can recompute a view on every control change without touching the disk.

pub mod kpi;
pub mod lookup;
pub mod periods;
pub mod segments;
pub mod trend;

pub use kpi::compute_kpis;
pub use lookup::{lookup, LookupOptions};
pub use periods::{period_sales, weekly_sales};
pub use segments::{customers_by_country, top_countries_with_others};
pub use trend::{date_bounds, filter_by_range, sales_trend};
