//! Terminal plotting helpers for non-interactive output.

pub mod ascii;

pub use ascii::{render_bar_chart, render_line_chart};
