//! Chart rendering and output naming.
//!
//! - **chart**: percentage bar charts drawn with plotters
//! - **layout**: nested and flat per-partition file layouts

pub mod chart;
pub mod layout;

pub use chart::{ChartError, ChartSpec, fonts_available, render_chart};
pub use layout::{FlatLayout, NestedLayout, OutputLayout, global_chart_path, path_component};
