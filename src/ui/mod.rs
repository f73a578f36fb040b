//! User interface rendering layer.
//!
//! The UI is a pure consumer of dashboard state:
//!
//! ```text
//! Dashboard → compute_viewmodel → UIViewModel → render → text frame
//! ```
//!
//! User input flows back only as `Event::SetQuery` and `Event::Refetch`.
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and number formatting
//! - [`renderer`]: Frame layout

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use viewmodel::{
    format_change, format_large_number, format_price, format_supply, DisplayItem, EmptyState,
    FooterInfo, HeaderInfo, SearchBarInfo, UIViewModel,
};
