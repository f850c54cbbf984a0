//! Filtering, sorting and view state for screening records.
//!
//! [`state::ViewState`] owns the loaded records together with the current
//! filter and sort selections and derives the rows to display from them.

pub mod domain;
pub mod filter;
pub mod loader;
pub mod record;
pub mod sort;
pub mod state;

pub use domain::ViewError;
pub use record::{Field, Record};
pub use state::ViewState;
