//! Output writers.
//!
//! - [`csv`]: filtered records as a comma-separated table, header taken from
//!   the first record
//! - [`json`]: the full [`SiteReport`](crate::models::SiteReport) for one URL

pub mod csv;
pub mod json;
