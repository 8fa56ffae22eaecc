//! Output generation for collected articles.
//!
//! # Submodules
//!
//! - [`html`]: Renders a standalone, filterable HTML page
//! - [`json`]: Writes the article list as a JSON array

pub mod html;
pub mod json;
