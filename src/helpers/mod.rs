//! Helper functions for pages and templates
//!
//! Date formatting, HTML escaping and route building shared by the
//! listing and detail views.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
