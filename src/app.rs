//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the album and track
//! listings, cursors, focus and the request generations that guard against
//! stale catalog responses.

mod model;

pub use model::*;
