//! Composed template sets and two-phase rendering.
//!
//! Pages are HTML fragments that extend a shared base layout and may include
//! shared partials. At startup the builder composes one self-contained
//! template set per page; the resulting [`TemplateCache`] is immutable and is
//! read concurrently by every request for the process lifetime.
//!
//! Rendering is two-phase: a page is always executed into a private buffer
//! first, and only a fully rendered body is ever handed to the response. A
//! failure partway through execution discards the buffer, so a client never
//! receives a truncated page.
//!
//! # Example
//!
//! ```ignore
//! use snipbin_render::{build_cache, FilterTable};
//!
//! let cache = build_cache("ui/html".as_ref(), &FilterTable::standard())?;
//! let body = cache.render("home", &data)?;
//! ```

mod build;
mod cache;
mod error;
mod filters;

pub use build::build_cache;
pub use cache::{RenderUnit, TemplateCache};
pub use error::{RenderError, TemplateError};
pub use filters::FilterTable;
