//! HTML-like span markup rendering for regnet.
//!
//! Two renderers, both pure and synchronous (no HTTP, no database):
//!
//! - [`render_sentence`] — per-mention inline markup over a token sequence,
//!   used for the short evidence snippets stored on each evidence row.
//! - [`annotate_document`] — document-level sweep that stacks every mention's
//!   character spans into nested tags over the full article text.
//!
//! # Quick start
//!
//! ```
//! use regnet_core::span::Span;
//!
//! let tokens: Vec<String> =
//!   ["A", "binds", "B"].iter().map(|s| s.to_string()).collect();
//! let html = regnet_markup::render_sentence(
//!   &tokens,
//!   "Positive_regulation",
//!   Span::new(0, 3), // event
//!   Span::new(0, 1), // controller
//!   Span::new(2, 3), // controlled
//!   Span::new(1, 2), // trigger
//! );
//! assert!(html.contains("<span class=\"controller\">A</span>"));
//! ```

mod document;
mod sentence;

pub use document::annotate_document;
pub use sentence::{detokenize, render_sentence, splice_tags};
