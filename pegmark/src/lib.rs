//! # pegmark - a PEG-based Markdown to HTML engine
//!
//! This crate turns Markdown text into an HTML fragment. It implements the
//! peg-markdown dialect with a hand-written packrat parser: a
//! recursive-descent grammar with ordered choice, unlimited lookahead and
//! per-position memoization, driven in multiple passes so that forward
//! references and footnotes resolve.
//!
//! ## Quick start
//!
//! ```rust
//! use pegmark::Extensions;
//!
//! let doc = pegmark::parse("# Hello\n\nSome *emphasis*.\n", Extensions::default());
//! let html = doc.to_html();
//!
//! assert!(html.contains("<h1>Hello</h1>"));
//! assert!(html.contains("<em>emphasis</em>"));
//! ```
//!
//! ## Extensions
//!
//! Smart typography, footnotes and definition lists are off by default and
//! enabled per document:
//!
//! ```rust
//! use pegmark::ExtensionsBuilder;
//!
//! let ext = ExtensionsBuilder::new().smart(true).notes(true).build();
//! let html = pegmark::render_html("It's a test[^n]...\n\n[^n]: A note.\n", ext);
//!
//! assert!(html.contains("&rsquo;"));
//! assert!(html.contains("class=\"notes\""));
//! ```
//!
//! ## Rendering to a sink
//!
//! [`Document::write_html`] streams into any [`std::io::Write`] value and
//! propagates the first failed write; [`Document::to_html`] is the
//! in-memory convenience over it.
//!
//! Parsing is total: every byte sequence produces a document, with
//! unrecognized input carried through as literal text. There is no parse
//! error type.

mod parser;
mod render;
mod types;

pub use render::RenderError;
pub use types::{
  Document,
  Element,
  ElementKind,
  Extensions,
  ExtensionsBuilder,
  Link,
  MarkdownParser,
  Note,
};

/// Parse a Markdown source into a [`Document`].
///
/// Runs the reference pass, the note pass (when the footnotes extension is
/// enabled), the block pass, and the raw-content expansion pass.
#[must_use]
pub fn parse(source: &str, extensions: Extensions) -> Document {
  parser::parse(source, extensions)
}

/// Parse and render in one step.
#[must_use]
pub fn render_html(source: &str, extensions: Extensions) -> String {
  parse(source, extensions).to_html()
}
