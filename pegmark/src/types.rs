//! Types for the pegmark public API and the parse tree.
//!
//! The parse tree is a plain owned tree: every [`Element`] owns its children
//! in a `Vec`, in source order. There is no arena and no shared state; a
//! [`Document`] is an ordinary value that can be sent across threads.

use serde::{Deserialize, Serialize};

/// Extension switches for the parser and renderer.
///
/// All options default to off; the core grammar is always enabled.
///
/// # Examples
///
/// ```
/// use pegmark::Extensions;
///
/// let ext = Extensions {
///   smart: true,
///   notes: true,
///   ..Default::default()
/// };
/// let html = pegmark::parse("Hello...\n", ext).to_html();
/// assert!(html.contains("&hellip;"));
/// ```
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct Extensions {
  /// Recognize `...`, `--`, `'`, `"` as typographic atoms and emit HTML
  /// entities for them.
  pub smart: bool,

  /// Recognize `[^label]`, `^[inline]` and `[^label]: ...` footnote syntax
  /// and emit a notes section.
  pub notes: bool,

  /// Recognize `:`/`~` definition markers and the preceding title lines.
  pub dlists: bool,

  /// Drop raw inline HTML and HTML blocks from the output.
  pub filter_html: bool,

  /// Drop `<style>` block contents from the output.
  pub filter_styles: bool,
}

impl Extensions {
  /// Enable every extension except the HTML/style filters.
  #[must_use]
  pub const fn all() -> Self {
    Self {
      smart:         true,
      notes:         true,
      dlists:        true,
      filter_html:   false,
      filter_styles: false,
    }
  }
}

/// Builder for constructing [`Extensions`] with method chaining.
#[derive(Debug, Clone, Default)]
pub struct ExtensionsBuilder {
  extensions: Extensions,
}

impl ExtensionsBuilder {
  /// Create a new builder with all extensions off.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Enable or disable smart typography.
  #[must_use]
  pub const fn smart(mut self, enabled: bool) -> Self {
    self.extensions.smart = enabled;
    self
  }

  /// Enable or disable footnotes.
  #[must_use]
  pub const fn notes(mut self, enabled: bool) -> Self {
    self.extensions.notes = enabled;
    self
  }

  /// Enable or disable definition lists.
  #[must_use]
  pub const fn dlists(mut self, enabled: bool) -> Self {
    self.extensions.dlists = enabled;
    self
  }

  /// Enable or disable the raw-HTML output filter.
  #[must_use]
  pub const fn filter_html(mut self, enabled: bool) -> Self {
    self.extensions.filter_html = enabled;
    self
  }

  /// Enable or disable the style-block output filter.
  #[must_use]
  pub const fn filter_styles(mut self, enabled: bool) -> Self {
    self.extensions.filter_styles = enabled;
    self
  }

  /// Build the final [`Extensions`].
  #[must_use]
  pub const fn build(self) -> Extensions {
    self.extensions
  }
}

/// Link payload shared by links, images and reference definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  /// Parsed inline tree of the link text.
  pub label: Vec<Element>,
  /// Destination URL, byte-for-byte as written.
  pub url:   String,
  /// Title, empty when none was given.
  pub title: String,
}

/// A footnote definition collected from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
  /// The label written between `[^` and `]`.
  pub label:   String,
  /// The definition's parsed block content.
  pub content: Vec<Element>,
}

/// The kind of a parse-tree node, together with its payload.
///
/// Levels in [`Heading`](ElementKind::Heading) are always in `1..=6`.
/// [`Raw`](ElementKind::Raw) holds not-yet-parsed block text: one string
/// per block chunk, where a chunk boundary marks a nested-block split that
/// had no blank line between (the driver re-parses each chunk separately).
/// `Raw` never survives into a finished [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
  // Structural containers
  /// Transparent grouping; renders as its children.
  List,
  Paragraph,
  Plain,
  BlockQuote,
  Verbatim(String),
  HtmlBlock(String),
  HorizontalRule,
  Heading(u8),
  BulletList,
  OrderedList,
  ListItem,
  DefinitionList,
  DefTitle,
  DefData,
  /// A link reference definition; renders nothing.
  Reference(Link),
  /// A footnote. `Some(label)` for definitions (render nothing),
  /// `None` for in-text uses (render a numbered reference).
  Note(Option<String>),
  /// Deferred block content, one string per chunk.
  Raw(Vec<String>),

  // Inline atoms
  Str(String),
  /// Inter-word whitespace; holds the rendered text (`" "` or `"\n"`).
  Space(String),
  LineBreak,
  Code(String),
  /// Raw inline HTML or an entity, emitted verbatim.
  Html(String),
  Ellipsis,
  EmDash,
  EnDash,
  Apostrophe,

  // Inline containers
  Emph,
  Strong,
  SingleQuoted,
  DoubleQuoted,
  Link(Link),
  Image(Link),
}

/// A node in the parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub kind:     ElementKind,
  pub children: Vec<Element>,
}

impl Element {
  /// Create a childless element.
  #[must_use]
  pub const fn new(kind: ElementKind) -> Self {
    Self {
      kind,
      children: Vec::new(),
    }
  }

  /// Create an element holding the given children.
  #[must_use]
  pub const fn with_children(
    kind: ElementKind,
    children: Vec<Element>,
  ) -> Self {
    Self { kind, children }
  }

  /// Create a `Str` element from text.
  #[must_use]
  pub fn text(text: impl Into<String>) -> Self {
    Self::new(ElementKind::Str(text.into()))
  }
}

/// A fully parsed document, ready for rendering.
///
/// Produced by [`parse`](crate::parse); render it with
/// [`write_html`](Document::write_html) or [`to_html`](Document::to_html).
#[derive(Debug, Clone)]
pub struct Document {
  pub(crate) blocks:     Vec<Element>,
  pub(crate) references: Vec<Link>,
  pub(crate) notes:      Vec<Note>,
  pub(crate) extensions: Extensions,
}

impl Document {
  /// The block elements of the document, in source order.
  #[must_use]
  pub fn blocks(&self) -> &[Element] {
    &self.blocks
  }

  /// Link reference definitions collected from the document.
  #[must_use]
  pub fn references(&self) -> &[Link] {
    &self.references
  }

  /// Footnote definitions collected from the document. Empty unless the
  /// footnotes extension is enabled.
  #[must_use]
  pub fn notes(&self) -> &[Note] {
    &self.notes
  }

  /// The extension set the document was parsed with.
  #[must_use]
  pub const fn extensions(&self) -> Extensions {
    self.extensions
  }
}

/// Reusable parser configured with a fixed extension set.
///
/// # Examples
///
/// ```
/// use pegmark::{Extensions, MarkdownParser};
///
/// let parser = MarkdownParser::new(Extensions::default());
/// let doc = parser.parse("# Title\n");
/// assert_eq!(doc.to_html(), "<h1>Title</h1>\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownParser {
  extensions: Extensions,
}

impl MarkdownParser {
  /// Create a parser with the given extensions.
  #[must_use]
  pub const fn new(extensions: Extensions) -> Self {
    Self { extensions }
  }

  /// The configured extension set.
  #[must_use]
  pub const fn extensions(&self) -> Extensions {
    self.extensions
  }

  /// Parse a source string into a [`Document`].
  #[must_use]
  pub fn parse(&self, source: &str) -> Document {
    crate::parser::parse(source, self.extensions)
  }
}
