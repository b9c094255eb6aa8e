//! HTML rendering.
//!
//! The writer walks the block tree and streams HTML to any
//! [`io::Write`] sink, stopping at the first failed write. Newlines
//! between blocks follow a padding discipline: every block asks for the
//! number of newlines it wants in front of itself, and the writer emits
//! only the ones not already present, so blocks end up separated by one
//! blank line and the document by a single trailing newline.

use std::io::{self, Write};

use crate::types::{Document, Element, ElementKind};

/// Error produced while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  /// The output sink rejected a write.
  #[error("failed to write HTML output: {0}")]
  Io(#[from] io::Error),
}

impl Document {
  /// Render the document as HTML into `sink`.
  ///
  /// # Errors
  ///
  /// Returns the first I/O error reported by the sink; rendering stops at
  /// that point.
  pub fn write_html(
    &self,
    sink: &mut impl Write,
  ) -> Result<(), RenderError> {
    let mut writer = HtmlWriter::new(sink);
    writer.elements(&self.blocks)?;
    writer.finish()?;
    Ok(())
  }

  /// Render the document to a `String`.
  #[must_use]
  pub fn to_html(&self) -> String {
    let mut buf = Vec::new();
    if self.write_html(&mut buf).is_err() {
      // Writes into a Vec are infallible.
      return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
  }
}

struct HtmlWriter<'a, W: Write> {
  out:    &'a mut W,
  /// Newlines already emitted at the tail of the output.
  padded: usize,
  /// Whether anything has been written at all.
  wrote:  bool,
  /// Footnote uses encountered so far, in document order.
  notes:  Vec<Element>,
}

impl<'a, W: Write> HtmlWriter<'a, W> {
  fn new(out: &'a mut W) -> Self {
    Self {
      out,
      // Suppress padding in front of the first block.
      padded: 2,
      wrote: false,
      notes: Vec::new(),
    }
  }

  /// Ensure at least `want` newlines separate us from earlier output.
  fn pad(&mut self, want: usize) -> io::Result<()> {
    while self.padded < want {
      self.out.write_all(b"\n")?;
      self.padded += 1;
      self.wrote = true;
    }
    Ok(())
  }

  fn raw(&mut self, s: &str) -> io::Result<()> {
    if !s.is_empty() {
      self.out.write_all(s.as_bytes())?;
      self.wrote = true;
    }
    Ok(())
  }

  /// Text escaping: `&`, `<`, `>`.
  fn text(&mut self, s: &str) -> io::Result<()> {
    self.raw(&html_escape::encode_text(s))
  }

  /// Code and attribute escaping: the text set plus `"`, which must not
  /// survive inside code spans or quoted attribute values.
  fn attr(&mut self, s: &str) -> io::Result<()> {
    let mut rest = s;
    while let Some(idx) = rest.find(&['&', '<', '>', '"'][..]) {
      self.raw(&rest[..idx])?;
      let entity = match rest.as_bytes()[idx] {
        b'&' => "&amp;",
        b'<' => "&lt;",
        b'>' => "&gt;",
        _ => "&quot;",
      };
      self.raw(entity)?;
      rest = &rest[idx + 1..];
    }
    self.raw(rest)
  }

  fn elements(&mut self, elements: &[Element]) -> io::Result<()> {
    for element in elements {
      self.element(element)?;
    }
    Ok(())
  }

  fn element(&mut self, element: &Element) -> io::Result<()> {
    use ElementKind as K;
    match &element.kind {
      K::List => self.elements(&element.children)?,

      // Blocks
      K::Paragraph => {
        self.pad(2)?;
        self.raw("<p>")?;
        self.elements(&element.children)?;
        self.raw("</p>")?;
        self.padded = 0;
      },
      K::Plain => {
        self.pad(1)?;
        self.elements(&element.children)?;
        self.padded = 0;
      },
      K::BlockQuote => {
        self.pad(2)?;
        self.raw("<blockquote>\n")?;
        self.padded = 2;
        self.elements(&element.children)?;
        self.pad(1)?;
        self.raw("</blockquote>")?;
        self.padded = 0;
      },
      K::Verbatim(text) => {
        self.pad(2)?;
        self.raw("<pre><code>")?;
        self.attr(text)?;
        self.raw("</code></pre>")?;
        self.padded = 0;
      },
      K::HtmlBlock(html) => {
        self.pad(2)?;
        self.raw(html)?;
        self.padded = 0;
      },
      K::HorizontalRule => {
        self.pad(2)?;
        self.raw("<hr/>")?;
        self.padded = 0;
      },
      K::Heading(level) => {
        self.pad(2)?;
        self.raw(&format!("<h{level}>"))?;
        self.elements(&element.children)?;
        self.raw(&format!("</h{level}>"))?;
        self.padded = 0;
      },
      K::BulletList => {
        self.pad(2)?;
        self.raw("<ul>")?;
        self.padded = 0;
        self.elements(&element.children)?;
        self.pad(1)?;
        self.raw("</ul>")?;
        self.padded = 0;
      },
      K::OrderedList => {
        self.pad(2)?;
        self.raw("<ol>")?;
        self.padded = 0;
        self.elements(&element.children)?;
        self.pad(1)?;
        self.raw("</ol>")?;
        self.padded = 0;
      },
      K::ListItem => {
        self.pad(1)?;
        self.raw("<li>")?;
        self.padded = 2;
        self.elements(&element.children)?;
        self.raw("</li>")?;
        self.padded = 0;
      },
      K::DefinitionList => {
        self.pad(2)?;
        self.raw("<dl>")?;
        self.padded = 0;
        self.elements(&element.children)?;
        self.pad(1)?;
        self.raw("</dl>")?;
        self.padded = 0;
      },
      K::DefTitle => {
        self.pad(1)?;
        self.raw("<dt>")?;
        self.padded = 2;
        self.elements(&element.children)?;
        self.raw("</dt>")?;
        self.padded = 0;
      },
      K::DefData => {
        self.pad(1)?;
        self.raw("<dd>")?;
        self.padded = 2;
        self.elements(&element.children)?;
        self.raw("</dd>")?;
        self.padded = 0;
      },
      K::Reference(_) | K::Note(Some(_)) => {},
      K::Note(None) => {
        self.notes.push(element.clone());
        let number = self.notes.len();
        self.raw(&format!(
          "<a class=\"noteref\" id=\"fnref:{number}\" \
           href=\"#fn:{number}\"><sup>{number}</sup></a>"
        ))?;
      },
      K::Raw(_) => {
        debug_assert!(false, "raw content survived expansion");
      },

      // Inlines
      K::Str(text) => self.text(text)?,
      K::Space(text) => self.raw(text)?,
      K::LineBreak => self.raw("<br/>\n")?,
      K::Code(code) => {
        self.raw("<code>")?;
        self.attr(code)?;
        self.raw("</code>")?;
      },
      K::Html(html) => self.raw(html)?,
      K::Ellipsis => self.raw("&hellip;")?,
      K::EmDash => self.raw("&mdash;")?,
      K::EnDash => self.raw("&ndash;")?,
      K::Apostrophe => self.raw("&rsquo;")?,
      K::Emph => {
        self.raw("<em>")?;
        self.elements(&element.children)?;
        self.raw("</em>")?;
      },
      K::Strong => {
        self.raw("<strong>")?;
        self.elements(&element.children)?;
        self.raw("</strong>")?;
      },
      K::SingleQuoted => {
        self.raw("&lsquo;")?;
        self.elements(&element.children)?;
        self.raw("&rsquo;")?;
      },
      K::DoubleQuoted => {
        self.raw("&ldquo;")?;
        self.elements(&element.children)?;
        self.raw("&rdquo;")?;
      },
      K::Link(link) => {
        self.raw("<a href=\"")?;
        self.attr(&link.url)?;
        self.raw("\"")?;
        if !link.title.is_empty() {
          self.raw(" title=\"")?;
          self.attr(&link.title)?;
          self.raw("\"")?;
        }
        self.raw(">")?;
        self.elements(&link.label)?;
        self.raw("</a>")?;
      },
      K::Image(link) => {
        self.raw("<img src=\"")?;
        self.attr(&link.url)?;
        self.raw("\" alt=\"")?;
        let mut alt = String::new();
        flatten_text(&link.label, &mut alt);
        self.attr(&alt)?;
        self.raw("\"")?;
        if !link.title.is_empty() {
          self.raw(" title=\"")?;
          self.attr(&link.title)?;
          self.raw("\"")?;
        }
        self.raw("/>")?;
      },
    }
    Ok(())
  }

  /// Emit the notes section, then the document's final newline.
  ///
  /// The notes list can grow while it is being rendered (a footnote whose
  /// text uses another footnote), so this iterates by index.
  fn finish(&mut self) -> io::Result<()> {
    if !self.notes.is_empty() {
      self.pad(2)?;
      self.raw("<hr/>\n<ol class=\"notes\">")?;
      self.padded = 0;
      let mut index = 0;
      while index < self.notes.len() {
        let note = self.notes[index].clone();
        let number = index + 1;
        self.pad(1)?;
        self.raw(&format!("<li id=\"fn:{number}\">"))?;
        self.padded = 2;
        self.elements(&note.children)?;
        self.raw(&format!(
          " <a href=\"#fnref:{number}\">&#8617;</a></li>"
        ))?;
        self.padded = 0;
        index += 1;
      }
      self.pad(1)?;
      self.raw("</ol>")?;
      self.padded = 0;
    }
    if self.wrote {
      self.out.write_all(b"\n")?;
    }
    Ok(())
  }
}

/// Flatten an inline tree to the plain text used for image alt attributes.
fn flatten_text(elements: &[Element], out: &mut String) {
  use ElementKind as K;
  for element in elements {
    match &element.kind {
      K::Str(s) | K::Space(s) | K::Code(s) => out.push_str(s),
      K::LineBreak => out.push('\n'),
      K::Ellipsis => out.push_str("..."),
      K::EmDash => out.push_str("--"),
      K::EnDash => out.push('-'),
      K::Apostrophe => out.push('\''),
      _ => flatten_text(&element.children, out),
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::types::Extensions;

  fn html(source: &str) -> String {
    crate::parse(source, Extensions::default()).to_html()
  }

  #[test]
  fn empty_document_renders_nothing() {
    assert_eq!(html(""), "");
    assert_eq!(html("\n\n\n"), "");
  }

  #[test]
  fn text_is_escaped() {
    assert_eq!(html("a < b & c > d\n"), "<p>a &lt; b &amp; c &gt; d</p>\n");
  }

  #[test]
  fn code_escaping_includes_quotes() {
    assert_eq!(
      html("`say \"hi\"`\n"),
      "<p><code>say &quot;hi&quot;</code></p>\n"
    );
  }

  #[test]
  fn blocks_are_separated_by_one_blank_line() {
    assert_eq!(html("one\n\ntwo\n"), "<p>one</p>\n\n<p>two</p>\n");
  }
}
