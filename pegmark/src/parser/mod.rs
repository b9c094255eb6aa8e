//! Packrat parser and multi-pass driver.
//!
//! Parsing happens in passes over the same preformatted source: a reference
//! collection pass, a note collection pass (footnotes extension only), the
//! block pass, and finally an expansion pass that re-parses the deferred raw
//! contents of list items, block quotes and notes. Memoized state is
//! committed away between passes.
mod block;
mod engine;
mod extensions;
mod html;
mod inline;

use std::collections::HashMap;

use log::{debug, trace};

use self::engine::{Memo, Rule};
use crate::types::{Document, Element, ElementKind, Extensions, Link, Note};

/// Hard tabs are expanded to the next multiple of this column.
const TABSTOP: usize = 4;

pub(crate) struct Parser<'a> {
  src:        &'a str,
  pos:        usize,
  ext:        Extensions,
  references: Vec<Link>,
  notes:      Vec<Element>,
  memo:       HashMap<(Rule, usize), Memo>,
}

impl<'a> Parser<'a> {
  pub(crate) fn new(src: &'a str, ext: Extensions) -> Self {
    Self {
      src,
      pos: 0,
      ext,
      references: Vec::new(),
      notes: Vec::new(),
      memo: HashMap::new(),
    }
  }

  /// Clear memoized state at a safe cut point between passes.
  pub(crate) fn commit(&mut self) {
    self.memo.clear();
  }

  /// Parse an already-preformatted substring as blocks, sharing the
  /// reference and note tables of this parser.
  fn parse_chunk(&self, chunk: &str) -> Vec<Element> {
    let mut sub = Parser::new(chunk, self.ext);
    sub.references = self.references.clone();
    sub.notes = self.notes.clone();
    sub.document()
  }

  /// The note table as document state: each definition's label with its
  /// content expanded to blocks, in collection order.
  fn collected_notes(&self) -> Vec<Note> {
    self
      .notes
      .iter()
      .filter_map(|note| match &note.kind {
        ElementKind::Note(Some(label)) => {
          let mut content = note.children.clone();
          self.expand_raw(&mut content);
          if content.len() == 1
            && matches!(content[0].kind, ElementKind::List)
          {
            if let Some(only) = content.pop() {
              content = only.children;
            }
          }
          Some(Note {
            label: label.clone(),
            content,
          })
        },
        _ => None,
      })
      .collect()
  }

  /// Replace every `Raw` element with the blocks its chunks parse to.
  ///
  /// Chunks are parsed separately so that nested blocks that were not
  /// separated by a blank line in the source do not merge into one
  /// paragraph. Nested structures shrink with every round, so the
  /// recursion terminates.
  fn expand_raw(&self, elements: &mut Vec<Element>) {
    for element in elements.iter_mut() {
      if let ElementKind::Raw(chunks) = &mut element.kind {
        let chunks = std::mem::take(chunks);
        let mut children = Vec::new();
        for chunk in &chunks {
          children.extend(self.parse_chunk(chunk));
        }
        element.kind = ElementKind::List;
        element.children = children;
      }
      self.expand_raw(&mut element.children);
    }
  }
}

/// Expand hard tabs to [`TABSTOP`] columns and terminate the final block.
///
/// The grammar requires every block to end in a blank line; appending one
/// here keeps the productions free of end-of-input special cases.
fn preformat(source: &str) -> String {
  let mut out = String::with_capacity(source.len() + 2);
  let mut column = 0usize;
  for ch in source.chars() {
    match ch {
      '\t' => {
        let pad = TABSTOP - (column % TABSTOP);
        for _ in 0..pad {
          out.push(' ');
        }
        column += pad;
      },
      '\n' => {
        out.push('\n');
        column = 0;
      },
      _ => {
        out.push(ch);
        column += 1;
      },
    }
  }
  out.push_str("\n\n");
  out
}

/// Run every pass over `source` and return the finished document.
pub(crate) fn parse(source: &str, extensions: Extensions) -> Document {
  let prepared = preformat(source);
  let mut parser = Parser::new(&prepared, extensions);

  parser.references = parser.collect_references();
  trace!("references pass found {} definitions", parser.references.len());
  parser.commit();

  if extensions.notes {
    parser.notes = parser.collect_notes();
    trace!("notes pass found {} definitions", parser.notes.len());
    parser.commit();
  }

  let mut blocks = parser.document();
  parser.commit();
  parser.expand_raw(&mut blocks);
  debug!("parsed {} top-level blocks", blocks.len());

  let notes = parser.collected_notes();

  Document {
    blocks,
    references: parser.references,
    notes,
    extensions,
  }
}

#[cfg(test)]
mod tests {
  use super::preformat;

  #[test]
  fn preformat_appends_terminating_blank_line() {
    assert_eq!(preformat("abc"), "abc\n\n");
    assert_eq!(preformat(""), "\n\n");
  }

  #[test]
  fn preformat_expands_tabs_to_four_column_stops() {
    assert_eq!(preformat("\tx"), "    x\n\n");
    assert_eq!(preformat("ab\tx"), "ab  x\n\n");
    assert_eq!(preformat("abcd\tx"), "abcd    x\n\n");
  }

  #[test]
  fn preformat_resets_columns_at_newlines() {
    assert_eq!(preformat("a\n\tx"), "a\n    x\n\n");
  }
}
