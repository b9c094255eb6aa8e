//! Block-level productions.
//!
//! A block rule consumes whole lines. Container blocks (block quotes, list
//! items, notes) do not parse their interiors here; they assemble the raw
//! line content into [`ElementKind::Raw`] chunks that the driver re-parses
//! once the whole document has been scanned.

use super::{Parser, engine::is_newline};
use crate::types::{Element, ElementKind, Link};

impl<'a> Parser<'a> {
  /// `Doc`: every block from the start of the input.
  pub(crate) fn document(&mut self) -> Vec<Element> {
    self.pos = 0;
    let mut blocks = Vec::new();
    while let Some(block) = self.block() {
      blocks.push(block);
    }
    blocks
  }

  /// One block, after skipping blank lines. Ordering is significant:
  /// references must be tried before paragraphs, lists before paragraphs,
  /// and the horizontal rule before bullet lists.
  fn block(&mut self) -> Option<Element> {
    let save = self.pos;
    while self.blank_line() {}
    let block = self
      .block_quote()
      .or_else(|| self.verbatim())
      .or_else(|| self.note_definition())
      .or_else(|| self.reference())
      .or_else(|| self.horizontal_rule())
      .or_else(|| self.heading())
      .or_else(|| self.definition_list())
      .or_else(|| self.ordered_list())
      .or_else(|| self.bullet_list())
      .or_else(|| self.html_block())
      .or_else(|| self.style_block())
      .or_else(|| self.para())
      .or_else(|| self.plain());
    if block.is_none() {
      self.pos = save;
    }
    block
  }

  /// `Para`: inlines terminated by at least one blank line.
  fn para(&mut self) -> Option<Element> {
    let start = self.pos;
    self.nonindent_space();
    let Some(inlines) = self.inlines() else {
      self.pos = start;
      return None;
    };
    if !self.blank_line() {
      self.pos = start;
      return None;
    }
    while self.blank_line() {}
    Some(Element::with_children(ElementKind::Paragraph, inlines))
  }

  /// `Plain`: inlines without the trailing blank-line requirement.
  fn plain(&mut self) -> Option<Element> {
    let inlines = self.inlines()?;
    Some(Element::with_children(ElementKind::Plain, inlines))
  }

  fn heading(&mut self) -> Option<Element> {
    self
      .setext_heading(1)
      .or_else(|| self.setext_heading(2))
      .or_else(|| self.atx_heading())
  }

  /// `AtxStart`: one to six `#`s. A seventh `#` is not a heading at all;
  /// the line falls through to a paragraph.
  pub(super) fn atx_start(&mut self) -> Option<u8> {
    let start = self.pos;
    let mut level = 0u8;
    while self.eat(b'#') {
      level += 1;
    }
    if level == 0 || level > 6 {
      self.pos = start;
      return None;
    }
    Some(level)
  }

  fn atx_heading(&mut self) -> Option<Element> {
    let start = self.pos;
    let level = self.atx_start()?;
    self.sp();
    let mut inlines = Vec::new();
    while let Some(inline) = self.atx_inline() {
      inlines.push(inline);
    }
    if inlines.is_empty() {
      self.pos = start;
      return None;
    }
    // Optional closing hashes, then the line must end.
    self.sp();
    while self.eat(b'#') {}
    self.sp();
    if !self.newline() {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(ElementKind::Heading(level), inlines))
  }

  /// One heading inline: stops at the newline and before trailing hashes.
  fn atx_inline(&mut self) -> Option<Element> {
    let save = self.pos;
    if self.newline() {
      self.pos = save;
      return None;
    }
    let at_end = self.probe(|p| {
      p.sp();
      while p.eat(b'#') {}
      p.sp();
      p.newline()
    });
    if at_end {
      return None;
    }
    self.inline()
  }

  /// `SetextBottom`: three or more `=` (level 1) or `-` (level 2).
  pub(super) fn setext_bottom(&mut self, level: u8) -> bool {
    let marker = if level == 1 { b'=' } else { b'-' };
    let start = self.pos;
    let mut count = 0;
    while self.eat(marker) {
      count += 1;
    }
    if count >= 3 && self.newline() {
      true
    } else {
      self.pos = start;
      false
    }
  }

  fn setext_heading(&mut self, level: u8) -> Option<Element> {
    let start = self.pos;
    let underlined = self.probe(|p| {
      p.raw_line().is_some() && p.setext_bottom(level)
    });
    if !underlined {
      return None;
    }
    let mut inlines = Vec::new();
    loop {
      let save = self.pos;
      if self.endline().is_some() {
        self.pos = save;
        break;
      }
      match self.inline() {
        Some(inline) => inlines.push(inline),
        None => break,
      }
    }
    if inlines.is_empty() {
      self.pos = start;
      return None;
    }
    self.sp();
    if !self.newline() || !self.setext_bottom(level) {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(ElementKind::Heading(level), inlines))
  }

  /// `BlockQuote`: `>`-prefixed lines with lazy continuations, assembled
  /// into one raw chunk for the expansion pass.
  fn block_quote(&mut self) -> Option<Element> {
    let start = self.pos;
    let mut raw = String::new();
    let mut matched = false;
    loop {
      let iteration = self.pos;
      if !self.eat(b'>') {
        break;
      }
      self.eat(b' ');
      let Some(line) = self.raw_line() else {
        self.pos = iteration;
        break;
      };
      raw.push_str(line);
      // Lazy continuation lines until a `>` line or a blank.
      loop {
        if self.peek() == Some(b'>') || self.at_blank_line() {
          break;
        }
        match self.raw_line() {
          Some(line) => raw.push_str(line),
          None => break,
        }
      }
      while self.blank_line() {
        raw.push('\n');
      }
      matched = true;
    }
    if !matched {
      self.pos = start;
      return None;
    }
    raw.push('\n');
    let inner = Element::new(ElementKind::Raw(vec![raw]));
    Some(Element::with_children(ElementKind::BlockQuote, vec![inner]))
  }

  /// One verbatim chunk: optional blank lines, then indented lines.
  fn verbatim_chunk(&mut self) -> Option<String> {
    let start = self.pos;
    let mut text = String::new();
    while self.blank_line() {
      text.push('\n');
    }
    let mut lines = 0;
    loop {
      let save = self.pos;
      if self.at_blank_line() || !self.indent() {
        self.pos = save;
        break;
      }
      match self.raw_line() {
        Some(line) => {
          text.push_str(line);
          lines += 1;
        },
        None => {
          self.pos = save;
          break;
        },
      }
    }
    if lines == 0 {
      self.pos = start;
      return None;
    }
    Some(text)
  }

  /// `Verbatim`: indented chunks, content preserved byte-for-byte.
  fn verbatim(&mut self) -> Option<Element> {
    let mut text = String::new();
    let mut chunks = 0;
    while let Some(chunk) = self.verbatim_chunk() {
      text.push_str(&chunk);
      chunks += 1;
    }
    if chunks == 0 {
      return None;
    }
    Some(Element::new(ElementKind::Verbatim(text)))
  }

  /// `HorizontalRule`: three or more of one marker, space separated, on a
  /// line of their own followed by a blank line.
  fn horizontal_rule(&mut self) -> Option<Element> {
    let start = self.pos;
    self.nonindent_space();
    let marker = match self.peek() {
      Some(b @ (b'*' | b'-' | b'_')) => b,
      _ => {
        self.pos = start;
        return None;
      },
    };
    self.pos += 1;
    let mut count = 1;
    loop {
      let save = self.pos;
      self.sp();
      if self.eat(marker) {
        count += 1;
      } else {
        self.pos = save;
        break;
      }
    }
    self.sp();
    if count < 3 || !self.newline() || !self.blank_line() {
      self.pos = start;
      return None;
    }
    while self.blank_line() {}
    Some(Element::new(ElementKind::HorizontalRule))
  }

  /// `Bullet`: a `+`/`*`/`-` list marker that is not a horizontal rule.
  pub(super) fn bullet(&mut self) -> bool {
    let start = self.pos;
    if self.probe(|p| p.horizontal_rule().is_some()) {
      return false;
    }
    self.nonindent_space();
    if !matches!(self.peek(), Some(b'+' | b'*' | b'-')) {
      self.pos = start;
      return false;
    }
    self.pos += 1;
    if !self.eat_spacechars() {
      self.pos = start;
      return false;
    }
    true
  }

  /// `Enumerator`: digits, a period, then whitespace.
  pub(super) fn enumerator(&mut self) -> bool {
    let start = self.pos;
    self.nonindent_space();
    let mut digits = 0;
    while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
      self.pos += 1;
      digits += 1;
    }
    if digits == 0 || !self.eat(b'.') || !self.eat_spacechars() {
      self.pos = start;
      return false;
    }
    true
  }

  fn bullet_list(&mut self) -> Option<Element> {
    if !self.probe(|p| p.bullet()) {
      return None;
    }
    let list = self.list_tight().or_else(|| self.list_loose())?;
    Some(Element::with_children(ElementKind::BulletList, list.children))
  }

  fn ordered_list(&mut self) -> Option<Element> {
    if !self.probe(|p| p.enumerator()) {
      return None;
    }
    let list = self.list_tight().or_else(|| self.list_loose())?;
    Some(Element::with_children(
      ElementKind::OrderedList,
      list.children,
    ))
  }

  /// `ListTight`: items separated by single newlines, with no blank-line
  /// separated continuations, and no further item following.
  pub(super) fn list_tight(&mut self) -> Option<Element> {
    let start = self.pos;
    let mut items = Vec::new();
    while let Some(item) = self.list_item_tight() {
      items.push(item);
    }
    if items.is_empty() {
      self.pos = start;
      return None;
    }
    while self.blank_line() {}
    let more = self.probe(|p| p.bullet())
      || self.probe(|p| p.enumerator())
      || self.probe(|p| p.def_marker());
    if more {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(ElementKind::List, items))
  }

  /// `ListLoose`: items that may be separated by blank lines. Each item
  /// gets a paragraph separator appended so the re-parse wraps its
  /// contents in paragraphs.
  pub(super) fn list_loose(&mut self) -> Option<Element> {
    let start = self.pos;
    let mut items = Vec::new();
    loop {
      let Some(mut item) = self.list_item() else {
        break;
      };
      while self.blank_line() {}
      if let Some(child) = item.children.first_mut()
        && let ElementKind::Raw(chunks) = &mut child.kind
        && let Some(last) = chunks.last_mut()
      {
        last.push_str("\n\n");
      }
      items.push(item);
    }
    if items.is_empty() {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(ElementKind::List, items))
  }

  /// A loose list item: marker, first block, then any continuations.
  fn list_item(&mut self) -> Option<Element> {
    let start = self.pos;
    if !(self.bullet() || self.enumerator() || self.def_marker()) {
      self.pos = start;
      return None;
    }
    let Some(first) = self.list_block() else {
      self.pos = start;
      return None;
    };
    let mut chunks = vec![first];
    while self.list_continuation_block(&mut chunks) {}
    let raw = Element::new(ElementKind::Raw(chunks));
    Some(Element::with_children(ElementKind::ListItem, vec![raw]))
  }

  /// A tight list item: continuations only when no blank line intervenes,
  /// and none may follow the item.
  fn list_item_tight(&mut self) -> Option<Element> {
    let start = self.pos;
    if !(self.bullet() || self.enumerator() || self.def_marker()) {
      self.pos = start;
      return None;
    }
    let Some(first) = self.list_block() else {
      self.pos = start;
      return None;
    };
    let mut chunks = vec![first];
    loop {
      let save = self.pos;
      if self.at_blank_line() {
        break;
      }
      if !self.list_continuation_block(&mut chunks) {
        self.pos = save;
        break;
      }
    }
    let trailing_continuation = self.probe(|p| {
      let mut scratch = vec![String::new()];
      p.list_continuation_block(&mut scratch)
    });
    if trailing_continuation {
      self.pos = start;
      return None;
    }
    let raw = Element::new(ElementKind::Raw(chunks));
    Some(Element::with_children(ElementKind::ListItem, vec![raw]))
  }

  /// `ListBlock`: the first line of an item plus its directly following
  /// lines, one indent level stripped.
  fn list_block(&mut self) -> Option<String> {
    if self.at_blank_line() {
      return None;
    }
    let first = self.raw_line()?;
    let mut text = String::from(first);
    while let Some(line) = self.list_block_line() {
      text.push_str(line);
    }
    Some(text)
  }

  /// A continuation line inside `ListBlock`: not blank, not a new item,
  /// not a horizontal rule.
  fn list_block_line(&mut self) -> Option<&'a str> {
    let save = self.pos;
    if self.at_blank_line() {
      return None;
    }
    let marker_ahead = self.probe(|p| {
      let _ = p.indent();
      p.bullet() || p.enumerator() || p.def_marker()
    });
    if marker_ahead || self.probe(|p| p.horizontal_rule().is_some()) {
      return None;
    }
    let _ = self.indent();
    match self.raw_line() {
      Some(line) => Some(line),
      None => {
        self.pos = save;
        None
      },
    }
  }

  /// `ListContinuationBlock`: optional blank lines, then indented blocks.
  ///
  /// With no blank lines in between, the continuation starts a new raw
  /// chunk (the re-parse keeps nested blocks separate); otherwise the
  /// literal blank-line bytes join it to the current chunk.
  fn list_continuation_block(&mut self, chunks: &mut Vec<String>) -> bool {
    let start = self.pos;
    let blanks_start = self.pos;
    while self.blank_line() {}
    let blanks = self.slice(blanks_start, self.pos).to_string();
    let mut blocks = String::new();
    let mut matched = false;
    loop {
      let save = self.pos;
      if !self.indent() {
        break;
      }
      match self.list_block() {
        Some(block) => {
          blocks.push_str(&block);
          matched = true;
        },
        None => {
          self.pos = save;
          break;
        },
      }
    }
    if !matched {
      self.pos = start;
      return false;
    }
    if blanks.is_empty() {
      chunks.push(blocks);
    } else if let Some(last) = chunks.last_mut() {
      last.push_str(&blanks);
      last.push_str(&blocks);
    }
    true
  }

  /// `Reference`: a link definition line, `[label]: url "title"`.
  fn reference(&mut self) -> Option<Element> {
    let start = self.pos;
    self.nonindent_space();
    if self.peek_str("[]") {
      self.pos = start;
      return None;
    }
    let Some(label) = self.label() else {
      self.pos = start;
      return None;
    };
    if !self.eat(b':') {
      self.pos = start;
      return None;
    }
    self.spnl();
    let Some(url) = self.ref_src() else {
      self.pos = start;
      return None;
    };
    let title = self.ref_title();
    if !self.blank_line() {
      self.pos = start;
      return None;
    }
    while self.blank_line() {}
    Some(Element::new(ElementKind::Reference(Link { label, url, title })))
  }

  /// `RefSrc`: a run of non-space characters.
  fn ref_src(&mut self) -> Option<String> {
    let start = self.pos;
    while matches!(self.peek(), Some(b) if !super::engine::is_spacechar(b) && !is_newline(b))
    {
      self.pos += 1;
    }
    if self.pos == start {
      None
    } else {
      Some(self.slice(start, self.pos).to_string())
    }
  }

  /// `RefTitle`: single-, double- or paren-quoted, or empty.
  fn ref_title(&mut self) -> String {
    self
      .ref_title_quoted(b'\'', b'\'')
      .or_else(|| self.ref_title_quoted(b'"', b'"'))
      .or_else(|| self.ref_title_quoted(b'(', b')'))
      .unwrap_or_default()
  }

  /// One quoted reference title; the closing quote must end the line.
  fn ref_title_quoted(&mut self, open: u8, close: u8) -> Option<String> {
    let start = self.pos;
    self.spnl();
    if !self.eat(open) {
      self.pos = start;
      return None;
    }
    let text_start = self.pos;
    loop {
      let Some(b) = self.peek() else {
        self.pos = start;
        return None;
      };
      if is_newline(b) {
        self.pos = start;
        return None;
      }
      if b == close {
        let at_line_end = self.probe(|p| {
          p.pos += 1;
          p.sp();
          p.newline()
        });
        if at_line_end {
          break;
        }
      }
      self.pos += 1;
    }
    let text = self.slice(text_start, self.pos).to_string();
    self.pos += 1;
    Some(text)
  }

  /// `References` pass: collect every reference definition, skipping all
  /// other content block by block.
  pub(crate) fn collect_references(&mut self) -> Vec<Link> {
    self.pos = 0;
    let mut references = Vec::new();
    loop {
      if let Some(element) = self.reference() {
        if let ElementKind::Reference(link) = element.kind {
          references.push(link);
        }
      } else if !self.skip_block() {
        break;
      }
    }
    references
  }

  /// `SkipBlock`: advance past one block without building anything.
  pub(super) fn skip_block(&mut self) -> bool {
    if self.html_block().is_some() {
      return true;
    }
    // A paragraph-like run of lines that are not headings or blanks.
    let mut lines = 0;
    loop {
      let save = self.pos;
      if self.peek() == Some(b'#')
        || self.probe(|p| p.setext_bottom(1))
        || self.probe(|p| p.setext_bottom(2))
        || self.at_blank_line()
      {
        break;
      }
      if self.raw_line().is_none() {
        self.pos = save;
        break;
      }
      lines += 1;
    }
    if lines > 0 {
      while self.blank_line() {}
      return true;
    }
    if self.blank_line() {
      while self.blank_line() {}
      return true;
    }
    self.raw_line().is_some()
  }
}
