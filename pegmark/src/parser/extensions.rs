//! Extension productions: smart typography, footnotes and definition
//! lists. Every rule here is gated on its extension flag and simply fails
//! when the extension is off, so the core grammar never sees these forms.

use super::{
  Parser,
  engine::{Rule, is_alphanumeric, is_newline},
};
use crate::types::{Element, ElementKind};

impl<'a> Parser<'a> {
  /// `Smart`: typographic atoms for dots, dashes and quotes.
  pub(super) fn smart(&mut self) -> Option<Element> {
    if !self.ext.smart {
      return None;
    }
    self.memoized(Rule::Smart, |p| {
      p.ellipsis()
        .or_else(|| p.dash())
        .or_else(|| p.single_quoted())
        .or_else(|| p.double_quoted())
        .or_else(|| p.apostrophe())
    })
  }

  fn ellipsis(&mut self) -> Option<Element> {
    if self.eat_str("...") || self.eat_str(". . .") {
      return Some(Element::new(ElementKind::Ellipsis));
    }
    None
  }

  fn dash(&mut self) -> Option<Element> {
    if self.eat_str("---") || self.eat_str("--") {
      return Some(Element::new(ElementKind::EmDash));
    }
    let save = self.pos;
    if self.eat(b'-') && matches!(self.peek(), Some(b) if b.is_ascii_digit())
    {
      return Some(Element::new(ElementKind::EnDash));
    }
    self.pos = save;
    None
  }

  /// An opening quote must not sit before whitespace, closing punctuation
  /// or a contraction suffix (`don't` stays an apostrophe).
  fn single_quote_start(&mut self) -> bool {
    let start = self.pos;
    if !self.eat(b'\'') {
      return false;
    }
    match self.peek() {
      None => {
        self.pos = start;
        return false;
      },
      Some(
        b')' | b'!' | b']' | b',' | b'.' | b';' | b':' | b'-' | b'?' | b' '
        | b'\t' | b'\n',
      ) => {
        self.pos = start;
        return false;
      },
      Some(_) => {},
    }
    let contraction = self.probe(|p| {
      let suffix = p.eat_str("ve")
        || p.eat_str("ll")
        || p.eat_str("re")
        || p.eat(b's')
        || p.eat(b't')
        || p.eat(b'm');
      suffix && !matches!(p.peek(), Some(b) if is_alphanumeric(b))
    });
    if contraction {
      self.pos = start;
      return false;
    }
    true
  }

  fn single_quote_end(&mut self) -> bool {
    let save = self.pos;
    if self.eat(b'\'') && !matches!(self.peek(), Some(b) if is_alphanumeric(b))
    {
      return true;
    }
    self.pos = save;
    false
  }

  fn single_quoted(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.single_quote_start() {
      return None;
    }
    let mut children = Vec::new();
    loop {
      if self.probe(Self::single_quote_end) {
        break;
      }
      match self.inline() {
        Some(inline) => children.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
    if children.is_empty() {
      self.pos = start;
      return None;
    }
    self.single_quote_end();
    Some(Element::with_children(ElementKind::SingleQuoted, children))
  }

  fn double_quoted(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.eat(b'"') {
      return None;
    }
    let mut children = Vec::new();
    loop {
      if self.peek() == Some(b'"') {
        break;
      }
      match self.inline() {
        Some(inline) => children.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
    if children.is_empty() {
      self.pos = start;
      return None;
    }
    self.pos += 1;
    Some(Element::with_children(ElementKind::DoubleQuoted, children))
  }

  /// A stray straight quote.
  fn apostrophe(&mut self) -> Option<Element> {
    if self.eat(b'\'') {
      Some(Element::new(ElementKind::Apostrophe))
    } else {
      None
    }
  }

  /// `[^label]` in running text; resolves against the notes table, or
  /// falls back to the literal bracket text.
  pub(super) fn note_reference(&mut self) -> Option<Element> {
    if !self.ext.notes {
      return None;
    }
    let label = self.raw_note_reference()?;
    match self.find_note(&label) {
      Some(children) => {
        Some(Element::with_children(ElementKind::Note(None), children))
      },
      None => Some(Element::text(format!("[^{label}]"))),
    }
  }

  /// `[^...]` with a non-empty label on one line.
  fn raw_note_reference(&mut self) -> Option<String> {
    let start = self.pos;
    if !self.eat_str("[^") {
      return None;
    }
    let label_start = self.pos;
    while matches!(self.peek(), Some(b) if b != b']' && !is_newline(b)) {
      self.pos += 1;
    }
    if self.pos == label_start || !self.eat(b']') {
      self.pos = start;
      return None;
    }
    Some(self.slice(label_start, self.pos - 1).to_string())
  }

  fn find_note(&self, label: &str) -> Option<Vec<Element>> {
    self.notes.iter().find_map(|note| match &note.kind {
      ElementKind::Note(Some(name)) if name == label => {
        Some(note.children.clone())
      },
      _ => None,
    })
  }

  /// `^[inlines]`: a footnote written in place.
  pub(super) fn inline_note(&mut self) -> Option<Element> {
    if !self.ext.notes {
      return None;
    }
    let start = self.pos;
    if !self.eat_str("^[") {
      return None;
    }
    let mut children = Vec::new();
    loop {
      if self.peek() == Some(b']') {
        break;
      }
      match self.inline() {
        Some(inline) => children.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
    if children.is_empty() {
      self.pos = start;
      return None;
    }
    self.pos += 1;
    Some(Element::with_children(ElementKind::Note(None), children))
  }

  /// `[^label]: content` at block level. The content is kept raw and
  /// expanded with the rest of the tree; the definition itself renders
  /// nothing.
  pub(super) fn note_definition(&mut self) -> Option<Element> {
    if !self.ext.notes {
      return None;
    }
    let start = self.pos;
    self.nonindent_space();
    let Some(label) = self.raw_note_reference() else {
      self.pos = start;
      return None;
    };
    if !self.eat(b':') {
      self.pos = start;
      return None;
    }
    self.sp();
    let Some(mut raw) = self.raw_note_block() else {
      self.pos = start;
      return None;
    };
    loop {
      if !self.probe(|p| p.indent()) {
        break;
      }
      match self.raw_note_block() {
        Some(more) => raw.push_str(&more),
        None => break,
      }
    }
    let inner = Element::new(ElementKind::Raw(vec![raw]));
    Some(Element::with_children(ElementKind::Note(Some(label)), vec![
      inner,
    ]))
  }

  /// Lines of one note block, one indent level stripped, with trailing
  /// blank lines preserved.
  fn raw_note_block(&mut self) -> Option<String> {
    let start = self.pos;
    let mut text = String::new();
    let mut lines = 0;
    loop {
      let save = self.pos;
      if self.at_blank_line() {
        break;
      }
      let _ = self.indent();
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
    let blanks_start = self.pos;
    while self.blank_line() {}
    text.push_str(self.slice(blanks_start, self.pos));
    text.push('\n');
    Some(text)
  }

  /// `Notes` pass: collect every note definition, skipping everything
  /// else.
  pub(crate) fn collect_notes(&mut self) -> Vec<Element> {
    self.pos = 0;
    let mut notes = Vec::new();
    loop {
      if let Some(note) = self.note_definition() {
        notes.push(note);
      } else if !self.skip_block() {
        break;
      }
    }
    notes
  }

  /// `Defmark`: `:` or `~` followed by whitespace.
  fn defmark(&mut self) -> bool {
    let start = self.pos;
    self.nonindent_space();
    if !matches!(self.peek(), Some(b':' | b'~')) {
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

  /// `DefMarker`: a definition mark, only when the extension is on.
  pub(super) fn def_marker(&mut self) -> bool {
    if !self.ext.dlists {
      return false;
    }
    self.defmark()
  }

  /// `DefinitionList`: one or more definition groups.
  pub(super) fn definition_list(&mut self) -> Option<Element> {
    if !self.ext.dlists {
      return None;
    }
    let start = self.pos;
    let mut definitions = Vec::new();
    while let Some(definition) = self.definition() {
      definitions.push(definition);
    }
    if definitions.is_empty() {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(
      ElementKind::DefinitionList,
      definitions,
    ))
  }

  /// One group: title lines, then a list of definitions whose items are
  /// re-tagged as definition data.
  fn definition(&mut self) -> Option<Element> {
    let start = self.pos;
    let has_mark_ahead = self.probe(|p| {
      let mut titles = 0;
      loop {
        if p.probe(|q| q.defmark()) {
          break;
        }
        if p.raw_line().is_none() {
          break;
        }
        titles += 1;
      }
      titles > 0 && p.defmark()
    });
    if !has_mark_ahead {
      return None;
    }
    let mut children = Vec::new();
    while let Some(title) = self.dlist_title() {
      children.push(title);
    }
    if children.is_empty() {
      self.pos = start;
      return None;
    }
    let Some(mut list) = self.def_tight().or_else(|| self.def_loose())
    else {
      self.pos = start;
      return None;
    };
    for item in &mut list.children {
      item.kind = ElementKind::DefData;
    }
    children.push(list);
    Some(Element::with_children(ElementKind::List, children))
  }

  /// A definition title line: inlines up to the end of the line.
  fn dlist_title(&mut self) -> Option<Element> {
    let start = self.pos;
    self.nonindent_space();
    if self.probe(|p| p.defmark()) {
      self.pos = start;
      return None;
    }
    match self.peek() {
      Some(b)
        if !super::engine::is_spacechar(b) && !is_newline(b) => {},
      _ => {
        self.pos = start;
        return None;
      },
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
    if !self.newline() {
      self.pos = start;
      return None;
    }
    Some(Element::with_children(ElementKind::DefTitle, inlines))
  }

  fn def_tight(&mut self) -> Option<Element> {
    if !self.probe(|p| p.defmark()) {
      return None;
    }
    self.list_tight()
  }

  fn def_loose(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.blank_line() {
      return None;
    }
    if !self.probe(|p| p.defmark()) {
      self.pos = start;
      return None;
    }
    match self.list_loose() {
      Some(list) => Some(list),
      None => {
        self.pos = start;
        None
      },
    }
  }
}
