//! Inline-level productions.
//!
//! The inline dispatcher is memoized per input position; emphasis and
//! strong scan forward through `inline` recursively while hunting for
//! their close markers, and the memo table turns those re-scans into
//! replays.

use super::{
  Parser,
  engine::{Rule, is_alphanumeric, is_newline, is_spacechar},
};
use crate::types::{Element, ElementKind, Link};

/// Structural case-insensitive equality of two inline lists, used for
/// reference label lookup. String leaves compare ASCII case-insensitively,
/// whitespace-like atoms compare by kind alone, and links or images never
/// match (labels contain no links).
pub(super) fn labels_match(a: &[Element], b: &[Element]) -> bool {
  a.len() == b.len()
    && a.iter().zip(b).all(|(x, y)| elements_match(x, y))
}

fn elements_match(a: &Element, b: &Element) -> bool {
  use ElementKind as K;
  if std::mem::discriminant(&a.kind) != std::mem::discriminant(&b.kind) {
    return false;
  }
  match (&a.kind, &b.kind) {
    (K::Str(s), K::Str(t))
    | (K::Code(s), K::Code(t))
    | (K::Html(s), K::Html(t)) => s.eq_ignore_ascii_case(t),
    (
      K::Space(_)
      | K::LineBreak
      | K::Ellipsis
      | K::EmDash
      | K::EnDash
      | K::Apostrophe,
      _,
    ) => true,
    (K::Link(_) | K::Image(_), _) => false,
    _ => labels_match(&a.children, &b.children),
  }
}

impl<'a> Parser<'a> {
  /// `Inlines`: one or more inlines; inner endlines are kept only when
  /// another inline follows, and a trailing endline is consumed silently.
  pub(crate) fn inlines(&mut self) -> Option<Vec<Element>> {
    let start = self.pos;
    let mut list: Vec<Element> = Vec::new();
    loop {
      let save = self.pos;
      match self.endline() {
        None => {
          if let Some(inline) = self.inline() {
            list.push(inline);
          } else {
            break;
          }
        },
        Some(endline) => {
          let after = self.pos;
          let more = self.inline().is_some();
          self.pos = after;
          if more {
            list.push(endline);
          } else {
            break;
          }
        },
      }
      debug_assert!(self.pos > save, "inline made no progress");
    }
    if list.is_empty() {
      self.pos = start;
      return None;
    }
    Some(list)
  }

  /// `Inline`: ordered alternation over every inline form.
  pub(crate) fn inline(&mut self) -> Option<Element> {
    self.memoized(Rule::Inline, |p| {
      p.str_inline()
        .or_else(|| p.endline())
        .or_else(|| p.ul_or_star_line())
        .or_else(|| p.space_inline())
        .or_else(|| p.strong())
        .or_else(|| p.emph())
        .or_else(|| p.image())
        .or_else(|| p.link())
        .or_else(|| p.note_reference())
        .or_else(|| p.inline_note())
        .or_else(|| p.code_span())
        .or_else(|| p.raw_html())
        .or_else(|| p.entity())
        .or_else(|| p.escaped_char())
        .or_else(|| p.smart())
        .or_else(|| p.symbol())
    })
  }

  /// `Str`: a run of ordinary characters, possibly continued across
  /// intra-word underscores and (under Smart) apostrophes.
  fn str_inline(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.normal_chars() {
      return None;
    }
    let mut parts = vec![Element::text(self.slice(start, self.pos))];
    while let Some(chunk) = self.str_chunk() {
      parts.push(chunk);
    }
    if parts.len() == 1 {
      parts.pop()
    } else {
      Some(Element::with_children(ElementKind::List, parts))
    }
  }

  /// One `Str` continuation: more ordinary characters or intra-word
  /// underscores, or an intra-word apostrophe.
  fn str_chunk(&mut self) -> Option<Element> {
    let start = self.pos;
    loop {
      if self.normal_chars() {
        continue;
      }
      let save = self.pos;
      let mut underscores = 0;
      while self.eat(b'_') {
        underscores += 1;
      }
      if underscores > 0
        && matches!(self.peek(), Some(b) if is_alphanumeric(b))
      {
        continue;
      }
      self.pos = save;
      break;
    }
    if self.pos > start {
      return Some(Element::text(self.slice(start, self.pos)));
    }
    self.apostrophe_chunk()
  }

  /// An apostrophe inside a word, as in contractions.
  fn apostrophe_chunk(&mut self) -> Option<Element> {
    if !self.ext.smart {
      return None;
    }
    let save = self.pos;
    if self.eat(b'\'') && matches!(self.peek(), Some(b) if is_alphanumeric(b))
    {
      return Some(Element::new(ElementKind::Apostrophe));
    }
    self.pos = save;
    None
  }

  /// `Endline`: a hard break, the end of the input, or a soft break.
  pub(super) fn endline(&mut self) -> Option<Element> {
    self
      .line_break()
      .or_else(|| self.terminal_endline())
      .or_else(|| self.normal_endline())
  }

  /// `LineBreak`: two spaces before the newline.
  fn line_break(&mut self) -> Option<Element> {
    let start = self.pos;
    if self.eat_str("  ") && self.normal_endline().is_some() {
      return Some(Element::new(ElementKind::LineBreak));
    }
    self.pos = start;
    None
  }

  /// A newline at end of input produces no output.
  fn terminal_endline(&mut self) -> Option<Element> {
    let start = self.pos;
    self.sp();
    if self.newline() && self.at_eof() {
      return Some(Element::new(ElementKind::List));
    }
    self.pos = start;
    None
  }

  /// A soft break, unless the next line starts a different block.
  fn normal_endline(&mut self) -> Option<Element> {
    let start = self.pos;
    self.sp();
    if !self.newline() {
      self.pos = start;
      return None;
    }
    let breaks_out = self.at_blank_line()
      || self.peek() == Some(b'>')
      || self.probe(|p| p.atx_start().is_some())
      || self.probe(|p| {
        p.raw_line().is_some() && (p.setext_bottom(1) || p.setext_bottom(2))
      });
    if breaks_out {
      self.pos = start;
      return None;
    }
    Some(Element::new(ElementKind::Space("\n".into())))
  }

  /// `Space`: runs of spaces collapse to a single space.
  fn space_inline(&mut self) -> Option<Element> {
    if !self.eat_spacechars() {
      return None;
    }
    Some(Element::new(ElementKind::Space(" ".into())))
  }

  /// `UlOrStarLine`: marker runs that can never open emphasis, taken as
  /// literal text.
  fn ul_or_star_line(&mut self) -> Option<Element> {
    self
      .marker_line(b'*')
      .or_else(|| self.marker_line(b'_'))
      .map(|text| Element::text(text))
  }

  /// Four-plus markers, or a space-delimited marker run.
  pub(super) fn marker_line(&mut self, marker: u8) -> Option<&'a str> {
    let start = self.pos;
    let mut count = 0;
    while self.eat(marker) {
      count += 1;
    }
    if count >= 4 {
      return Some(self.slice(start, self.pos));
    }
    self.pos = start;
    if matches!(self.peek(), Some(b) if is_spacechar(b)) {
      self.pos += 1;
      let mut count = 0;
      while self.eat(marker) {
        count += 1;
      }
      if count >= 1 && matches!(self.peek(), Some(b) if is_spacechar(b)) {
        return Some(self.slice(start, self.pos));
      }
    }
    self.pos = start;
    None
  }

  fn at_space_or_newline(&self) -> bool {
    matches!(self.peek(), Some(b) if is_spacechar(b) || is_newline(b))
  }

  /// `Strong`: `**`/`__` pairs around one or more inlines.
  pub(super) fn strong(&mut self) -> Option<Element> {
    self.memoized(Rule::Strong, |p| {
      p.strong_marker(b'*').or_else(|| p.strong_marker(b'_'))
    })
  }

  pub(super) fn strong_marker(&mut self, marker: u8) -> Option<Element> {
    let start = self.pos;
    if self.marker_line(marker).is_some() {
      self.pos = start;
      return None;
    }
    if !(self.eat(marker) && self.eat(marker)) || self.at_space_or_newline() {
      self.pos = start;
      return None;
    }
    let mut children = Vec::new();
    loop {
      if let Some(closer) = self.strong_close(marker) {
        children.push(closer);
        return Some(Element::with_children(ElementKind::Strong, children));
      }
      match self.inline() {
        Some(inline) => children.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
  }

  /// The closing inline of a strong span: no leading whitespace, then the
  /// double marker; underscores must not run into a word.
  fn strong_close(&mut self, marker: u8) -> Option<Element> {
    let start = self.pos;
    if self.at_space_or_newline() {
      return None;
    }
    let inline = self.inline()?;
    if !(self.eat(marker) && self.eat(marker)) {
      self.pos = start;
      return None;
    }
    if marker == b'_' && matches!(self.peek(), Some(b) if is_alphanumeric(b))
    {
      self.pos = start;
      return None;
    }
    Some(inline)
  }

  /// `Emph`: single `*`/`_` pairs around one or more inlines.
  pub(super) fn emph(&mut self) -> Option<Element> {
    self.memoized(Rule::Emph, |p| {
      p.emph_marker(b'*').or_else(|| p.emph_marker(b'_'))
    })
  }

  fn emph_marker(&mut self, marker: u8) -> Option<Element> {
    let start = self.pos;
    if self.marker_line(marker).is_some() {
      self.pos = start;
      return None;
    }
    if !self.eat(marker) || self.at_space_or_newline() {
      self.pos = start;
      return None;
    }
    let mut children = Vec::new();
    loop {
      if let Some(closer) = self.emph_close(marker) {
        children.push(closer);
        return Some(Element::with_children(ElementKind::Emph, children));
      }
      match self.inline() {
        Some(inline) => children.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
  }

  /// The closing inline of an emphasis span: the single marker must not
  /// begin a strong span, and underscores must not run into a word.
  fn emph_close(&mut self, marker: u8) -> Option<Element> {
    let start = self.pos;
    if self.at_space_or_newline() {
      return None;
    }
    let inline = self.inline()?;
    if self.probe(|p| p.strong_marker(marker).is_some()) {
      self.pos = start;
      return None;
    }
    if !self.eat(marker) {
      self.pos = start;
      return None;
    }
    if marker == b'_' && matches!(self.peek(), Some(b) if is_alphanumeric(b))
    {
      self.pos = start;
      return None;
    }
    Some(inline)
  }

  /// `Image`: `!` followed by any link form. A failed reference lookup
  /// keeps the `!` literal in front of the reconstructed brackets.
  fn image(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.eat(b'!') {
      return None;
    }
    let Some(element) = self.explicit_link().or_else(|| self.reference_link())
    else {
      self.pos = start;
      return None;
    };
    match element.kind {
      ElementKind::Link(link) => Some(Element::with_children(
        ElementKind::Image(link),
        element.children,
      )),
      kind => {
        let literal = Element {
          kind,
          children: element.children,
        };
        Some(Element::with_children(ElementKind::List, vec![
          Element::text("!"),
          literal,
        ]))
      },
    }
  }

  /// `Link`: explicit, reference or automatic.
  fn link(&mut self) -> Option<Element> {
    self.memoized(Rule::Link, |p| {
      p.explicit_link()
        .or_else(|| p.reference_link())
        .or_else(|| p.auto_link())
    })
  }

  /// `[label](url "title")`.
  fn explicit_link(&mut self) -> Option<Element> {
    let start = self.pos;
    let label = self.label()?;
    self.spnl();
    if !self.eat(b'(') {
      self.pos = start;
      return None;
    }
    self.sp();
    let Some(url) = self.link_source() else {
      self.pos = start;
      return None;
    };
    self.spnl();
    let title = self.link_title();
    self.sp();
    if !self.eat(b')') {
      self.pos = start;
      return None;
    }
    Some(Element::new(ElementKind::Link(Link { label, url, title })))
  }

  /// `Source`: angle-wrapped, or bare with balanced parentheses.
  fn link_source(&mut self) -> Option<String> {
    let start = self.pos;
    if self.eat(b'<') {
      let url = self.source_contents();
      if self.eat(b'>') {
        return Some(url);
      }
      self.pos = start;
    }
    Some(self.source_contents())
  }

  /// Non-space characters except `>` and unbalanced parentheses.
  fn source_contents(&mut self) -> String {
    let start = self.pos;
    loop {
      let Some(b) = self.peek() else { break };
      if b == b'(' {
        let save = self.pos;
        self.pos += 1;
        let _ = self.source_contents();
        if !self.eat(b')') {
          self.pos = save;
          break;
        }
      } else if b == b')'
        || b == b'>'
        || is_spacechar(b)
        || is_newline(b)
      {
        break;
      } else {
        self.pos += 1;
      }
    }
    self.slice(start, self.pos).to_string()
  }

  /// `Title`: quoted link title, or empty.
  fn link_title(&mut self) -> String {
    self
      .link_title_quoted(b'\'')
      .or_else(|| self.link_title_quoted(b'"'))
      .unwrap_or_default()
  }

  /// A quoted title; the closing quote must be followed by `)` or the end
  /// of the line.
  fn link_title_quoted(&mut self, quote: u8) -> Option<String> {
    let start = self.pos;
    if !self.eat(quote) {
      return None;
    }
    let text_start = self.pos;
    loop {
      let Some(b) = self.peek() else {
        self.pos = start;
        return None;
      };
      if b == quote {
        let at_end = self.probe(|p| {
          p.pos += 1;
          p.sp();
          p.peek() == Some(b')') || p.newline()
        });
        if at_end {
          break;
        }
      }
      self.pos += 1;
    }
    let text = self.slice(text_start, self.pos).to_string();
    self.pos += 1;
    Some(text)
  }

  fn reference_link(&mut self) -> Option<Element> {
    self
      .reference_link_double()
      .or_else(|| self.reference_link_single())
  }

  /// `[label][ref]`; on lookup failure the whole construct, including the
  /// whitespace captured between the bracket groups, is reproduced as
  /// literal text.
  fn reference_link_double(&mut self) -> Option<Element> {
    let start = self.pos;
    let label = self.label()?;
    let gap_start = self.pos;
    self.spnl();
    let gap = self.slice(gap_start, self.pos).to_string();
    if self.peek_str("[]") {
      self.pos = start;
      return None;
    }
    let Some(reference) = self.label() else {
      self.pos = start;
      return None;
    };
    if let Some(found) = self.find_reference(&reference) {
      let url = found.url.clone();
      let title = found.title.clone();
      return Some(Element::new(ElementKind::Link(Link { label, url, title })));
    }
    let mut literal = vec![Element::text("[")];
    literal.extend(label);
    literal.push(Element::text("]"));
    if !gap.is_empty() {
      literal.push(Element::text(gap));
    }
    literal.push(Element::text("["));
    literal.extend(reference);
    literal.push(Element::text("]"));
    Some(Element::with_children(ElementKind::List, literal))
  }

  /// `[ref][]` or plain `[ref]`.
  fn reference_link_single(&mut self) -> Option<Element> {
    let label = self.label()?;
    let trail_start = self.pos;
    {
      let save = self.pos;
      self.spnl();
      if !self.eat_str("[]") {
        self.pos = save;
      }
    }
    let trailing = self.slice(trail_start, self.pos).to_string();
    if let Some(found) = self.find_reference(&label) {
      let url = found.url.clone();
      let title = found.title.clone();
      return Some(Element::new(ElementKind::Link(Link { label, url, title })));
    }
    let mut literal = vec![Element::text("[")];
    literal.extend(label);
    literal.push(Element::text("]"));
    if !trailing.is_empty() {
      literal.push(Element::text(trailing));
    }
    Some(Element::with_children(ElementKind::List, literal))
  }

  fn find_reference(&self, label: &[Element]) -> Option<&Link> {
    self.references.iter().find(|r| labels_match(&r.label, label))
  }

  /// `Label`: bracketed inlines. With footnotes enabled, `[^` is reserved
  /// for note references.
  pub(super) fn label(&mut self) -> Option<Vec<Element>> {
    let start = self.pos;
    if !self.eat(b'[') {
      return None;
    }
    if self.ext.notes && self.peek() == Some(b'^') {
      self.pos = start;
      return None;
    }
    let mut inlines = Vec::new();
    loop {
      if self.peek() == Some(b']') {
        break;
      }
      match self.inline() {
        Some(inline) => inlines.push(inline),
        None => {
          self.pos = start;
          return None;
        },
      }
    }
    self.pos += 1;
    Some(inlines)
  }

  fn auto_link(&mut self) -> Option<Element> {
    self.auto_link_url().or_else(|| self.auto_link_email())
  }

  /// `<scheme://...>`.
  fn auto_link_url(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.eat(b'<') {
      return None;
    }
    let url_start = self.pos;
    let mut letters = 0;
    while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
      self.pos += 1;
      letters += 1;
    }
    if letters == 0 || !self.eat_str("://") {
      self.pos = start;
      return None;
    }
    let mut rest = 0;
    while matches!(self.peek(), Some(b) if b != b'>' && !is_newline(b)) {
      self.pos += 1;
      rest += 1;
    }
    if rest == 0 || !self.eat(b'>') {
      self.pos = start;
      return None;
    }
    let url = self.slice(url_start, self.pos - 1).to_string();
    Some(Element::new(ElementKind::Link(Link {
      label: vec![Element::text(url.clone())],
      url,
      title: String::new(),
    })))
  }

  /// `<user@host>`; renders with a `mailto:` destination.
  fn auto_link_email(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.eat(b'<') {
      return None;
    }
    let addr_start = self.pos;
    let mut local = 0;
    while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'+' | b'_'))
    {
      self.pos += 1;
      local += 1;
    }
    if local == 0 || !self.eat(b'@') {
      self.pos = start;
      return None;
    }
    let mut host = 0;
    while matches!(self.peek(), Some(b) if b != b'>' && !is_newline(b)) {
      self.pos += 1;
      host += 1;
    }
    if host == 0 || !self.eat(b'>') {
      self.pos = start;
      return None;
    }
    let address = self.slice(addr_start, self.pos - 1).to_string();
    Some(Element::new(ElementKind::Link(Link {
      label: vec![Element::text(address.clone())],
      url:   format!("mailto:{address}"),
      title: String::new(),
    })))
  }

  /// `Code`: backtick code spans, one to five ticks.
  fn code_span(&mut self) -> Option<Element> {
    self.memoized(Rule::Code, |p| {
      for ticks in 1..=5 {
        if let Some(code) = p.code_span_ticks(ticks) {
          return Some(code);
        }
      }
      None
    })
  }

  /// Exactly `n` backticks, not followed by another.
  fn ticks(&mut self, n: usize) -> bool {
    let start = self.pos;
    for _ in 0..n {
      if !self.eat(b'`') {
        self.pos = start;
        return false;
      }
    }
    if self.peek() == Some(b'`') {
      self.pos = start;
      return false;
    }
    true
  }

  fn code_span_ticks(&mut self, n: usize) -> Option<Element> {
    let start = self.pos;
    if !self.ticks(n) {
      return None;
    }
    self.sp();
    let content_start = self.pos;
    loop {
      // Runs of non-space, non-backtick characters.
      let mut advanced = false;
      while matches!(self.peek(), Some(b) if b != b'`' && !is_spacechar(b) && !is_newline(b))
      {
        self.pos += 1;
        advanced = true;
      }
      if advanced {
        continue;
      }
      match self.peek() {
        Some(b'`') => {
          if self.probe(|p| p.ticks(n)) {
            break;
          }
          while self.peek() == Some(b'`') {
            self.pos += 1;
          }
        },
        Some(b) if is_spacechar(b) => {
          // Spaces belong to the content unless they lead to the closer.
          if self.probe(|p| {
            p.sp();
            p.ticks(n)
          }) {
            break;
          }
          self.pos += 1;
        },
        Some(b) if is_newline(b) => {
          let save = self.pos;
          self.newline();
          if self.at_blank_line() {
            self.pos = save;
            break;
          }
        },
        _ => break,
      }
    }
    let content = self.slice(content_start, self.pos);
    if content.is_empty() {
      self.pos = start;
      return None;
    }
    self.sp();
    if !self.ticks(n) {
      self.pos = start;
      return None;
    }
    Some(Element::new(ElementKind::Code(content.to_string())))
  }

  /// `Entity`: hex, decimal or named character references, passed through.
  fn entity(&mut self) -> Option<Element> {
    let start = self.pos;
    if self.peek() != Some(b'&') {
      return None;
    }
    let matched =
      self.hex_entity() || self.dec_entity() || self.char_entity();
    if !matched {
      self.pos = start;
      return None;
    }
    Some(Element::new(ElementKind::Html(
      self.slice(start, self.pos).to_string(),
    )))
  }

  fn hex_entity(&mut self) -> bool {
    let start = self.pos;
    if self.eat(b'&')
      && self.eat(b'#')
      && matches!(self.peek(), Some(b'x' | b'X'))
    {
      self.pos += 1;
      let mut digits = 0;
      while matches!(self.peek(), Some(b) if b.is_ascii_hexdigit()) {
        self.pos += 1;
        digits += 1;
      }
      if digits > 0 && self.eat(b';') {
        return true;
      }
    }
    self.pos = start;
    false
  }

  fn dec_entity(&mut self) -> bool {
    let start = self.pos;
    if self.eat(b'&') && self.eat(b'#') {
      let mut digits = 0;
      while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
        self.pos += 1;
        digits += 1;
      }
      if digits > 0 && self.eat(b';') {
        return true;
      }
    }
    self.pos = start;
    false
  }

  fn char_entity(&mut self) -> bool {
    let start = self.pos;
    if self.eat(b'&') {
      let mut chars = 0;
      while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
        self.pos += 1;
        chars += 1;
      }
      if chars > 0 && self.eat(b';') {
        return true;
      }
    }
    self.pos = start;
    false
  }

  /// `EscapedChar`: backslash escapes for punctuation.
  fn escaped_char(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.eat(b'\\') {
      return None;
    }
    match self.peek() {
      Some(
        b @ (b'-' | b'\\' | b'`' | b'|' | b'*' | b'_' | b'{' | b'}' | b'['
        | b']' | b'(' | b')' | b'#' | b'+' | b'.' | b'!' | b'>' | b'<'),
      ) => {
        self.pos += 1;
        Some(Element::text((b as char).to_string()))
      },
      _ => {
        self.pos = start;
        None
      },
    }
  }

  /// `Symbol`: any special character as literal text.
  fn symbol(&mut self) -> Option<Element> {
    match self.peek() {
      Some(b) if self.is_special(b) => {
        self.pos += 1;
        Some(Element::text((b as char).to_string()))
      },
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::labels_match;
  use crate::types::{Element, ElementKind};

  fn space() -> Element {
    Element::new(ElementKind::Space(" ".into()))
  }

  #[test]
  fn label_match_is_case_insensitive() {
    let a = vec![Element::text("Foo"), space(), Element::text("Bar")];
    let b = vec![Element::text("foo"), space(), Element::text("BAR")];
    assert!(labels_match(&a, &b));
  }

  #[test]
  fn label_match_requires_same_shape() {
    let a = vec![Element::text("foo")];
    let b = vec![Element::text("foo"), space()];
    assert!(!labels_match(&a, &b));
  }

  #[test]
  fn label_match_recurses_into_containers() {
    let a = vec![Element::with_children(ElementKind::Emph, vec![
      Element::text("x"),
    ])];
    let b = vec![Element::with_children(ElementKind::Emph, vec![
      Element::text("X"),
    ])];
    let c = vec![Element::with_children(ElementKind::Strong, vec![
      Element::text("x"),
    ])];
    assert!(labels_match(&a, &b));
    assert!(!labels_match(&a, &c));
  }
}
