//! Character classes, line primitives and memoization.
//!
//! Every rule in the grammar follows one convention: on failure the cursor
//! is restored to where the rule started and no semantic value is produced.
//! That makes ordered alternation a chain of plain method calls and keeps
//! backtracking local to each rule.
//!
//! Memoization is keyed by `(rule, offset)` and stores either failure or
//! the end offset plus the semantic value, which bounds the cost of the
//! recursion-heavy rule families to one evaluation per input position.

use super::Parser;
use crate::types::Element;

/// Identity of a memoized rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Rule {
  Inline,
  Strong,
  Emph,
  Link,
  Code,
  RawHtml,
  Smart,
  HtmlBlock,
}

/// Outcome of a memoized rule at one offset.
pub(crate) enum Memo {
  Fail,
  Match { end: usize, value: Element },
}

/// Space or tab.
pub(crate) const fn is_spacechar(b: u8) -> bool {
  b == b' ' || b == b'\t'
}

/// Carriage return or line feed.
pub(crate) const fn is_newline(b: u8) -> bool {
  b == b'\n' || b == b'\r'
}

/// ASCII alphanumerics, plus every non-ASCII byte (multi-byte characters
/// count as word characters).
pub(crate) const fn is_alphanumeric(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b >= 0x80
}

impl<'a> Parser<'a> {
  pub(crate) fn at_eof(&self) -> bool {
    self.pos >= self.src.len()
  }

  pub(crate) fn peek(&self) -> Option<u8> {
    self.src.as_bytes().get(self.pos).copied()
  }

  /// Slice of the source between two byte offsets.
  ///
  /// Offsets handed in here always sit next to a matched ASCII byte or at
  /// the ends of the input, so they are character boundaries.
  pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
    let src = self.src;
    &src[start..end]
  }

  /// Consume one byte; fails only at end of input.
  pub(crate) fn bump(&mut self) -> Option<u8> {
    let b = self.peek()?;
    self.pos += 1;
    Some(b)
  }

  /// Consume `b` if it is next.
  pub(crate) fn eat(&mut self, b: u8) -> bool {
    if self.peek() == Some(b) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  /// Consume `s` if it is next, as a unit.
  pub(crate) fn eat_str(&mut self, s: &str) -> bool {
    if self.src[self.pos..].starts_with(s) {
      self.pos += s.len();
      true
    } else {
      false
    }
  }

  /// True if `s` is next; consumes nothing.
  pub(crate) fn peek_str(&self, s: &str) -> bool {
    self.src[self.pos..].starts_with(s)
  }

  /// Consume `tag` ASCII case-insensitively.
  pub(crate) fn eat_tag_ci(&mut self, tag: &str) -> bool {
    let end = self.pos + tag.len();
    if end > self.src.len() {
      return false;
    }
    if self.src.as_bytes()[self.pos..end].eq_ignore_ascii_case(tag.as_bytes())
    {
      self.pos = end;
      true
    } else {
      false
    }
  }

  /// Run `f` and restore the cursor afterwards, reporting whether it
  /// matched. Used for `&`/`!` predicates.
  pub(crate) fn probe<F>(&mut self, f: F) -> bool
  where
    F: FnOnce(&mut Self) -> bool,
  {
    let save = self.pos;
    let matched = f(self);
    self.pos = save;
    matched
  }

  /// Whether a byte starts a Markdown construct under the current
  /// extension set.
  pub(crate) fn is_special(&self, b: u8) -> bool {
    matches!(
      b,
      b'*' | b'_' | b'`' | b'&' | b'[' | b']' | b'<' | b'!' | b'#' | b'\\'
    ) || (self.ext.smart && matches!(b, b'.' | b'-' | b'\'' | b'"'))
      || (self.ext.notes && b == b'^')
  }

  /// Consume a run of characters that are not special, space or newline.
  pub(crate) fn normal_chars(&mut self) -> bool {
    let start = self.pos;
    while let Some(b) = self.peek() {
      if self.is_special(b) || is_spacechar(b) || is_newline(b) {
        break;
      }
      self.pos += 1;
    }
    self.pos > start
  }

  /// `Sp`: zero or more spaces/tabs.
  pub(crate) fn sp(&mut self) {
    while matches!(self.peek(), Some(b) if is_spacechar(b)) {
      self.pos += 1;
    }
  }

  /// One or more spaces/tabs.
  pub(crate) fn eat_spacechars(&mut self) -> bool {
    let start = self.pos;
    self.sp();
    self.pos > start
  }

  /// `Newline`: `\n`, `\r\n` or a bare `\r`.
  pub(crate) fn newline(&mut self) -> bool {
    if self.eat(b'\n') {
      return true;
    }
    if self.eat(b'\r') {
      self.eat(b'\n');
      return true;
    }
    false
  }

  /// `Spnl`: optional spaces, at most one newline, more optional spaces.
  pub(crate) fn spnl(&mut self) {
    self.sp();
    let save = self.pos;
    if self.newline() {
      self.sp();
    } else {
      self.pos = save;
    }
  }

  /// `BlankLine`: spaces then a newline.
  pub(crate) fn blank_line(&mut self) -> bool {
    let save = self.pos;
    self.sp();
    if self.newline() {
      true
    } else {
      self.pos = save;
      false
    }
  }

  pub(crate) fn at_blank_line(&mut self) -> bool {
    self.probe(Self::blank_line)
  }

  /// `Indent`: a tab or four spaces.
  pub(crate) fn indent(&mut self) -> bool {
    if self.eat(b'\t') {
      return true;
    }
    self.eat_str("    ")
  }

  /// `NonindentSpace`: up to three spaces.
  pub(crate) fn nonindent_space(&mut self) {
    for _ in 0..3 {
      if !self.eat(b' ') {
        break;
      }
    }
  }

  /// `RawLine`: the rest of the current line including its newline, or the
  /// remaining input when no newline follows. Fails only at end of input.
  pub(crate) fn raw_line(&mut self) -> Option<&'a str> {
    if self.at_eof() {
      return None;
    }
    let start = self.pos;
    while matches!(self.peek(), Some(b) if !is_newline(b)) {
      self.pos += 1;
    }
    self.newline();
    Some(self.slice(start, self.pos))
  }

  /// `[A-Za-z0-9]+`, as used by HTML tag names.
  pub(crate) fn tag_name(&mut self) -> Option<&'a str> {
    let start = self.pos;
    while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
      self.pos += 1;
    }
    if self.pos == start {
      None
    } else {
      Some(self.slice(start, self.pos))
    }
  }

  /// Evaluate `rule` through the memo table.
  ///
  /// A rule evaluated twice at the same offset replays its recorded
  /// outcome instead of re-running.
  pub(crate) fn memoized<F>(&mut self, rule: Rule, f: F) -> Option<Element>
  where
    F: FnOnce(&mut Self) -> Option<Element>,
  {
    let key = (rule, self.pos);
    match self.memo.get(&key) {
      Some(Memo::Fail) => return None,
      Some(Memo::Match { end, value }) => {
        self.pos = *end;
        return Some(value.clone());
      },
      None => {},
    }
    let start = self.pos;
    match f(self) {
      Some(value) => {
        self.memo.insert(key, Memo::Match {
          end:   self.pos,
          value: value.clone(),
        });
        Some(value)
      },
      None => {
        self.pos = start;
        self.memo.insert(key, Memo::Fail);
        None
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::Parser;
  use crate::types::Extensions;

  fn parser(src: &str) -> Parser<'_> {
    Parser::new(src, Extensions::default())
  }

  #[test]
  fn blank_line_consumes_spaces_and_newline() {
    let mut p = parser("   \nx");
    assert!(p.blank_line());
    assert_eq!(p.peek(), Some(b'x'));
  }

  #[test]
  fn blank_line_restores_on_failure() {
    let mut p = parser("  x\n");
    assert!(!p.blank_line());
    assert_eq!(p.peek(), Some(b' '));
  }

  #[test]
  fn raw_line_includes_the_newline() {
    let mut p = parser("one\ntwo");
    assert_eq!(p.raw_line(), Some("one\n"));
    assert_eq!(p.raw_line(), Some("two"));
    assert_eq!(p.raw_line(), None);
  }

  #[test]
  fn indent_accepts_tab_or_four_spaces() {
    let mut p = parser("    x");
    assert!(p.indent());
    let mut p = parser("\tx");
    assert!(p.indent());
    let mut p = parser("   x");
    assert!(!p.indent());
  }

  #[test]
  fn spnl_spans_at_most_one_newline() {
    let mut p = parser("  \n  x");
    p.spnl();
    assert_eq!(p.peek(), Some(b'x'));
    let mut p = parser("\n\nx");
    p.spnl();
    assert_eq!(p.peek(), Some(b'\n'));
  }

  #[test]
  fn smart_extension_widens_the_special_set() {
    let plain = parser("");
    assert!(!plain.is_special(b'.'));
    let smart = Parser::new("", Extensions {
      smart: true,
      ..Default::default()
    });
    assert!(smart.is_special(b'.'));
  }
}
