//! Raw HTML passthrough: block-level tag pairs with balanced same-tag
//! nesting, comments, self-closing blocks, style blocks, and inline tags.
//!
//! Instead of one cloned production per tag name, the open tag's name is
//! read once and dispatched through the block-tag table; a single balanced
//! matcher then handles any of them.

use super::{Parser, engine::Rule};
use crate::types::{Element, ElementKind};

/// Tag names recognized as HTML block openers.
const BLOCK_TAGS: &[&str] = &[
  "address",
  "blockquote",
  "center",
  "dir",
  "div",
  "dl",
  "fieldset",
  "form",
  "h1",
  "h2",
  "h3",
  "h4",
  "h5",
  "h6",
  "hr",
  "isindex",
  "menu",
  "noframes",
  "noscript",
  "ol",
  "p",
  "pre",
  "table",
  "ul",
  "dd",
  "dt",
  "frameset",
  "li",
  "tbody",
  "td",
  "tfoot",
  "th",
  "thead",
  "tr",
  "script",
];

impl<'a> Parser<'a> {
  /// `HtmlBlock`: a balanced tag pair, comment or self-closing block tag,
  /// followed by at least one blank line.
  pub(super) fn html_block(&mut self) -> Option<Element> {
    self.memoized(Rule::HtmlBlock, Self::html_block_inner)
  }

  fn html_block_inner(&mut self) -> Option<Element> {
    if self.peek() != Some(b'<') {
      return None;
    }
    let start = self.pos;
    let matched = self.html_block_in_tags()
      || self.html_comment()
      || self.html_block_self_closing();
    if !matched {
      self.pos = start;
      return None;
    }
    let end = self.pos;
    if !self.blank_line() {
      self.pos = start;
      return None;
    }
    while self.blank_line() {}
    if self.ext.filter_html {
      Some(Element::new(ElementKind::List))
    } else {
      Some(Element::new(ElementKind::HtmlBlock(
        self.slice(start, end).to_string(),
      )))
    }
  }

  /// Balanced `<tag>...</tag>` where `tag` is in the block-tag table.
  fn html_block_in_tags(&mut self) -> bool {
    let Some(tag) = self.peek_block_tag() else {
      return false;
    };
    self.html_in_tag(&tag)
  }

  /// Read the tag name of an open tag ahead, lowercased, if it is a block
  /// tag. Consumes nothing.
  fn peek_block_tag(&mut self) -> Option<String> {
    let save = self.pos;
    let mut found = None;
    if self.eat(b'<') {
      self.spnl();
      if let Some(name) = self.tag_name() {
        let lower = name.to_ascii_lowercase();
        if BLOCK_TAGS.contains(&lower.as_str()) {
          found = Some(lower);
        }
      }
    }
    self.pos = save;
    found
  }

  /// One balanced region of `tag`: open tag, then content in which nested
  /// same-tag regions are matched recursively, then the close tag.
  fn html_in_tag(&mut self, tag: &str) -> bool {
    let start = self.pos;
    if !self.html_open_tag(tag) {
      self.pos = start;
      return false;
    }
    loop {
      if self.peek() == Some(b'<') && self.probe_open_tag(tag) {
        if !self.html_in_tag(tag) {
          self.pos = start;
          return false;
        }
        continue;
      }
      if self.probe(|p| p.html_close_tag(tag)) {
        break;
      }
      if self.bump().is_none() {
        self.pos = start;
        return false;
      }
    }
    if !self.html_close_tag(tag) {
      self.pos = start;
      return false;
    }
    true
  }

  fn probe_open_tag(&mut self, tag: &str) -> bool {
    self.probe(|p| p.html_open_tag(tag))
  }

  /// `'<' Spnl tag Spnl HtmlAttribute* '>'`, tag case-insensitive.
  fn html_open_tag(&mut self, tag: &str) -> bool {
    let start = self.pos;
    if !self.eat(b'<') {
      return false;
    }
    self.spnl();
    if !self.eat_tag_ci(tag)
      || matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric())
    {
      self.pos = start;
      return false;
    }
    self.spnl();
    while self.html_attribute() {}
    if !self.eat(b'>') {
      self.pos = start;
      return false;
    }
    true
  }

  /// `'<' Spnl '/' tag Spnl '>'`, tag case-insensitive.
  fn html_close_tag(&mut self, tag: &str) -> bool {
    let start = self.pos;
    if !self.eat(b'<') {
      return false;
    }
    self.spnl();
    if !self.eat(b'/') || !self.eat_tag_ci(tag) {
      self.pos = start;
      return false;
    }
    if matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric()) {
      self.pos = start;
      return false;
    }
    self.spnl();
    if !self.eat(b'>') {
      self.pos = start;
      return false;
    }
    true
  }

  /// `HtmlAttribute`: name, optionally `=` and a quoted or bare value.
  pub(super) fn html_attribute(&mut self) -> bool {
    let mut name = 0;
    while matches!(self.peek(), Some(b) if b.is_ascii_alphanumeric() || b == b'-')
    {
      self.pos += 1;
      name += 1;
    }
    if name == 0 {
      return false;
    }
    self.spnl();
    let save = self.pos;
    if self.eat(b'=') {
      self.spnl();
      if !self.quoted_value() {
        let mut bare = 0;
        while matches!(self.peek(), Some(b) if b != b'>' && !super::engine::is_spacechar(b) && !super::engine::is_newline(b))
        {
          self.pos += 1;
          bare += 1;
        }
        if bare == 0 {
          self.pos = save;
        }
      }
    }
    self.spnl();
    true
  }

  /// A single- or double-quoted attribute value; may span lines.
  fn quoted_value(&mut self) -> bool {
    for quote in [b'"', b'\''] {
      let save = self.pos;
      if self.eat(quote) {
        while matches!(self.peek(), Some(b) if b != quote) {
          self.pos += 1;
        }
        if self.eat(quote) {
          return true;
        }
        self.pos = save;
      }
    }
    false
  }

  /// `HtmlComment`: `<!--` through `-->`.
  pub(super) fn html_comment(&mut self) -> bool {
    let start = self.pos;
    if !self.eat_str("<!--") {
      return false;
    }
    loop {
      if self.eat_str("-->") {
        return true;
      }
      if self.bump().is_none() {
        self.pos = start;
        return false;
      }
    }
  }

  /// A self-closing block-level tag, `<hr />` and friends.
  fn html_block_self_closing(&mut self) -> bool {
    let start = self.pos;
    if !self.eat(b'<') {
      return false;
    }
    self.spnl();
    let Some(name) = self.tag_name() else {
      self.pos = start;
      return false;
    };
    if !BLOCK_TAGS.contains(&name.to_ascii_lowercase().as_str()) {
      self.pos = start;
      return false;
    }
    self.spnl();
    while self.html_attribute() {}
    if !self.eat(b'/') {
      self.pos = start;
      return false;
    }
    self.spnl();
    if !self.eat(b'>') {
      self.pos = start;
      return false;
    }
    true
  }

  /// `StyleBlock`: `<style>...</style>`, dropped under `FilterStyles`.
  pub(super) fn style_block(&mut self) -> Option<Element> {
    let start = self.pos;
    if !self.in_style_tags() {
      return None;
    }
    let end = self.pos;
    while self.blank_line() {}
    if self.ext.filter_styles {
      Some(Element::new(ElementKind::List))
    } else {
      Some(Element::new(ElementKind::HtmlBlock(
        self.slice(start, end).to_string(),
      )))
    }
  }

  fn in_style_tags(&mut self) -> bool {
    let start = self.pos;
    if !self.html_open_tag("style") {
      return false;
    }
    loop {
      if self.probe(|p| p.html_close_tag("style")) {
        break;
      }
      if self.bump().is_none() {
        self.pos = start;
        return false;
      }
    }
    if !self.html_close_tag("style") {
      self.pos = start;
      return false;
    }
    true
  }

  /// `RawHtml`: an inline tag or comment, passed through (or filtered).
  pub(super) fn raw_html(&mut self) -> Option<Element> {
    self.memoized(Rule::RawHtml, |p| {
      let start = p.pos;
      if !(p.html_comment() || p.html_tag()) {
        return None;
      }
      if p.ext.filter_html {
        Some(Element::new(ElementKind::List))
      } else {
        Some(Element::new(ElementKind::Html(
          p.slice(start, p.pos).to_string(),
        )))
      }
    })
  }

  /// `HtmlTag`: any single open, close or self-closing tag.
  fn html_tag(&mut self) -> bool {
    let start = self.pos;
    if !self.eat(b'<') {
      return false;
    }
    self.spnl();
    let _ = self.eat(b'/');
    if self.tag_name().is_none() {
      self.pos = start;
      return false;
    }
    self.spnl();
    while self.html_attribute() {}
    let _ = self.eat(b'/');
    self.spnl();
    if !self.eat(b'>') {
      self.pos = start;
      return false;
    }
    true
  }
}
