#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! Coverage for the optional extensions: smart typography, footnotes,
//! definition lists and the HTML/style output filters.
use pegmark::{Extensions, ExtensionsBuilder};

fn smart(source: &str) -> String {
  pegmark::render_html(source, ExtensionsBuilder::new().smart(true).build())
}

fn notes(source: &str) -> String {
  pegmark::render_html(source, ExtensionsBuilder::new().notes(true).build())
}

fn dlists(source: &str) -> String {
  pegmark::render_html(source, ExtensionsBuilder::new().dlists(true).build())
}

// Smart typography

#[test]
fn ellipses() {
  assert_eq!(smart("wait...\n"), "<p>wait&hellip;</p>\n");
  assert_eq!(smart("wait. . .\n"), "<p>wait&hellip;</p>\n");
}

#[test]
fn dashes() {
  assert_eq!(smart("a--b\n"), "<p>a&mdash;b</p>\n");
  assert_eq!(smart("a---b\n"), "<p>a&mdash;b</p>\n");
  assert_eq!(smart("1-2\n"), "<p>1&ndash;2</p>\n");
  // A dash before a letter stays a plain dash.
  assert_eq!(smart("well-known\n"), "<p>well-known</p>\n");
}

#[test]
fn single_quotes() {
  assert_eq!(smart("'quoted'\n"), "<p>&lsquo;quoted&rsquo;</p>\n");
}

#[test]
fn double_quotes() {
  assert_eq!(smart("\"quoted\"\n"), "<p>&ldquo;quoted&rdquo;</p>\n");
}

#[test]
fn contractions_stay_apostrophes() {
  assert_eq!(smart("don't\n"), "<p>don&rsquo;t</p>\n");
  assert_eq!(smart("they're here\n"), "<p>they&rsquo;re here</p>\n");
}

#[test]
fn smart_is_off_by_default() {
  assert_eq!(
    pegmark::render_html("a--b...\n", Extensions::default()),
    "<p>a--b...</p>\n"
  );
}

// Footnotes

#[test]
fn footnote_reference_and_section() {
  assert_eq!(
    notes("Text[^a].\n\n[^a]: Note text.\n"),
    "<p>Text<a class=\"noteref\" id=\"fnref:1\" \
     href=\"#fn:1\"><sup>1</sup></a>.</p>\n\n<hr/>\n<ol \
     class=\"notes\">\n<li id=\"fn:1\"><p>Note text.</p> <a \
     href=\"#fnref:1\">&#8617;</a></li>\n</ol>\n"
  );
}

#[test]
fn footnotes_resolve_forward_definitions() {
  let rendered = notes("see[^late]\n\n[^late]: defined below\n");
  assert!(rendered.contains("id=\"fnref:1\""));
  assert!(rendered.contains("defined below"));
}

#[test]
fn inline_notes_render_in_place_content() {
  let rendered = notes("x^[inline note]\n");
  assert!(rendered.contains("<sup>1</sup>"));
  assert!(rendered.contains("<li id=\"fn:1\">inline note"));
}

#[test]
fn unresolved_note_reference_is_literal() {
  assert_eq!(notes("x[^nope]\n"), "<p>x[^nope]</p>\n");
}

#[test]
fn unreferenced_definitions_render_nothing() {
  assert_eq!(notes("[^u]: unused\n"), "");
}

#[test]
fn notes_are_numbered_in_document_order() {
  let rendered =
    notes("a[^one] b[^two]\n\n[^two]: second\n\n[^one]: first\n");
  let one =
    rendered.find("<li id=\"fn:1\"><p>first</p>").expect("first note");
  let two =
    rendered.find("<li id=\"fn:2\"><p>second</p>").expect("second note");
  assert!(one < two);
}

#[test]
fn note_definitions_are_exposed_on_the_document() {
  let ext = ExtensionsBuilder::new().notes(true).build();
  let doc = pegmark::parse("x[^a]\n\n[^a]: note body\n", ext);
  assert_eq!(doc.notes().len(), 1);
  assert_eq!(doc.notes()[0].label, "a");
  // The content is expanded to blocks, like the rest of the tree.
  assert!(!doc.notes()[0].content.is_empty());

  let plain = pegmark::parse("no notes here\n", ext);
  assert!(plain.notes().is_empty());
}

#[test]
fn note_syntax_is_off_by_default() {
  let rendered = pegmark::render_html(
    "x[^a]\n\n[^a]: note\n",
    Extensions::default(),
  );
  assert!(!rendered.contains("noteref"));
}

// Definition lists

#[test]
fn definition_list_titles_and_data() {
  assert_eq!(
    dlists("Term 1\n: def one\n\nTerm 2\n: def two\n"),
    "<dl>\n<dt>Term 1</dt>\n<dd>def one</dd>\n<dt>Term 2</dt>\n<dd>def \
     two</dd>\n</dl>\n"
  );
}

#[test]
fn tilde_marks_definitions_too() {
  assert_eq!(
    dlists("Word\n~ meaning\n"),
    "<dl>\n<dt>Word</dt>\n<dd>meaning</dd>\n</dl>\n"
  );
}

#[test]
fn multiple_titles_share_a_definition() {
  let rendered = dlists("One\nTwo\n: shared\n");
  assert!(rendered.contains("<dt>One</dt>"));
  assert!(rendered.contains("<dt>Two</dt>"));
  assert_eq!(rendered.matches("<dd>").count(), 1);
}

#[test]
fn dlists_are_off_by_default() {
  let rendered =
    pegmark::render_html("Term\n: def\n", Extensions::default());
  assert!(!rendered.contains("<dl>"));
}

// Output filters

#[test]
fn filter_html_drops_inline_and_block_html() {
  let ext = ExtensionsBuilder::new().filter_html(true).build();
  assert_eq!(
    pegmark::render_html("a <b>bold</b>\n", ext),
    "<p>a bold</p>\n"
  );
  assert_eq!(
    pegmark::render_html("<div>x</div>\n\ntext\n", ext),
    "<p>text</p>\n"
  );
}

#[test]
fn filter_styles_drops_style_blocks() {
  let ext = ExtensionsBuilder::new().filter_styles(true).build();
  assert_eq!(pegmark::render_html("<style>p {}</style>\n", ext), "");
  assert_eq!(
    pegmark::render_html("<style>p {}</style>\n", Extensions::default()),
    "<style>p {}</style>\n"
  );
}

#[test]
fn extension_set_round_trips_through_serde() {
  let ext = Extensions::all();
  let json = serde_json::to_string(&ext).expect("serialize");
  let back: Extensions = serde_json::from_str(&json).expect("deserialize");
  assert_eq!(ext, back);
}
