#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! End-to-end fixtures: each test is one self-contained input/output pair
//! through the whole pipeline.
use pegmark::{Extensions, MarkdownParser};

fn html(source: &str) -> String {
  pegmark::render_html(source, Extensions::default())
}

fn html_smart(source: &str) -> String {
  pegmark::render_html(source, Extensions {
    smart: true,
    ..Default::default()
  })
}

#[test]
fn plain_paragraph() {
  assert_eq!(html("Hello, world.\n"), "<p>Hello, world.</p>\n");
}

#[test]
fn heading_then_paragraph() {
  assert_eq!(
    html("# Title\n\nBody.\n"),
    "<h1>Title</h1>\n\n<p>Body.</p>\n"
  );
}

#[test]
fn emphasis_and_strong() {
  assert_eq!(
    html("*em* and **strong**\n"),
    "<p><em>em</em> and <strong>strong</strong></p>\n"
  );
}

#[test]
fn reference_link_resolves_forward() {
  assert_eq!(
    html("[x][y]\n\n[y]: http://e.x \"T\"\n"),
    "<p><a href=\"http://e.x\" title=\"T\">x</a></p>\n"
  );
}

#[test]
fn tight_bullet_list() {
  assert_eq!(
    html("- a\n- b\n"),
    "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
  );
}

#[test]
fn smart_typography_combined() {
  assert_eq!(
    html_smart("\"Hi\"--really...\n"),
    "<p>&ldquo;Hi&rdquo;&mdash;really&hellip;</p>\n"
  );
}

#[test]
fn empty_input_produces_empty_output() {
  assert_eq!(html(""), "");
}

#[test]
fn blank_lines_only_produce_empty_output() {
  assert_eq!(html("\n\n  \n\n"), "");
}

#[test]
fn output_length_stays_proportional() {
  let source = "para one with *some* markup\n\n- item\n- item\n\n> quote\n"
    .repeat(50);
  let rendered = html(&source);
  assert!(!rendered.is_empty());
  // Escaping and tags expand the text, but only by a bounded factor.
  assert!(rendered.len() < source.len() * 8);
}

#[test]
fn documents_are_reusable_values() {
  let parser = MarkdownParser::new(Extensions::default());
  let document = parser.parse("# One\n");
  let first = document.to_html();
  let second = document.to_html();
  assert_eq!(first, second);

  let mut sink = Vec::new();
  document
    .write_html(&mut sink)
    .expect("writing to a Vec succeeds");
  assert_eq!(String::from_utf8(sink).expect("valid utf-8"), first);
}

#[test]
fn write_html_propagates_sink_errors() {
  use std::io;

  struct FailingSink;

  impl io::Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
      Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  let document = pegmark::parse("some text\n", Extensions::default());
  let result = document.write_html(&mut FailingSink);
  assert!(result.is_err());
}

#[test]
fn parse_is_total_over_arbitrary_bytes() {
  // No parse error type exists; odd input comes through as literal text.
  let odd = "\u{1}\u{2} ]) ** `` [unclosed ![x\n";
  let rendered = html(odd);
  assert!(rendered.starts_with("<p>"));
}
