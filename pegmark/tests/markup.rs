#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
//! Coverage for the core block and inline grammar.
use pegmark::Extensions;

fn html(source: &str) -> String {
  pegmark::render_html(source, Extensions::default())
}

// Headings

#[test]
fn atx_heading_levels() {
  assert_eq!(html("# One\n"), "<h1>One</h1>\n");
  assert_eq!(html("## Two\n"), "<h2>Two</h2>\n");
  assert_eq!(html("###### Six\n"), "<h6>Six</h6>\n");
}

#[test]
fn seven_hashes_are_a_paragraph() {
  assert_eq!(html("####### Seven\n"), "<p>####### Seven</p>\n");
}

#[test]
fn atx_heading_strips_trailing_hashes() {
  assert_eq!(html("## Two ##\n"), "<h2>Two</h2>\n");
}

#[test]
fn setext_headings() {
  assert_eq!(html("Title\n=====\n"), "<h1>Title</h1>\n");
  assert_eq!(html("Sub\n---\n"), "<h2>Sub</h2>\n");
}

#[test]
fn setext_interrupts_a_preceding_paragraph() {
  assert_eq!(
    html("para\nTitle\n===\n"),
    "para\n\n<h1>Title</h1>\n"
  );
}

// Paragraphs and line handling

#[test]
fn soft_breaks_keep_the_newline() {
  assert_eq!(html("a\nb\n"), "<p>a\nb</p>\n");
}

#[test]
fn two_trailing_spaces_become_a_line_break() {
  assert_eq!(html("a  \nb\n"), "<p>a<br/>\nb</p>\n");
}

#[test]
fn runs_of_spaces_collapse() {
  assert_eq!(html("a     b\n"), "<p>a b</p>\n");
}

// Block quotes

#[test]
fn block_quote_wraps_a_paragraph() {
  assert_eq!(
    html("> quoted text\n"),
    "<blockquote>\n<p>quoted text</p>\n</blockquote>\n"
  );
}

#[test]
fn block_quote_takes_lazy_continuation_lines() {
  assert_eq!(
    html("> line one\nline two\n"),
    "<blockquote>\n<p>line one\nline two</p>\n</blockquote>\n"
  );
}

#[test]
fn block_quotes_nest() {
  assert_eq!(
    html("> > deep\n"),
    "<blockquote>\n<blockquote>\n<p>deep</p>\n</blockquote>\n</blockquote>\n"
  );
}

// Verbatim

#[test]
fn four_space_indent_is_verbatim() {
  assert_eq!(html("    code here\n"), "<pre><code>code here\n</code></pre>\n");
}

#[test]
fn three_space_indent_is_a_paragraph() {
  assert_eq!(html("   three\n"), "<p>three</p>\n");
}

#[test]
fn verbatim_escapes_html() {
  assert_eq!(
    html("    <b> & \"q\"\n"),
    "<pre><code>&lt;b&gt; &amp; &quot;q&quot;\n</code></pre>\n"
  );
}

#[test]
fn verbatim_chunks_keep_blank_lines() {
  assert_eq!(
    html("    a\n\n    b\n"),
    "<pre><code>a\n\nb\n</code></pre>\n"
  );
}

// Horizontal rules

#[test]
fn horizontal_rules() {
  assert_eq!(html("---\n"), "<hr/>\n");
  assert_eq!(html("* * *\n"), "<hr/>\n");
  assert_eq!(html("___\n"), "<hr/>\n");
}

#[test]
fn rule_wins_over_bullet_list() {
  assert_eq!(html("- - -\n"), "<hr/>\n");
}

// Lists

#[test]
fn ordered_list() {
  assert_eq!(
    html("1. one\n2. two\n"),
    "<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n"
  );
}

#[test]
fn loose_items_get_paragraphs() {
  assert_eq!(
    html("- a\n\n- b\n"),
    "<ul>\n<li><p>a</p></li>\n<li><p>b</p></li>\n</ul>\n"
  );
}

#[test]
fn nested_list_needs_a_full_indent() {
  assert_eq!(
    html("- a\n    - b\n"),
    "<ul>\n<li>a\n\n<ul>\n<li>b</li>\n</ul></li>\n</ul>\n"
  );
}

#[test]
fn item_count_matches_the_source() {
  let rendered = html("- x\n- y\n- z\n");
  assert_eq!(rendered.matches("<li>").count(), 3);
}

// Code spans

#[test]
fn code_span_basics() {
  assert_eq!(html("`code`\n"), "<p><code>code</code></p>\n");
}

#[test]
fn code_span_strips_surrounding_spaces() {
  assert_eq!(html("` x `\n"), "<p><code>x</code></p>\n");
}

#[test]
fn double_ticks_protect_single_ticks() {
  assert_eq!(html("`` a`b ``\n"), "<p><code>a`b</code></p>\n");
}

#[test]
fn five_ticks_close_only_on_five() {
  assert_eq!(html("`````x`````\n"), "<p><code>x</code></p>\n");
  assert!(html("`````x```\n").contains("`````x```"));
}

#[test]
fn code_content_is_escaped() {
  assert_eq!(html("`<a>`\n"), "<p><code>&lt;a&gt;</code></p>\n");
}

// Emphasis

#[test]
fn underscore_emphasis() {
  assert_eq!(html("_em_\n"), "<p><em>em</em></p>\n");
}

#[test]
fn intraword_underscores_stay_literal() {
  assert_eq!(html("foo_bar_baz\n"), "<p>foo_bar_baz</p>\n");
}

#[test]
fn star_runs_are_literal() {
  assert_eq!(html("****\n"), "<p>****</p>\n");
  assert_eq!(html("a * b\n"), "<p>a * b</p>\n");
}

#[test]
fn nested_strong_inside_emph() {
  assert_eq!(
    html("*a **b** c*\n"),
    "<p><em>a <strong>b</strong> c</em></p>\n"
  );
}

#[test]
fn unclosed_emphasis_is_literal() {
  assert_eq!(html("*foo bar\n"), "<p>*foo bar</p>\n");
}

// Links and images

#[test]
fn explicit_link() {
  assert_eq!(
    html("[t](http://a.b)\n"),
    "<p><a href=\"http://a.b\">t</a></p>\n"
  );
}

#[test]
fn explicit_link_with_title() {
  assert_eq!(
    html("[t](http://a.b \"T\")\n"),
    "<p><a href=\"http://a.b\" title=\"T\">t</a></p>\n"
  );
}

#[test]
fn angle_wrapped_source() {
  assert_eq!(
    html("[t](<http://a.b>)\n"),
    "<p><a href=\"http://a.b\">t</a></p>\n"
  );
}

#[test]
fn source_may_contain_balanced_parens() {
  assert_eq!(
    html("[t](http://a.b/(x))\n"),
    "<p><a href=\"http://a.b/(x)\">t</a></p>\n"
  );
}

#[test]
fn reference_labels_are_case_insensitive() {
  assert_eq!(
    html("[X][the ref]\n\n[The REF]: http://e.x\n"),
    "<p><a href=\"http://e.x\">X</a></p>\n"
  );
}

#[test]
fn implicit_reference_link() {
  assert_eq!(
    html("[y][]\n\n[y]: http://e.x\n"),
    "<p><a href=\"http://e.x\">y</a></p>\n"
  );
}

#[test]
fn unresolved_references_stay_literal() {
  assert_eq!(html("[nope]\n"), "<p>[nope]</p>\n");
  assert_eq!(html("[a][b]\n"), "<p>[a][b]</p>\n");
  assert_eq!(html("[a] [b]\n"), "<p>[a] [b]</p>\n");
}

#[test]
fn autolinks() {
  assert_eq!(
    html("<http://x.y/z>\n"),
    "<p><a href=\"http://x.y/z\">http://x.y/z</a></p>\n"
  );
  assert_eq!(
    html("<a@b.c>\n"),
    "<p><a href=\"mailto:a@b.c\">a@b.c</a></p>\n"
  );
}

#[test]
fn image_with_alt_text() {
  assert_eq!(
    html("![alt text](http://i.png)\n"),
    "<p><img src=\"http://i.png\" alt=\"alt text\"/></p>\n"
  );
}

#[test]
fn bare_bang_is_literal() {
  assert_eq!(html("!x\n"), "<p>!x</p>\n");
}

// Entities and escapes

#[test]
fn entities_pass_through() {
  assert_eq!(
    html("&amp; &#65; &#x41;\n"),
    "<p>&amp; &#65; &#x41;</p>\n"
  );
}

#[test]
fn bare_ampersand_is_escaped() {
  assert_eq!(html("a & b\n"), "<p>a &amp; b</p>\n");
}

#[test]
fn backslash_escapes() {
  assert_eq!(html("\\*not em\\*\n"), "<p>*not em*</p>\n");
}

// Raw HTML

#[test]
fn inline_html_passes_through() {
  assert_eq!(html("a <b>bold</b>\n"), "<p>a <b>bold</b></p>\n");
}

#[test]
fn html_block_passes_through() {
  assert_eq!(
    html("<div>\nx\n</div>\n\npara\n"),
    "<div>\nx\n</div>\n\n<p>para</p>\n"
  );
}

#[test]
fn html_comment_block_passes_through() {
  assert_eq!(
    html("<!-- note -->\n\ntext\n"),
    "<!-- note -->\n\n<p>text</p>\n"
  );
}

#[test]
fn nested_same_tag_blocks_balance() {
  assert_eq!(
    html("<div><div>x</div></div>\n\nafter\n"),
    "<div><div>x</div></div>\n\n<p>after</p>\n"
  );
}
