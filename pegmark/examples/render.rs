use std::{env, fs};

use pegmark::{Extensions, MarkdownParser};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let source = match env::args().nth(1) {
    Some(path) => fs::read_to_string(path)?,
    None => {
      "# pegmark\n\nA *tiny* demo with a [link](http://example.com) and a \
       footnote[^1]...\n\n[^1]: Rendered at the bottom.\n"
        .to_string()
    },
  };

  let parser = MarkdownParser::new(Extensions::all());
  let document = parser.parse(&source);

  println!("parsed {} top-level blocks", document.blocks().len());
  println!("collected {} references", document.references().len());
  println!("collected {} notes", document.notes().len());
  println!("---");
  print!("{}", document.to_html());

  Ok(())
}
