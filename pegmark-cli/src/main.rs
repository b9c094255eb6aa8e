use std::{
  fs,
  io::{self, Read, Write},
};

use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, debug};
use pegmark::MarkdownParser;

mod cli;
use cli::Cli;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .init();

  let source = match &cli.file {
    Some(path) => fs::read_to_string(path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
    None => {
      let mut buf = String::new();
      io::stdin()
        .read_to_string(&mut buf)
        .wrap_err("Failed to read standard input")?;
      buf
    },
  };
  debug!("read {} bytes of Markdown", source.len());

  let parser = MarkdownParser::new(cli.extensions());
  let document = parser.parse(&source);

  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  document
    .write_html(&mut out)
    .wrap_err("Failed to write HTML to standard output")?;
  out.flush().wrap_err("Failed to flush standard output")?;

  Ok(())
}
