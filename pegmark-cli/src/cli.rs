use std::path::PathBuf;

use clap::Parser;
use pegmark::Extensions;

/// Command line interface for pegmark
#[derive(Parser, Debug)]
#[command(author, version, about = "Convert Markdown to HTML")]
pub struct Cli {
  /// Input file; standard input when omitted
  pub file: Option<PathBuf>,

  /// Turn on smart quotes, dashes, and ellipses
  #[arg(long)]
  pub smart: bool,

  /// Turn on footnote syntax
  #[arg(long)]
  pub notes: bool,

  /// Support definition lists
  #[arg(long)]
  pub dlists: bool,

  /// Drop raw HTML from the output
  #[arg(long = "filter-html")]
  pub filter_html: bool,

  /// Drop <style> blocks from the output
  #[arg(long = "filter-styles")]
  pub filter_styles: bool,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// The extension set selected by the flags.
  #[must_use]
  pub const fn extensions(&self) -> Extensions {
    Extensions {
      smart:         self.smart,
      notes:         self.notes,
      dlists:        self.dlists,
      filter_html:   self.filter_html,
      filter_styles: self.filter_styles,
    }
  }
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::Cli;

  #[test]
  fn flags_map_to_extensions() {
    let cli = Cli::try_parse_from(["pegmark", "--smart", "--dlists"])
      .expect("arguments parse");
    let ext = cli.extensions();
    assert!(ext.smart && ext.dlists);
    assert!(!ext.notes && !ext.filter_html && !ext.filter_styles);
  }

  #[test]
  fn file_argument_is_optional() {
    let cli = Cli::try_parse_from(["pegmark"]).expect("arguments parse");
    assert!(cli.file.is_none());
  }
}
