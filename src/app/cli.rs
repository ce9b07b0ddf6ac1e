use clap::Parser;
use std::path::PathBuf;

use crate::app::models::HeadingStyle;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate selected source files into a single Markdown document"
)]
pub struct Cli {
    /// Configuration file (header text, `---`, then key=value directives)
    #[arg(long, default_value = "input.txt")]
    pub input: PathBuf,

    /// Where to write the generated document (overwritten)
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Path shown in each file heading; overrides the `heading` directive
    #[arg(long, value_enum)]
    pub heading: Option<HeadingStyle>,

    /// List the selected files instead of writing the document
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug output (pruned folders, excluded files)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter; `RUST_LOG` still takes precedence.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
