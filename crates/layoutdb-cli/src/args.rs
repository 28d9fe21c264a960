//! Command-line argument definitions for the LayoutDB CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, output encoding, design file checks and logging verbosity.

use clap::Parser;

use layoutdb::files::LefFile;

/// Command-line arguments for the LayoutDB conversion tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the parser dump (JSON, optionally gzipped)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the compacted output file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Gzip the output, regardless of the configuration file
    #[arg(long)]
    pub compress: bool,

    /// Indent the output JSON, regardless of the configuration file
    #[arg(long)]
    pub pretty: bool,

    /// DEF file the input was parsed from; checked together with `--lef`
    #[arg(long, requires = "lef")]
    pub def: Option<String>,

    /// LEF file the input was parsed from, as <path>:tech, <path>:lib or <path>:tech+lib
    #[arg(long, requires = "def")]
    pub lef: Vec<LefFile>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
