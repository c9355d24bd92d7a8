use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Discover, group and watch XLIFF localization files in a workspace.
///
/// Files named `<lang>.<base>.xlf` and their language-less source `<base>.xlf`
/// are grouped per directory into translation groups.
#[derive(Parser, Debug)]
#[command(
    name = "xliff-ws",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a workspace once and list its translation groups.
    Scan {
        /// Path to the workspace root.
        path: PathBuf,

        /// Output the scan as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// Scan a workspace, then report localization file changes until Ctrl-C.
    Watch {
        /// Path to the workspace root.
        path: PathBuf,

        /// Print one JSON object per event instead of one text line.
        #[arg(long)]
        json: bool,
    },

    /// Create a new language variant by copying a group's source file.
    ///
    /// The new file is written next to the source as `<LANG>.<base>.xlf`.
    AddLanguage {
        /// The language-less source file (e.g. `messages.xlf`).
        source: PathBuf,

        /// Two-letter lowercase language code (e.g. `de`).
        language: String,
    },
}
