pub mod config;
pub mod export;
pub mod list;
pub mod show;
pub mod view;

use clap::{Parser, Subcommand};

use crate::models::FileRecord;
use crate::session::Session;

/// Build a session over `files` with each of `ids` selected once. Unknown ids
/// are reported and skipped.
pub(crate) fn select(files: Vec<FileRecord>, ids: &[i64]) -> Session {
    let mut session = Session::new(files);
    let mut seen = Vec::new();
    for &id in ids {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        if session.files().iter().any(|f| f.id == id) {
            session.handle_file_selection(id);
        } else {
            eprintln!("No file with id {id}");
        }
    }
    session
}

#[derive(Parser)]
#[command(
    name = "turnover",
    version,
    about = "View uploaded turnover statements and export them to Excel."
)]
pub struct Cli {
    /// Files endpoint (default: from settings)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// Log level: error, warn, info, debug, trace
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse files interactively: tick files, read statements, export.
    View,
    /// List uploaded files.
    List,
    /// Print the statements of the given files.
    Show {
        /// File ID (shown in `turnover list`); repeat for several files
        #[arg(long = "file", required = true)]
        files: Vec<i64>,
    },
    /// Export files to files_data.xlsx, one sheet per file.
    Export {
        /// File ID to export; repeat for several files
        #[arg(long = "file")]
        files: Vec<i64>,
        /// Export every uploaded file
        #[arg(long, conflicts_with = "files")]
        all: bool,
        /// Directory to write files_data.xlsx into (default: from settings)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings.
    Show,
    /// Change settings.
    Set {
        /// Files endpoint URL
        #[arg(long)]
        endpoint: Option<String>,
        /// Default export directory
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Default log level
        #[arg(long = "log-level")]
        log_level: Option<String>,
    },
}
