mod browser;
mod cli;
mod error;
mod fmt;
mod loader;
mod models;
mod session;
mod settings;
mod statement;
mod tui;
mod xlsx;

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use settings::{load_settings, log_path, shellexpand_path};

fn main() {
    let cli = Cli::parse();
    let settings = load_settings();

    let command = cli.command.unwrap_or_else(|| {
        if std::io::stdout().is_terminal() {
            Commands::View
        } else {
            Commands::List
        }
    });

    let level = cli.log_level.unwrap_or_else(|| settings.log_level.clone());
    // The interactive view owns the terminal, so its logs go to a file.
    let log_file = matches!(command, Commands::View).then(log_path);
    setup_logging(&level, log_file);

    let endpoint = cli.endpoint.unwrap_or_else(|| settings.endpoint.clone());
    let export_dir = PathBuf::from(shellexpand_path(&settings.export_dir));

    let result = match command {
        Commands::View => cli::view::run(&endpoint, export_dir),
        Commands::List => {
            cli::list::run(&endpoint);
            Ok(())
        }
        Commands::Show { files } => {
            cli::show::run(&endpoint, &files);
            Ok(())
        }
        Commands::Export {
            files,
            all,
            output_dir,
        } => {
            let dir = output_dir
                .map(|d| PathBuf::from(shellexpand_path(&d)))
                .unwrap_or(export_dir);
            cli::export::run(&endpoint, &files, all, &dir)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set {
                endpoint,
                export_dir,
                log_level,
            } => cli::config::set(endpoint, export_dir, log_level),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over the configured level.
fn setup_logging(level: &str, log_file: Option<PathBuf>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        None => builder.with_writer(std::io::stderr).init(),
        Some(path) => match open_log(&path) {
            Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).init(),
            None => builder.with_writer(std::io::sink).init(),
        },
    }
}

fn open_log(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
