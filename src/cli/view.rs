use std::path::PathBuf;

use crate::browser::FileBrowser;
use crate::error::Result;
use crate::loader::spawn_load;
use crate::tui::run_view;

pub fn run(endpoint: &str, export_dir: PathBuf) -> Result<()> {
    let mut browser = FileBrowser::new(export_dir).with_loader(spawn_load(endpoint.to_string()));
    run_view(&mut browser)
}
