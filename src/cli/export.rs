use std::path::Path;

use crate::error::Result;
use crate::loader::load_files;
use crate::session::Session;
use crate::xlsx::{export_to_excel, ExportOutcome};

pub fn run(endpoint: &str, ids: &[i64], all: bool, dir: &Path) -> Result<()> {
    let files = load_files(endpoint);
    let session = if all {
        let mut session = Session::new(files);
        session.toggle_all();
        session
    } else {
        super::select(files, ids)
    };

    match export_to_excel(&session, dir)? {
        ExportOutcome::Written { path, sheets } => {
            println!("Wrote {} ({sheets} sheet(s))", path.display());
        }
        ExportOutcome::NothingSelected => println!("No files selected; nothing exported."),
    }
    Ok(())
}
