use comfy_table::{Cell, CellAlignment, Table};

use crate::loader::load_files;
use crate::models::FileRecord;

pub fn run(endpoint: &str) {
    println!("{}", format_file_list(&load_files(endpoint)));
}

pub fn format_file_list(files: &[FileRecord]) -> String {
    if files.is_empty() {
        return "No files loaded.".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "File", "Bank", "Accounts"]);
    for f in files {
        table.add_row(vec![
            Cell::new(f.id),
            Cell::new(&f.file_name),
            Cell::new(&f.bank_name),
            Cell::new(f.accounts.len()).set_alignment(CellAlignment::Right),
        ]);
    }
    format!("Uploaded files ({})\n{table}", files.len())
}
