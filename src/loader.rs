use std::sync::mpsc::{self, Receiver};
use std::thread;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::models::{normalize_list, FileRecord};

const USER_AGENT: &str = concat!("turnover/", env!("CARGO_PKG_VERSION"));

/// Decode a files response body. Anything that is not a list of files, bare
/// or `$values`-wrapped, decodes to an empty list.
pub fn parse_files(body: &str) -> Vec<FileRecord> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => normalize_list(value),
        Err(e) => {
            warn!(error = %e, "files response is not valid JSON");
            Vec::new()
        }
    }
}

pub fn build_client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// One GET against the files endpoint. Non-2xx statuses are errors.
pub fn fetch_files(client: &Client, endpoint: &str) -> Result<Vec<FileRecord>> {
    debug!(endpoint, "fetching files");
    let body = client.get(endpoint).send()?.error_for_status()?.text()?;
    let files = parse_files(&body);
    info!(count = files.len(), "files loaded");
    Ok(files)
}

/// Fetch the file list, logging any failure and degrading to an empty list.
/// Never retries.
pub fn load_files(endpoint: &str) -> Vec<FileRecord> {
    match build_client().and_then(|client| fetch_files(&client, endpoint)) {
        Ok(files) => files,
        Err(e) => {
            error!(endpoint, error = %e, "Error fetching files");
            Vec::new()
        }
    }
}

/// Run `load_files` off the UI thread. The receiver yields the complete list
/// exactly once.
pub fn spawn_load(endpoint: String) -> Receiver<Vec<FileRecord>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let files = load_files(&endpoint);
        // The view may have quit before the response arrived.
        let _ = tx.send(files);
    });
    rx
}

#[cfg(test)]
#[path = "../tests/support/mod.rs"]
mod test_server;
