//! Writing extracted configurations to disk.
//!
//! One text file per result, named `{deviceName}-{deviceIpAddress}-{fileState}.txt`.
//! Results that map to the same name overwrite each other in result order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use picfg_core::ConfigFileResult;

/// Folder created inside the chosen destination.
pub const OUTPUT_DIR_NAME: &str = "pi_cfg_files";

/// Empty `dir` of regular files (if it exists) and make sure it exists.
///
/// Subdirectories are left alone.
pub fn prepare_directory(dir: &Path) -> io::Result<()> {
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                debug!(path = %entry.path().display(), "removing previous file");
                fs::remove_file(entry.path())?;
            }
        }
    }
    fs::create_dir_all(dir)
}

/// File name for one result.
pub fn file_name_for(result: &ConfigFileResult) -> String {
    format!(
        "{}-{}-{}.txt",
        sanitize(&result.device_name),
        sanitize(&result.device_ip),
        sanitize(result.file_state.as_str())
    )
}

fn sanitize(component: &str) -> String {
    component
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Write every result into `dir`, returning the paths written.
pub fn write_results(dir: &Path, results: &[ConfigFileResult]) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(results.len());
    for result in results {
        let path = dir.join(file_name_for(result));
        fs::write(&path, &result.config)?;
        debug!(path = %path.display(), "successful write");
        written.push(path);
    }
    Ok(written)
}
