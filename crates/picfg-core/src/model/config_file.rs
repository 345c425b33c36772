// ── Configuration archive types ──
//
// A version record bundles one device's identity with the files Prime
// archived for it. Only running and startup configs become results.

use std::fmt;
use std::str::FromStr;

use super::version_id::ConfigVersionId;

/// Content kind of an archived file, as reported in `fileState`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileState {
    RunningConfig,
    StartupConfig,
    Binary,
    /// Any label Prime reports that we don't act on.
    Other(String),
}

impl FileState {
    /// Whether files in this state are fetched and written out.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::RunningConfig | Self::StartupConfig)
    }

    /// The label as Prime spells it (`RUNNINGCONFIG`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::RunningConfig => "RUNNINGCONFIG",
            Self::StartupConfig => "STARTUPCONFIG",
            Self::Binary => "BINARY",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "RUNNINGCONFIG" => Self::RunningConfig,
            "STARTUPCONFIG" => Self::StartupConfig,
            "BINARY" => Self::Binary,
            other => Self::Other(other.to_owned()),
        })
    }
}

/// One `fileInfo` entry of a version record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_id: String,
    pub file_state: FileState,
    /// Free-form type label (e.g. `RUNNINGCONFIG`, `VLAN`).
    pub file_type: String,
}

/// A device's configuration version entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVersionRecord {
    pub device_id: ConfigVersionId,
    pub device_ip: String,
    pub device_name: String,
    pub files: Vec<FileInfo>,
}

impl ConfigVersionRecord {
    /// Files whose state is a running or startup config, in document order.
    pub fn config_files(&self) -> impl Iterator<Item = &FileInfo> {
        self.files.iter().filter(|f| f.file_state.is_config())
    }
}

/// A retrieved configuration file, ready to be written to disk.
///
/// Only built for running/startup configs whose content was fetched, so
/// `config` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileResult {
    pub device_id: ConfigVersionId,
    pub device_ip: String,
    pub device_name: String,
    pub file_id: String,
    pub file_state: FileState,
    pub file_type: String,
    pub config: String,
}

impl ConfigFileResult {
    pub(crate) fn new(record: &ConfigVersionRecord, file: &FileInfo, config: String) -> Self {
        Self {
            device_id: record.device_id.clone(),
            device_ip: record.device_ip.clone(),
            device_name: record.device_name.clone(),
            file_id: file.file_id.clone(),
            file_state: file.file_state.clone(),
            file_type: file.file_type.clone(),
            config,
        }
    }
}
