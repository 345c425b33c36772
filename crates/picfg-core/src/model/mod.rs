// ── Domain model ──
//
// Configuration archive entities as the extraction workflow sees them,
// decoupled from the XML documents they are read from.

pub mod config_file;
pub mod version_id;

pub use config_file::{ConfigFileResult, ConfigVersionRecord, FileInfo, FileState};
pub use version_id::ConfigVersionId;
