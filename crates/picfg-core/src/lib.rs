// picfg-core: Configuration archive extraction on top of picfg-api.

pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_PAGE_SIZE, ExtractorConfig, TlsVerification};
pub use error::CoreError;
pub use extractor::{ExtractProgress, Extractor};

pub use model::{ConfigFileResult, ConfigVersionId, ConfigVersionRecord, FileInfo, FileState};
