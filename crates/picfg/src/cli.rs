//! Clap derive structures for the `picfg` CLI.
//!
//! Kept free of crate-internal imports so `build.rs` can include it to
//! render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// picfg -- pull archived device configurations out of Prime Infrastructure
#[derive(Debug, Parser)]
#[command(
    name = "picfg",
    version,
    about = "Extract device configurations from Cisco Prime Infrastructure",
    long_about = "Downloads the sanitized running and startup configurations that\n\
        Prime Infrastructure archives for its managed devices, and stores each\n\
        one as a plain text file in a pi_cfg_files directory.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "PICFG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Log file, truncated on every run
    #[arg(long, env = "PICFG_LOG_FILE", default_value = "pi_cfg.log", global = true)]
    pub log_file: PathBuf,

    /// Also log to stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download running and startup configurations into pi_cfg_files/
    #[command(alias = "x")]
    Extract(ExtractArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Prime Infrastructure URL (e.g. https://prime.example.com)
    #[arg(long, short = 'u', env = "PICFG_URL")]
    pub url: Option<String>,

    /// API username
    #[arg(long, short = 'U', env = "PICFG_USERNAME")]
    pub username: Option<String>,

    /// Environment variable holding the password
    #[arg(long, value_name = "VAR")]
    pub password_env: Option<String>,

    /// Directory in which pi_cfg_files/ is created
    #[arg(long, short = 'o', env = "PICFG_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "PICFG_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Records requested per listing page
    #[arg(long, env = "PICFG_PAGE_SIZE", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Verify the server certificate against the system trust store
    /// (a profile's ca_cert is still used when set)
    #[arg(long, env = "PICFG_STRICT_TLS", conflicts_with = "ca_cert")]
    pub strict_tls: bool,

    /// Verify the server certificate against this CA bundle
    #[arg(long, value_name = "PEM")]
    pub ca_cert: Option<PathBuf>,

    /// Never prompt; fail if a required value is missing
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
