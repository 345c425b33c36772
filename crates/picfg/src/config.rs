//! Resolve the settings of one `extract` run.
//!
//! Precedence per value: command-line flag (or its environment variable)
//! > profile > `[defaults]` > interactive prompt.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use picfg_config::{Config, Profile};
use picfg_core::{ExtractorConfig, TlsVerification};

use crate::cli::{ExtractArgs, GlobalOpts};
use crate::error::CliError;
use crate::prompt::{Field, Prompt};

/// Everything an extraction run needs.
#[derive(Debug)]
pub struct RunSettings {
    pub extractor: ExtractorConfig,
    /// Directory in which `pi_cfg_files/` is created.
    pub destination: PathBuf,
}

/// Load the config file and resolve settings, prompting for gaps.
pub fn resolve(args: &ExtractArgs, global: &GlobalOpts, prompt: &dyn Prompt) -> Result<RunSettings, CliError> {
    let cfg = picfg_config::load_config()?;
    resolve_with(&cfg, args, global, prompt)
}

pub fn resolve_with(
    cfg: &Config,
    args: &ExtractArgs,
    global: &GlobalOpts,
    prompt: &dyn Prompt,
) -> Result<RunSettings, CliError> {
    let active = cfg.active_profile(global.profile.as_deref())?;
    if let Some((name, _)) = &active {
        debug!(profile = %name, "using profile");
    }
    let profile = active.map(|(_, p)| p);

    let raw_url = match args.url.clone().or_else(|| profile.and_then(|p| p.url.clone())) {
        Some(url) => url,
        None => prompt.text(Field::Url, None)?,
    };
    let url = picfg_config::parse_server_url(&raw_url)?;

    let username = match args
        .username
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
    {
        Some(username) => username,
        None => prompt.text(Field::Username, None)?,
    };
    if username.is_empty() {
        return Err(Field::Username.missing());
    }

    let password = resolve_password(args, profile, prompt)?;

    let destination = match args
        .output_dir
        .clone()
        .or_else(|| profile.and_then(|p| p.output_dir.clone()))
    {
        Some(dir) => dir,
        None => PathBuf::from(prompt.text(Field::OutputDir, Some("."))?),
    };

    debug!(url = %url, username = %username, "resolved server settings");

    let mut extractor = picfg_config::extractor_config(url, username, password, profile, &cfg.defaults);
    if let Some(timeout) = args.timeout {
        extractor.timeout = Duration::from_secs(timeout);
    }
    if let Some(page_size) = args.page_size {
        extractor.page_size = page_size;
    }
    // --strict-tls only turns off DangerAcceptInvalid; a profile CA stays.
    if let Some(ca) = &args.ca_cert {
        extractor.tls = TlsVerification::CustomCa(ca.clone());
    } else if args.strict_tls && !matches!(extractor.tls, TlsVerification::CustomCa(_)) {
        extractor.tls = TlsVerification::SystemDefaults;
    }

    Ok(RunSettings {
        extractor,
        destination,
    })
}

fn resolve_password(
    args: &ExtractArgs,
    profile: Option<&Profile>,
    prompt: &dyn Prompt,
) -> Result<SecretString, CliError> {
    if let Some(var) = &args.password_env {
        return std::env::var(var)
            .map(SecretString::from)
            .map_err(|_| CliError::Validation {
                field: "password-env".into(),
                reason: format!("environment variable {var} is not set"),
            });
    }
    match picfg_config::resolve_password(profile) {
        Some(password) => Ok(password),
        None => prompt.secret(Field::Password),
    }
}
