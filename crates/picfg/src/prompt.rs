//! Interactive input for values not supplied by flags, env, or profile.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;

use crate::error::CliError;

/// A value the run can ask the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Username,
    Password,
    OutputDir,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Self::Url => "Prime Infrastructure URL",
            Self::Username => "Prime Infrastructure username",
            Self::Password => "Prime Infrastructure password",
            Self::OutputDir => "Destination directory (pi_cfg_files is created inside)",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            Self::Url => "--url",
            Self::Username => "--username",
            Self::Password => "--password-env or PICFG_PASSWORD",
            Self::OutputDir => "--output-dir",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Url => "server URL",
            Self::Username => "username",
            Self::Password => "password",
            Self::OutputDir => "destination directory",
        }
    }

    pub fn missing(self) -> CliError {
        CliError::MissingValue {
            field: self.name().into(),
            flag: self.flag().into(),
        }
    }
}

/// Source of interactively entered values.
pub trait Prompt {
    fn text(&self, field: Field, default: Option<&str>) -> Result<String, CliError>;

    fn secret(&self, field: Field) -> Result<SecretString, CliError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn text(&self, field: Field, default: Option<&str>) -> Result<String, CliError> {
        let mut input = Input::<String>::new().with_prompt(field.label());
        if let Some(default) = default {
            input = input.default(default.to_owned());
        }
        let value = input.interact_text().map_err(prompt_err)?;
        Ok(value.trim().to_owned())
    }

    fn secret(&self, field: Field) -> Result<SecretString, CliError> {
        let value = rpassword::prompt_password(format!("{}: ", field.label())).map_err(prompt_err)?;
        if value.is_empty() {
            return Err(field.missing());
        }
        Ok(SecretString::from(value))
    }
}

/// Refuses every prompt. Used with `--no-input` or without a terminal.
#[derive(Debug, Default)]
pub struct NoInput;

impl Prompt for NoInput {
    fn text(&self, field: Field, _default: Option<&str>) -> Result<String, CliError> {
        Err(field.missing())
    }

    fn secret(&self, field: Field) -> Result<SecretString, CliError> {
        Err(field.missing())
    }
}

/// Pick the prompt source for this run.
pub fn select(no_input: bool) -> Box<dyn Prompt> {
    if no_input || !std::io::stdin().is_terminal() {
        Box::new(NoInput)
    } else {
        Box::new(Terminal)
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
