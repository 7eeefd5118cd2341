//! Error handling and display for the CLI.

use std::path::PathBuf;

use colored::Colorize;
use globalid::{ConfigError, GlobalIdError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Registry file not found: {0:?}")]
    RegistryNotFound(PathBuf),
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(hint) = hint_for(err) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(CliError::RegistryNotFound(_)) = err.downcast_ref::<CliError>() {
        return Some("Pass --config or set GIDCTL_CONFIG to an existing registry file.");
    }

    let id_err = match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::Registration(inner)) => inner,
        Some(_) => return Some("Check the registry file syntax."),
        None => err.downcast_ref::<GlobalIdError>()?,
    };

    match id_err {
        GlobalIdError::UnknownPrefix { .. } | GlobalIdError::UnknownType { .. } => {
            Some("Run `gidctl types` to list the registered types and prefixes.")
        }
        GlobalIdError::UnknownVersion { .. } => {
            Some("Run `gidctl types` to list the versions registered per prefix.")
        }
        GlobalIdError::InvalidFormat { .. } => {
            Some("Global IDs look like `<prefix>_<base64url payload>`.")
        }
        GlobalIdError::UnknownParser { .. } => {
            Some("Built-in parsers are `string` and `json`.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_for_lookup_miss() {
        let err = anyhow::Error::new(GlobalIdError::UnknownPrefix {
            prefix: "xyz".to_string(),
        });
        assert!(hint_for(&err).unwrap().contains("gidctl types"));
    }

    #[test]
    fn test_hint_for_wrapped_registration_error() {
        let err = anyhow::Error::new(ConfigError::Registration(GlobalIdError::UnknownParser {
            name: "com.example.Missing".to_string(),
        }));
        assert!(hint_for(&err).unwrap().contains("string"));
    }

    #[test]
    fn test_no_hint_for_missing_value() {
        let err = anyhow::Error::new(GlobalIdError::MissingValue);
        assert!(hint_for(&err).is_none());
    }
}
