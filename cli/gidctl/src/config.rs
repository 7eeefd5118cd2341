//! Registry file discovery and loading.
//!
//! The registry is read from, in order:
//! - `--config <path>` / `GIDCTL_CONFIG`
//! - `registry.toml` in the platform config directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use globalid::{GlobalIdCodec, ParserCatalog, RegistryConfig};
use tracing::debug;

use crate::error::CliError;

/// Registry file name.
const REGISTRY_FILE: &str = "registry.toml";

/// Get the config directory path.
fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("dev", "globalid", "gidctl")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Default registry file location.
pub fn default_registry_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(REGISTRY_FILE))
}

/// Load the registry into a codec.
///
/// An explicitly given path must exist. A missing default file yields an
/// empty registry, which still supports `inspect`.
pub fn load_codec(explicit: Option<&Path>) -> Result<GlobalIdCodec> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::RegistryNotFound(path.to_path_buf()).into());
            }
            path.to_path_buf()
        }
        None => {
            let path = default_registry_path()?;
            if !path.exists() {
                debug!(path = %path.display(), "No registry file, using empty registry");
                return Ok(GlobalIdCodec::new());
            }
            path
        }
    };

    let config = RegistryConfig::load(&path)?;
    let codec = config.build(&ParserCatalog::with_builtins())?;
    debug!(path = %path.display(), types = codec.types().len(), "Registry loaded");
    Ok(codec)
}
