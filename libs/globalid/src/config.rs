//! Registry configuration files.
//!
//! A registry is described in TOML, one table per type:
//!
//! ```toml
//! [[types]]
//! name = "Organization"
//! prefix = "org"
//!
//! [[types.versions]]
//! version = "1.0.0"
//! parser = "string"
//! ```
//!
//! Parser names are resolved through a [`ParserCatalog`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{GlobalIdCodec, GlobalIdError, ParserCatalog};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// Applying the configuration to a registry failed.
    #[error(transparent)]
    Registration(#[from] GlobalIdError),
}

/// A full registry description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub types: Vec<TypeConfig>,
}

/// One type with its prefix and versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Logical type name.
    pub name: String,

    /// Wire prefix.
    pub prefix: String,

    /// Parser versions for this type.
    #[serde(default)]
    pub versions: Vec<VersionConfig>,
}

/// A version and the catalog name of its parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionConfig {
    pub version: String,

    #[serde(default = "crate::catalog::default_parser")]
    pub parser: String,
}

impl RegistryConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Registers every type and version with `codec`.
    ///
    /// A type may span several tables as long as they name the same prefix,
    /// matching repeated [`GlobalIdCodec::configure`] calls. Stops at the
    /// first failure; registrations made before it stay in place.
    pub fn apply(&self, codec: &GlobalIdCodec, catalog: &ParserCatalog) -> Result<(), ConfigError> {
        for ty in &self.types {
            codec.ensure_type(&ty.name, &ty.prefix)?;
            for version in &ty.versions {
                let parser = catalog.build(&version.parser)?;
                codec.configure_erased(&ty.name, &ty.prefix, &version.version, parser)?;
            }
        }

        info!(types = self.types.len(), "Applied registry configuration");
        Ok(())
    }

    /// Builds a fresh codec from this configuration.
    pub fn build(&self, catalog: &ParserCatalog) -> Result<GlobalIdCodec, ConfigError> {
        let codec = GlobalIdCodec::new();
        self.apply(&codec, catalog)?;
        Ok(codec)
    }
}
