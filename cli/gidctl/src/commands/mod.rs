//! CLI commands.

mod decode;
mod encode;
mod inspect;
mod types;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use globalid::GlobalIdCodec;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config;
use crate::output::OutputFormat;

/// gidctl - Encode, decode and inspect prefixed global IDs.
#[derive(Debug, Parser)]
#[command(name = "gidctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Registry file describing types, prefixes and parser versions.
    #[arg(long, global = true, env = "GIDCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, env = "GIDCTL_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode a raw value into a global ID.
    Encode(encode::EncodeCommand),

    /// Decode a global ID using the registry.
    Decode(decode::DecodeCommand),

    /// Show the prefix, version and data of an ID without the registry.
    Inspect(inspect::InspectCommand),

    /// List registered types and their versions.
    Types,

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Install the tracing subscriber. Logs go to stderr.
    pub fn init_tracing(&self) {
        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(&self.log_level)),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Run the CLI command.
    pub fn run(self) -> Result<()> {
        let ctx = CommandContext {
            config: self.config,
            format: self.output,
        };

        match self.command {
            Commands::Encode(cmd) => cmd.run(ctx),
            Commands::Decode(cmd) => cmd.run(ctx),
            Commands::Inspect(cmd) => cmd.run(ctx),
            Commands::Types => types::list_types(ctx),
            Commands::Version => {
                println!("gidctl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load the registry into a codec.
    pub fn codec(&self) -> Result<GlobalIdCodec> {
        config::load_codec(self.config.as_deref())
    }
}
