//! Encode command.

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::output::print_value;

use super::CommandContext;

/// Encode a raw value into a global ID.
///
/// The value is passed through the parser registered for the type's prefix
/// and the given version before it is packed.
#[derive(Debug, Args)]
pub struct EncodeCommand {
    /// Logical type name, e.g. `Organization`.
    type_name: String,

    /// Parser version to encode with.
    version: String,

    /// Value in the parser's text form.
    value: String,
}

impl EncodeCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let codec = ctx.codec()?;
        let encoded = codec.encode_raw(&self.type_name, &self.version, Some(&self.value))?;
        debug!(type_name = %self.type_name, version = %self.version, "Encoded ID");

        print_value("id", &encoded, ctx.format);
        Ok(())
    }
}
