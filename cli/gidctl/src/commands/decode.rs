//! Decode command.

use anyhow::Result;
use clap::Args;
use globalid::wire;
use serde::Serialize;

use crate::output::{print_single, FieldRow};

use super::CommandContext;

/// Decode a global ID using the registry.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// Encoded ID, e.g. `org_gmZhYmMxMjNlMS4wLjA`.
    id: String,
}

/// Decoded ID as printed.
#[derive(Debug, Serialize)]
struct DecodedId {
    #[serde(rename = "type")]
    type_name: String,
    prefix: String,
    version: String,
    value: String,
}

impl DecodeCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let codec = ctx.codec()?;
        let decoded = codec.decode_raw(&self.id)?;
        let (prefix, _) = wire::split(&self.id)?;

        let out = DecodedId {
            type_name: decoded.type_name().to_string(),
            prefix: prefix.to_string(),
            version: decoded.version().to_string(),
            value: decoded.into_value(),
        };

        let rows = vec![
            FieldRow::new("Type", out.type_name.as_str()),
            FieldRow::new("Prefix", out.prefix.as_str()),
            FieldRow::new("Version", out.version.as_str()),
            FieldRow::new("Value", out.value.as_str()),
        ];
        print_single(&out, rows, ctx.format);
        Ok(())
    }
}
