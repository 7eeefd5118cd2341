//! Inspect command.

use anyhow::Result;
use clap::Args;
use globalid::wire::{self, CborCodec};

use crate::output::{print_single, FieldRow};

use super::CommandContext;

/// Show the prefix, version and data of an ID.
///
/// Only the envelope is decoded, so no registry is needed and the data is
/// shown exactly as carried on the wire.
#[derive(Debug, Args)]
pub struct InspectCommand {
    /// Encoded ID.
    id: String,
}

impl InspectCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let raw = wire::unpack(&self.id, &CborCodec)?;

        let rows = vec![
            FieldRow::new("Prefix", raw.prefix.as_str()),
            FieldRow::new("Version", raw.version.as_str()),
            FieldRow::new("Data", raw.data.as_str()),
        ];
        print_single(&raw, rows, ctx.format);
        Ok(())
    }
}
