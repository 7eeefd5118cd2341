//! Registered type listing.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::output::print_output;

use super::CommandContext;

/// A registered type with its parser versions.
#[derive(Debug, Serialize, Tabled)]
struct TypeRow {
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    type_name: String,

    #[tabled(rename = "Prefix")]
    prefix: String,

    #[serde(skip)]
    #[tabled(rename = "Versions")]
    versions_display: String,

    #[tabled(skip)]
    versions: Vec<String>,
}

pub fn list_types(ctx: CommandContext) -> Result<()> {
    let codec = ctx.codec()?;

    let rows: Vec<TypeRow> = codec
        .types()
        .entries()
        .into_iter()
        .map(|entry| {
            let versions = codec.parsers().versions(&entry.prefix);
            TypeRow {
                versions_display: if versions.is_empty() {
                    "-".to_string()
                } else {
                    versions.join(", ")
                },
                versions,
                type_name: entry.type_name,
                prefix: entry.prefix,
            }
        })
        .collect();

    print_output(&rows, ctx.format);
    Ok(())
}
