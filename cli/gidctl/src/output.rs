//! Output formatting for CLI commands.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
}

/// One row of a single-record table.
#[derive(Debug, Tabled)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: &'static str,

    #[tabled(rename = "Value")]
    pub value: String,
}

impl FieldRow {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Print data in the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No items found.".dimmed());
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = format_json(data, "[]");
            println!("{}", json);
        }
    }
}

/// Print a single record: a field/value table, or the serialized record.
pub fn print_single<T: Serialize>(data: &T, rows: Vec<FieldRow>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let table = Table::new(rows).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            let json = format_json(data, "{}");
            println!("{}", json);
        }
    }
}

/// Print a bare value. JSON output wraps it in an object under `key`.
pub fn print_value(key: &str, value: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", value),
        OutputFormat::Json => {
            let json = format_json(&serde_json::json!({ key: value }), "{}");
            println!("{}", json);
        }
    }
}

fn format_json<T: Serialize + ?Sized>(data: &T, fallback: &str) -> String {
    let value = serde_json::to_value(data).unwrap_or_else(|_| serde_json::json!({}));
    let sorted = sort_json_value(value);
    serde_json::to_string_pretty(&sorted).unwrap_or_else(|_| fallback.to_string())
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(values) => {
            serde_json::Value::Array(values.into_iter().map(sort_json_value).collect())
        }
        serde_json::Value::Object(entries) => {
            let mut pairs: Vec<_> = entries.into_iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut mapped = serde_json::Map::new();
            for (key, value) in pairs {
                mapped.insert(key, sort_json_value(value));
            }
            serde_json::Value::Object(mapped)
        }
        other => other,
    }
}
