//! Output formatting utilities

use anyhow::{Context, Result};
use colored::Colorize;
use crate::HealthError;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonPretty,
    Table,
}

impl OutputFormat {
    /// Parse a `--format` value; unknown names fall back to pretty JSON
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "json-pretty" => Self::JsonPretty,
            "table" => Self::Table,
            _ => Self::JsonPretty,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(io::stdout().is_terminal()),
    }
}

/// Format an error for display, with its cause chain
pub fn format_error(error: &anyhow::Error) -> String {
    let mut out = format!("{} {}", "Error:".red().bold(), error);
    for cause in error.chain().skip(1) {
        out.push_str(&format!("\n  {} {}", "caused by:".yellow(), cause));
    }
    if let Some(help) = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<HealthError>())
        .and_then(|health| health.code().info().help)
    {
        out.push_str(&format!("\n  {} {}", "help:".cyan(), help));
    }
    out
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!("{}", format_success(&format!("Output written to {}", path.display())));
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Serialize a report as JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

#[derive(Tabled)]
struct KeyValue {
    #[tabled(rename = "Field")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column table of `(field, value)` rows
pub fn key_value_table<K, V>(rows: impl IntoIterator<Item = (K, V)>) -> String
where
    K: Into<String>,
    V: Into<String>,
{
    let rows: Vec<KeyValue> = rows
        .into_iter()
        .map(|(k, v)| KeyValue {
            key: k.into(),
            value: v.into(),
        })
        .collect();
    Table::new(rows).with(Style::modern()).to_string()
}

/// Render any tabled rows with the shared style
pub fn rows_table<R: Tabled>(rows: impl IntoIterator<Item = R>) -> String {
    Table::new(rows).with(Style::modern()).to_string()
}

/// Flatten a JSON object into a key/value table
pub fn format_as_table(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => Some(key_value_table(obj.iter().map(|(k, v)| (k.clone(), format_value(v))))),
        _ => None,
    }
}

/// Format a simple value for display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) if arr.is_empty() => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(obj) => format!("{{}} with {} fields", obj.len()),
    }
}

/// Optional number with fixed decimals, `-` when absent
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

/// Print a report in the requested format; `table` renders the table view
pub fn print_report<T: Serialize>(
    report: &T,
    format: OutputFormat,
    output_file: Option<&Path>,
    table: impl FnOnce(&T) -> String,
) -> Result<()> {
    let content = match format {
        OutputFormat::Json => format_json(report, false)?,
        OutputFormat::JsonPretty => format_json(report, true)?,
        OutputFormat::Table => table(report),
    };
    write_output(&content, output_file)
}
