// Output formatting for CLI

use anyhow::Result;
use serde_json::Value;
use std::io::Write;

use super::config::OutputFormat;

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output one report
    pub fn output(&self, report: &Value, writer: &mut impl Write) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(report)?)?;
            }
            OutputFormat::KeyValue => {
                for (key, value) in flatten(report) {
                    writeln!(writer, "{}: {}", key, value)?;
                }
            }
            OutputFormat::Table => {
                let rows = flatten(report);
                let max_key_len = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
                for (key, value) in &rows {
                    writeln!(writer, "{:<width$} {}", format!("{}:", key), value, width = max_key_len + 1)?;
                }
                writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
            }
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

/// Flatten nested objects and arrays into dotted keys
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(String::new(), value, &mut rows);
    rows
}

fn flatten_into(prefix: String, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(obj) if !obj.is_empty() => {
            for (key, child) in obj {
                flatten_into(child_key(&prefix, key), child, rows);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (index, child) in arr.iter().enumerate() {
                flatten_into(child_key(&prefix, &index.to_string()), child, rows);
            }
        }
        other => rows.push((prefix, format_value(other))),
    }
}

fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Format a scalar JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}
