//! JSON I/O handling for CLI
//!
//! - Filter arguments: inline JSON, or `@path` naming a JSON file
//! - Output: pretty JSON or text on stdout, UTF-8 only

use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Parses a filter argument; a missing argument is an empty form.
pub fn read_filter(arg: Option<&str>) -> CliResult<Value> {
    let Some(arg) = arg else {
        return Ok(Value::Object(Default::default()));
    };

    let content = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::invalid_filter(format!("cannot read {}: {}", path, e)))?,
        None => arg.to_string(),
    };

    let value: Value = serde_json::from_str(&content)
        .map_err(|e| CliError::invalid_filter(format!("invalid JSON: {}", e)))?;
    if !value.is_object() {
        return Err(CliError::invalid_filter("filter must be a JSON object"));
    }
    Ok(value)
}

/// Write a value to stdout as pretty JSON
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)
        .map_err(|e| CliError::io_error(format!("JSON error: {}", e)))?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
