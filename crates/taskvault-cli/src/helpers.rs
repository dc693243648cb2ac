//! Small input helpers shared by the commands.

use std::io::{self, IsTerminal, Read};

use crate::errors::CliError;

/// Resolve a positional text argument, falling back to stdin when piped.
pub fn read_text_arg(text: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = text {
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        CliError::invalid_input("No text provided. Pass TEXT or pipe it via stdin.").exit()
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    // Strip the trailing newline a shell pipe appends; inner newlines stay.
    Ok(buffer
        .strip_suffix('\n')
        .map(|s| s.to_string())
        .unwrap_or(buffer))
}
