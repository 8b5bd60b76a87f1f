pub mod files;
pub mod table;

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Write `value` to stdout as indented JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
