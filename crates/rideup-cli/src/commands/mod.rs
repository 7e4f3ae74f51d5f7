pub mod config;
pub mod edit;
pub mod reconcile;
pub mod show;
pub mod signup;
pub mod watch;

use anyhow::Result;
use serde::Serialize;

/// Prints `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
