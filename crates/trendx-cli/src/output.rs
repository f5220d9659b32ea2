use std::io::{self, Write};

use serde_json::Value;
use trendx_core::Envelope;

use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{payload}")?;
    Ok(())
}
