use crate::{Flow, Shell};
use anyhow::Result;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Replays commands from `path`, one per line, stopping at the first one
/// that fails.
///
/// Blank lines and `#` comments are skipped.
#[instrument(skip(shell))]
pub fn run_script<W: Write>(shell: &mut Shell<W>, path: &Path) -> Result<Flow> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            shell.print(format_args!("Script not found: {}", path.display()))?;
            return Ok(Flow::Continue);
        }

        Err(err) => {
            shell.print(format_args!("Error executing script: {}", err))?;
            return Ok(Flow::Continue);
        }
    };

    info!("executing script");
    shell.print(format_args!("Executing script: {}", path.display()))?;

    for line in source.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let prompt = shell.prompt();
        shell.print(format_args!("{}{}", prompt, line))?;

        if shell.execute(line)? == Flow::Exit {
            return Ok(Flow::Exit);
        }

        if shell.failed() {
            shell.print("Script stopped due to error")?;
            break;
        }
    }

    shell.print("Script execution completed")?;

    Ok(Flow::Continue)
}
