use crate::{Flow, Shell};
use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;
use tracing::warn;

pub fn run_repl<W: Write>(shell: &mut Shell<W>) -> Result<()> {
    let mut editor = DefaultEditor::new().context("couldn't create line editor")?;

    shell.print("Terminal emulator started. Type 'exit' to quit.")?;

    if shell.vfs().is_some() {
        shell.print("VFS enabled: ls, cd, pwd, cat, rm, chmod work with the virtual file system")?;
    }

    loop {
        match editor.readline(&shell.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = editor.add_history_entry(line.as_str()) {
                        warn!("couldn't add history entry: {}", err);
                    }
                }

                if shell.execute(&line)? == Flow::Exit {
                    break;
                }
            }

            Err(ReadlineError::Interrupted) => {
                shell.print("Use 'exit' to quit")?;
            }

            Err(ReadlineError::Eof) => {
                shell.print("Exiting...")?;
                break;
            }

            Err(err) => {
                return Err(err).context("couldn't read line");
            }
        }
    }

    Ok(())
}
