use super::init_tracing;
use crate::{run_repl, run_script, AuditLog, Flow, Shell, Vfs};
use anyhow::Result;
use std::env;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct ShellCmd {
    /// Path to the directory to load as the virtual file system; when
    /// missing (or unloadable), the shell runs without one
    #[structopt(long)]
    vfs: Option<PathBuf>,

    /// Path to the CSV audit log; recreated on each start
    #[structopt(short, long)]
    logfile: Option<PathBuf>,

    /// Path to a script to execute before going interactive
    #[structopt(short, long)]
    script: Option<PathBuf>,

    /// Exit after the script instead of starting the interactive prompt
    #[structopt(long)]
    batch: bool,
}

impl ShellCmd {
    pub fn run(self) -> Result<()> {
        init_tracing();

        let audit = self
            .logfile
            .as_deref()
            .map(AuditLog::create)
            .transpose()?;

        let vfs = self.vfs.as_deref().and_then(|path| match Vfs::open(path) {
            Ok(vfs) => {
                println!("VFS loaded successfully from: {}", path.display());
                Some(vfs)
            }

            Err(err) => {
                println!("Error loading VFS: {}", err);
                println!("Running without VFS support");
                None
            }
        });

        let mut shell = Shell::new(vfs, current_user(), audit, io::stdout());

        if let Some(script) = &self.script {
            if run_script(&mut shell, script)? == Flow::Exit {
                return Ok(());
            }
        }

        if self.batch {
            return Ok(());
        }

        run_repl(&mut shell)
    }
}

fn current_user() -> String {
    match env::var("USER") {
        Ok(user) if !user.is_empty() => user,
        _ => format!("uid{}", unsafe { libc::getuid() }),
    }
}
