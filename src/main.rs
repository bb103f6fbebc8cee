mod audit;
mod cmds;
mod cursor;
mod error;
mod loader;
mod mode;
mod node;
mod repl;
mod resolver;
mod script;
mod shell;
mod vfs;

pub use self::audit::*;
pub use self::cmds::*;
pub use self::cursor::*;
pub use self::error::*;
pub use self::loader::*;
pub use self::mode::*;
pub use self::node::*;
pub use self::repl::*;
pub use self::resolver::*;
pub use self::script::*;
pub use self::shell::*;
pub use self::vfs::*;
use anyhow::Result;
use structopt::StructOpt;

/// vfsterm, a shell-like explorer for an in-memory snapshot of a directory
#[derive(Debug, StructOpt)]
enum Cmd {
    Inspect(InspectCmd),
    Shell(ShellCmd),
}

fn main() -> Result<()> {
    match Cmd::from_args() {
        Cmd::Inspect(cmd) => cmd.run(),
        Cmd::Shell(cmd) => cmd.run(),
    }
}
