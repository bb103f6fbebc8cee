mod inspect;
mod shell;

pub use self::inspect::*;
pub use self::shell::*;

use std::io;

fn init_tracing() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
}
