use super::init_tracing;
use crate::{load, Node};
use anyhow::{Context, Result};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct InspectCmd {
    /// Path to the directory to load
    src: PathBuf,

    /// When set, shows just the node at this virtual path
    #[structopt(short, long)]
    path: Option<String>,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        init_tracing();

        let root = load(&self.src)
            .with_context(|| format!("couldn't load: {}", self.src.display()))?;

        let (name, node) = match &self.path {
            Some(path) => (path.as_str(), crate::resolve(&root, path)?),
            None => ("/", &root),
        };

        let mut lines = Vec::new();

        render(node, name, 0, &mut lines);

        for line in lines {
            println!("{}", line);
        }

        Ok(())
    }
}

fn render(node: &Node, name: &str, depth: usize, lines: &mut Vec<String>) {
    let size = if node.is_dir() {
        "-".to_owned()
    } else {
        node.size().to_string()
    };

    lines.push(format!(
        "{}{} {:>5} {:>5} {:>8}  {}{}{}",
        if node.is_dir() { 'd' } else { '-' },
        node.meta.mode,
        node.meta.uid,
        node.meta.gid,
        size,
        "  ".repeat(depth),
        name,
        if node.is_dir() && name != "/" { "/" } else { "" },
    ));

    for (child_name, child) in node.children().into_iter().flatten() {
        render(child, child_name, depth + 1, lines);
    }
}
