use crate::Mode;
use indexmap::IndexMap;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub meta: Meta,
    pub kind: NodeKind,
}

/// Metadata captured from the physical entry at load time.
///
/// This is a snapshot: nothing ever re-reads it from disk.
#[derive(Clone, Debug, Default)]
pub struct Meta {
    pub mode: Mode,
    pub uid: u32,
    pub gid: u32,
    pub source: PathBuf,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    File { content: String, size: u64 },
    Directory { children: IndexMap<String, Node> },
}

impl Node {
    pub fn file(name: impl Into<String>, meta: Meta, content: String) -> Self {
        let size = content.len() as u64;

        Self {
            name: name.into(),
            meta,
            kind: NodeKind::File { content, size },
        }
    }

    pub fn dir(name: impl Into<String>, meta: Meta) -> Self {
        Self {
            name: name.into(),
            meta,
            kind: NodeKind::Directory {
                children: Default::default(),
            },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn children(&self) -> Option<&IndexMap<String, Node>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content, .. } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { size, .. } => *size,
            NodeKind::Directory { .. } => 0,
        }
    }

    /// Inserts `child` under its own name, replacing any previous entry with
    /// that name; returns `false` (and drops `child`) for files.
    pub fn insert(&mut self, child: Node) -> bool {
        match self.children_mut() {
            Some(children) => {
                children.insert(child.name.clone(), child);
                true
            }
            None => false,
        }
    }

    /// Returns `(files, directories)` in this subtree, including `self`.
    pub fn count(&self) -> (usize, usize) {
        match &self.kind {
            NodeKind::File { .. } => (1, 0),
            NodeKind::Directory { children } => {
                children
                    .values()
                    .map(Node::count)
                    .fold((0, 1), |(files, dirs), (f, d)| (files + f, dirs + d))
            }
        }
    }
}
