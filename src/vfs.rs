use crate::{load, resolve, resolve_mut, segments, LoadError, Mode, Node, VfsError, VfsResult};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// In-memory snapshot of a physical directory.
///
/// Every path given to this type is treated as absolute; turning user input
/// into such paths is the caller's job (see `Cursor`).
#[derive(Debug)]
pub struct Vfs {
    root: Node,
    source: PathBuf,
}

impl Vfs {
    pub fn open(physical_root: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            root: load(physical_root)?,
            source: physical_root.to_owned(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns `(files, directories)`, root included.
    pub fn stats(&self) -> (usize, usize) {
        self.root.count()
    }

    #[instrument(skip(self))]
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        debug!("op: lookup()");

        resolve(&self.root, path).ok()
    }

    #[instrument(skip(self))]
    pub fn remove(&mut self, path: &str) -> VfsResult<()> {
        debug!("op: remove()");

        let mut parts: Vec<_> = segments(path).collect();

        let Some(name) = parts.pop() else {
            return Err(VfsError::RootProtected);
        };

        let parent_path = format!("/{}", parts.join("/"));

        let parent = resolve_mut(&mut self.root, &parent_path)
            .map_err(|_| VfsError::ParentNotFound(parent_path.clone()))?;

        // A file parent has nothing to remove from
        let children = parent
            .children_mut()
            .ok_or_else(|| VfsError::not_found(path, name))?;

        let target = children
            .get(name)
            .ok_or_else(|| VfsError::not_found(path, name))?;

        if target.children().is_some_and(|children| !children.is_empty()) {
            return Err(VfsError::NotEmpty(path.to_owned()));
        }

        children.shift_remove(name);

        Ok(())
    }

    #[instrument(skip(self))]
    pub fn chmod(&mut self, path: &str, mode: &str) -> VfsResult<Mode> {
        debug!("op: chmod()");

        let node = resolve_mut(&mut self.root, path)?;
        let mode = Mode::parse(mode)?;

        node.meta.mode = mode;

        Ok(mode)
    }
}
