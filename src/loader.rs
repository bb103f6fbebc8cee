use crate::{LoadError, Meta, Mode, Node, NodeKind};
use std::fs::{self, Metadata};
use std::io::ErrorKind;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tracing::{info, instrument, trace, warn};

/// Materializes `physical_root` (recursively) as an in-memory tree.
///
/// Only a missing or non-directory root is fatal; unreadable entries below it
/// are reported through `tracing` and replaced with placeholders.
#[instrument]
pub fn load(physical_root: &Path) -> Result<Node, LoadError> {
    let metadata = match fs::metadata(physical_root) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(LoadError::NotFound(physical_root.to_owned()));
        }
        Err(err) => {
            // Exists, but can't be stat()-ed - e.g. a dangling symlink
            warn!("couldn't stat {}: {}", physical_root.display(), err);
            return Err(LoadError::NotFound(physical_root.to_owned()));
        }
    };

    if !metadata.is_dir() {
        return Err(LoadError::NotADirectory(physical_root.to_owned()));
    }

    info!("loading");

    let root = load_dir(physical_root, Some(&metadata), &mut Vec::new());
    let (files, dirs) = root.count();

    info!("loaded {} files, {} directories", files, dirs);

    Ok(root)
}

/// `ancestors` holds the `(dev, ino)` of every directory on the way down to
/// `path`; a child directory found there is a link back up and gets skipped.
fn load_dir(path: &Path, metadata: Option<&Metadata>, ancestors: &mut Vec<(u64, u64)>) -> Node {
    trace!("visiting directory: {}", path.display());

    let mut node = Node::dir(file_name(path), meta(path, metadata));
    let id = metadata.map(|metadata| (metadata.dev(), metadata.ino()));

    if let Some(id) = id {
        ancestors.push(id);
    }

    load_children(&mut node, path, ancestors);

    if id.is_some() {
        ancestors.pop();
    }

    node
}

fn load_children(node: &mut Node, path: &Path, ancestors: &mut Vec<(u64, u64)>) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("couldn't read directory {}: {}", path.display(), err);
            return;
        }
    };

    let mut entries: Vec<_> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("couldn't read entry of {}: {}", path.display(), err);
                None
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let child_path = entry.path();

        let child = match fs::metadata(&child_path) {
            Ok(metadata) if metadata.is_dir() => {
                if ancestors.contains(&(metadata.dev(), metadata.ino())) {
                    warn!("skipping link back to an ancestor: {}", child_path.display());
                    continue;
                }

                load_dir(&child_path, Some(&metadata), ancestors)
            }

            Ok(metadata) => load_file(&child_path, Some(&metadata)),

            Err(err) => {
                let is_link = fs::symlink_metadata(&child_path)
                    .map(|metadata| metadata.file_type().is_symlink())
                    .unwrap_or(false);

                if is_link {
                    warn!("skipping unresolvable link {}: {}", child_path.display(), err);
                    continue;
                }

                warn!("couldn't stat {}: {}", child_path.display(), err);
                load_file(&child_path, None)
            }
        };

        node.insert(child);
    }
}

fn load_file(path: &Path, metadata: Option<&Metadata>) -> Node {
    trace!("visiting file: {}", path.display());

    let name = file_name(path);

    if metadata.is_some_and(|metadata| !metadata.is_file()) {
        warn!("not a regular file: {}", path.display());

        return unreadable(name, path, "[ERROR: not a regular file]".into());
    }

    match fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes).into_owned();

            Node::file(name, meta(path, metadata), content)
        }

        Err(err) if err.kind() == ErrorKind::PermissionDenied => {
            warn!("permission denied reading file: {}", path.display());
            unreadable(name, path, "[PERMISSION DENIED]".into())
        }

        Err(err) => {
            warn!("couldn't read file {}: {}", path.display(), err);
            unreadable(name, path, format!("[ERROR: {}]", err))
        }
    }
}

fn unreadable(name: String, path: &Path, placeholder: String) -> Node {
    Node {
        name,
        meta: Meta {
            source: path.to_owned(),
            ..Default::default()
        },
        kind: NodeKind::File {
            content: placeholder,
            size: 0,
        },
    }
}

fn meta(path: &Path, metadata: Option<&Metadata>) -> Meta {
    match metadata {
        Some(metadata) => Meta {
            mode: Mode::from_bits(metadata.mode()),
            uid: metadata.uid(),
            gid: metadata.gid(),
            source: path.to_owned(),
        },

        None => Meta {
            source: path.to_owned(),
            ..Default::default()
        },
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
