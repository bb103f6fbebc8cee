use std::fmt;
use std::path::PathBuf;
use tracing::debug;

pub type VfsResult<T> = Result<T, VfsError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VfsError {
    RootProtected,
    NotFound { path: String, segment: String },
    ParentNotFound(String),
    NotEmpty(String),
    InvalidMode(String),
}

impl VfsError {
    pub fn not_found(path: &str, segment: &str) -> Self {
        VfsError::NotFound {
            path: path.to_owned(),
            segment: segment.to_owned(),
        }
    }

    pub fn log(&self) {
        match self {
            VfsError::RootProtected => debug!("... root is protected"),
            VfsError::NotFound { segment, .. } => debug!("... not found (at `{}`)", segment),
            VfsError::ParentNotFound(_) => debug!("... parent not found"),
            VfsError::NotEmpty(_) => debug!("... directory not empty"),
            VfsError::InvalidMode(_) => debug!("... invalid mode"),
        }
    }
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::RootProtected => write!(f, "Cannot remove root directory"),
            VfsError::NotFound { path, .. } => write!(f, "File or directory not found: {}", path),
            VfsError::ParentNotFound(path) => write!(f, "Parent directory not found: {}", path),
            VfsError::NotEmpty(path) => write!(f, "Directory not empty: {}", path),
            VfsError::InvalidMode(mode) => write!(f, "Invalid mode format: {}", mode),
        }
    }
}

impl std::error::Error for VfsError {}

/// Fatal error raised while constructing the tree; nothing below the root
/// can produce one of these.
#[derive(Debug)]
pub enum LoadError {
    NotFound(PathBuf),
    NotADirectory(PathBuf),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "VFS path not found: {}", path.display()),
            LoadError::NotADirectory(path) => {
                write!(f, "VFS path is not a directory: {}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}
