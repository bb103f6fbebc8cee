use crate::segments;

/// Current position within the tree, kept as an absolute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    path: String,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { path: "/".into() }
    }
}

impl Cursor {
    pub fn get(&self) -> &str {
        &self.path
    }

    pub fn set(&mut self, path: String) {
        self.path = path;
    }

    /// Rewrites a user-supplied argument into an absolute path:
    ///
    /// - `~` and the empty string go to the root,
    /// - `.` stays where we are, `..` goes one level up (no-op at the root),
    /// - a leading `/` is taken as-is,
    /// - anything else is appended to the current path.
    ///
    /// `.`/`..` segments embedded within longer paths are folded the same way,
    /// so the result never contains them.
    pub fn absolute(&self, arg: &str) -> String {
        let joined = match arg {
            "" | "~" => return "/".into(),
            "." => self.path.clone(),
            _ if arg.starts_with('/') => arg.to_owned(),
            _ => format!("{}/{}", self.path.trim_end_matches('/'), arg),
        };

        let mut parts = Vec::new();

        for segment in segments(&joined) {
            match segment {
                "." => {}
                ".." => {
                    parts.pop();
                }
                _ => parts.push(segment),
            }
        }

        format!("/{}", parts.join("/"))
    }
}
