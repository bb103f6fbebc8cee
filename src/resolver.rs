use crate::{Node, VfsError, VfsResult};

/// Splits a virtual path into its non-empty segments.
///
/// `.` and `..` are not interpreted here; they're looked up like any other
/// name.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

pub fn resolve<'a>(root: &'a Node, path: &str) -> VfsResult<&'a Node> {
    let mut node = root;

    for segment in segments(path) {
        node = node
            .children()
            .and_then(|children| children.get(segment))
            .ok_or_else(|| VfsError::not_found(path, segment))?;
    }

    Ok(node)
}

pub fn resolve_mut<'a>(root: &'a mut Node, path: &str) -> VfsResult<&'a mut Node> {
    let mut node = root;

    for segment in segments(path) {
        node = node
            .children_mut()
            .and_then(|children| children.get_mut(segment))
            .ok_or_else(|| VfsError::not_found(path, segment))?;
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Meta;

    fn tree() -> Node {
        let mut a = Node::dir("a", Meta::default());
        a.insert(Node::file("b.txt", Meta::default(), "hi".into()));

        let mut root = Node::dir("", Meta::default());
        root.insert(a);
        root
    }

    #[test]
    fn root() {
        let root = tree();

        for path in ["", "/", "//"] {
            assert!(std::ptr::eq(&root, resolve(&root, path).unwrap()));
        }
    }

    #[test]
    fn nested() {
        let root = tree();

        assert_eq!(Some("hi"), resolve(&root, "/a/b.txt").unwrap().content());
        assert_eq!(Some("hi"), resolve(&root, "a/b.txt").unwrap().content());
        assert_eq!(Some("hi"), resolve(&root, "/a//b.txt/").unwrap().content());
        assert!(resolve(&root, "/a").unwrap().is_dir());
    }

    #[test]
    fn missing() {
        let root = tree();

        assert_eq!(
            Err(VfsError::not_found("/a/nope/deeper", "nope")),
            resolve(&root, "/a/nope/deeper").map(|node| node.name.clone())
        );

        // a file has no children to descend into
        assert_eq!(
            Err(VfsError::not_found("/a/b.txt/x", "x")),
            resolve(&root, "/a/b.txt/x").map(|node| node.name.clone())
        );

        assert!(resolve(&root, "/a/../a/b.txt").is_err());
        assert!(resolve(&root, "/./a").is_err());
    }

    #[test]
    fn mutable() {
        let mut root = tree();

        resolve_mut(&mut root, "/a/b.txt").unwrap().name = "renamed".into();

        assert_eq!("renamed", resolve(&root, "/a/b.txt").unwrap().name);
    }
}
