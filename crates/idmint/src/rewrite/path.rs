//! Location of a value inside a document, built up during traversal.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// A borrowed chain of path segments from the document root.
///
/// Children point at their parent, so descending costs nothing until the
/// path is rendered (only when tracing is on).
#[derive(Debug, Clone, Copy)]
pub struct JsonPath<'a> {
    parent: Option<&'a JsonPath<'a>>,
    segment: Segment<'a>,
}

impl<'a> JsonPath<'a> {
    pub fn root() -> Self {
        Self {
            parent: None,
            segment: Segment::Root,
        }
    }

    pub fn key(&'a self, key: &'a str) -> JsonPath<'a> {
        JsonPath {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    pub fn index(&'a self, index: usize) -> JsonPath<'a> {
        JsonPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    /// Render as an RFC 6901 JSON pointer (`""` for the root).
    pub fn to_pointer(&self) -> String {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(node) = current {
            match node.segment {
                Segment::Root => {}
                Segment::Key(key) => segments.push(key.replace('~', "~0").replace('/', "~1")),
                Segment::Index(i) => segments.push(i.to_string()),
            }
            current = node.parent;
        }

        segments
            .iter()
            .rev()
            .fold(String::new(), |mut acc, s| {
                acc.push('/');
                acc.push_str(s);
                acc
            })
    }
}

impl fmt::Display for JsonPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_rendering() {
        let root = JsonPath::root();
        assert_eq!(root.to_pointer(), "");

        let docs = root.key("docs");
        let first = docs.index(0);
        let id = first.key("_id");
        assert_eq!(id.to_pointer(), "/docs/0/_id");
    }

    #[test]
    fn test_pointer_escaping() {
        let root = JsonPath::root();
        let odd = root.key("a/b~c");
        assert_eq!(odd.to_string(), "/a~1b~0c");
    }
}
