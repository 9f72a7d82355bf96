//! Index-path addressing into the nested signal tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequence of child indices descending through Groups.
///
/// `[2]` is the third root-level item; `[2, 0]` is the first child of that
/// item, which must be a Group. The empty path denotes the root sequence
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreePath(Vec<usize>);

impl TreePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the containing sequence, or `None` for the root.
    pub fn parent(&self) -> Option<TreePath> {
        self.0.split_last().map(|(_, parent)| Self(parent.to_vec()))
    }

    pub fn child(&self, index: usize) -> TreePath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// True when `prefix` addresses this item or one of its ancestors.
    pub fn starts_with(&self, prefix: &TreePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn split_last(&self) -> Option<(usize, &[usize])> {
        self.0.split_last().map(|(last, parent)| (*last, parent))
    }

    pub(crate) fn indices_mut(&mut self) -> &mut [usize] {
        &mut self.0
    }
}

impl From<Vec<usize>> for TreePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for TreePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for TreePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}

/// Parse error for the dotted path notation (`0.2.1`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tree path segment '{segment}'")]
pub struct ParsePathError {
    pub segment: String,
}

impl FromStr for TreePath {
    type Err = ParsePathError;

    /// Accepts dotted (`0.2.1`) or slash-separated (`0/2/1`) indices; the
    /// empty string is the root path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split(['.', '/'])
            .map(|segment| {
                segment.trim().parse::<usize>().map_err(|_| ParsePathError {
                    segment: segment.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_and_child() {
        let path = TreePath::from([1, 3]);
        assert_eq!(path.parent(), Some(TreePath::from([1])));
        assert_eq!(path.child(0), TreePath::from([1, 3, 0]));
        assert_eq!(TreePath::root().parent(), None);
    }

    #[test]
    fn test_starts_with() {
        let path = TreePath::from([1, 3, 2]);
        assert!(path.starts_with(&TreePath::from([1, 3])));
        assert!(path.starts_with(&TreePath::root()));
        assert!(!path.starts_with(&TreePath::from([1, 2])));
    }

    #[test]
    fn test_parse_and_display() {
        let path: TreePath = "0.2.1".parse().unwrap();
        assert_eq!(path, TreePath::from([0, 2, 1]));
        assert_eq!("4/5".parse::<TreePath>().unwrap(), TreePath::from([4, 5]));
        assert_eq!("".parse::<TreePath>().unwrap(), TreePath::root());
        assert_eq!(path.to_string(), "[0, 2, 1]");
        assert!("1.x".parse::<TreePath>().is_err());
    }
}
