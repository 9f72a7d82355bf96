//! Copy-on-write tree surgery over the `signal` sequence.
//!
//! Every public operation takes the caller's sequence by shared reference
//! and returns a fresh one; nothing the caller holds is ever mutated. The
//! primary functions degrade to a no-op (returning an unchanged copy) when a
//! path is malformed, which is what drag-and-drop callers want. The `try_*`
//! variants report the reason instead.
//!
//! ```text
//!  move_item(root, [0], [2], After)
//!
//!  [S0, S1, S2] ──remove [0]──▸ [S1, S2] ──target [2]→[1]──▸ [S1, S2, S0]
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{SignalItem, WaveDocument};
use crate::path::TreePath;

/// Where a dropped item lands relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    /// Append to the target Group's children.
    Inside,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("path is empty")]
    EmptyPath,

    #[error("index {index} out of bounds at depth {depth} of {path}")]
    OutOfBounds {
        path: TreePath,
        depth: usize,
        index: usize,
    },

    #[error("item at {0} is not a group")]
    NotAGroup(TreePath),

    #[error("cannot move {from} into its own subtree at {to}")]
    IntoOwnDescendant { from: TreePath, to: TreePath },
}

// ---------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------

/// Resolve `path` against the root sequence.
pub fn item_at_path<'a>(root: &'a [SignalItem], path: &TreePath) -> Option<&'a SignalItem> {
    try_item_at_path(root, path).ok()
}

pub fn try_item_at_path<'a>(
    root: &'a [SignalItem],
    path: &TreePath,
) -> Result<&'a SignalItem, TreeError> {
    let (first, rest) = path
        .as_slice()
        .split_first()
        .ok_or(TreeError::EmptyPath)?;

    let mut item = root.get(*first).ok_or_else(|| TreeError::OutOfBounds {
        path: path.clone(),
        depth: 0,
        index: *first,
    })?;

    for (offset, index) in rest.iter().enumerate() {
        let SignalItem::Group(group) = item else {
            return Err(TreeError::NotAGroup(TreePath::from(
                &path.as_slice()[..=offset],
            )));
        };
        item = group.items.get(*index).ok_or_else(|| TreeError::OutOfBounds {
            path: path.clone(),
            depth: offset + 1,
            index: *index,
        })?;
    }

    Ok(item)
}

pub fn item_at_path_mut<'a>(
    root: &'a mut Vec<SignalItem>,
    path: &TreePath,
) -> Option<&'a mut SignalItem> {
    let (last, parent) = path.split_last()?;
    children_mut(root, parent, path).ok()?.get_mut(last)
}

/// Sequence that holds the children addressed by `parent`.
fn children_mut<'a>(
    root: &'a mut Vec<SignalItem>,
    parent: &[usize],
    full_path: &TreePath,
) -> Result<&'a mut Vec<SignalItem>, TreeError> {
    let mut items = root;
    for (depth, index) in parent.iter().enumerate() {
        items = match items.get_mut(*index) {
            Some(SignalItem::Group(group)) => &mut group.items,
            Some(_) => return Err(TreeError::NotAGroup(TreePath::from(&parent[..=depth]))),
            None => {
                return Err(TreeError::OutOfBounds {
                    path: full_path.clone(),
                    depth,
                    index: *index,
                })
            }
        };
    }
    Ok(items)
}

// ---------------------------------------------------------------
// In-place primitives (operate on a private clone)
// ---------------------------------------------------------------

fn remove_at(root: &mut Vec<SignalItem>, path: &TreePath) -> Result<SignalItem, TreeError> {
    let (last, parent) = path.split_last().ok_or(TreeError::EmptyPath)?;
    let siblings = children_mut(root, parent, path)?;
    if last >= siblings.len() {
        return Err(TreeError::OutOfBounds {
            path: path.clone(),
            depth: parent.len(),
            index: last,
        });
    }
    Ok(siblings.remove(last))
}

fn insert_at(
    root: &mut Vec<SignalItem>,
    target: &TreePath,
    item: SignalItem,
    position: DropPosition,
) -> Result<(), TreeError> {
    let Some((last, parent)) = target.split_last() else {
        match position {
            DropPosition::Before => root.insert(0, item),
            DropPosition::After | DropPosition::Inside => root.push(item),
        }
        return Ok(());
    };

    let siblings = children_mut(root, parent, target)?;
    let out_of_bounds = || TreeError::OutOfBounds {
        path: target.clone(),
        depth: parent.len(),
        index: last,
    };

    match position {
        DropPosition::Before | DropPosition::After => {
            if last >= siblings.len() {
                return Err(out_of_bounds());
            }
            let at = if position == DropPosition::Before { last } else { last + 1 };
            siblings.insert(at, item);
        }
        DropPosition::Inside => match siblings.get_mut(last) {
            Some(SignalItem::Group(group)) => group.items.push(item),
            Some(_) => return Err(TreeError::NotAGroup(target.clone())),
            None => return Err(out_of_bounds()),
        },
    }
    Ok(())
}

/// Re-aim `target` after the item at `source` has been removed.
///
/// Removing `source` shifts its later siblings down by one, so any target
/// that runs through one of those siblings is decremented at the source's
/// depth.
fn adjust_target(source: &TreePath, target: &TreePath) -> TreePath {
    let mut adjusted = target.clone();
    let Some((source_index, source_parent)) = source.split_last() else {
        return adjusted;
    };
    let depth = source_parent.len();
    let shares_parent = target.len() > depth && target.as_slice()[..depth] == *source_parent;
    if shares_parent && target.as_slice()[depth] > source_index {
        adjusted.indices_mut()[depth] -= 1;
    }
    adjusted
}

// ---------------------------------------------------------------
// Strict API
// ---------------------------------------------------------------

pub fn try_move_item(
    root: &[SignalItem],
    source: &TreePath,
    target: &TreePath,
    position: DropPosition,
) -> Result<Vec<SignalItem>, TreeError> {
    if source == target {
        return Ok(root.to_vec());
    }
    try_item_at_path(root, source)?;
    if target.starts_with(source) {
        return Err(TreeError::IntoOwnDescendant {
            from: source.clone(),
            to: target.clone(),
        });
    }

    let mut tree = root.to_vec();
    let item = remove_at(&mut tree, source)?;
    let target = adjust_target(source, target);
    insert_at(&mut tree, &target, item, position)?;
    Ok(tree)
}

pub fn try_insert_item(
    root: &[SignalItem],
    target: &TreePath,
    item: SignalItem,
    position: DropPosition,
) -> Result<Vec<SignalItem>, TreeError> {
    let mut tree = root.to_vec();
    insert_at(&mut tree, target, item, position)?;
    Ok(tree)
}

pub fn try_remove_item(
    root: &[SignalItem],
    path: &TreePath,
) -> Result<(Vec<SignalItem>, SignalItem), TreeError> {
    let mut tree = root.to_vec();
    let removed = remove_at(&mut tree, path)?;
    Ok((tree, removed))
}

// ---------------------------------------------------------------
// Forgiving API
// ---------------------------------------------------------------

/// Move the item at `source` next to (or into) the item at `target`.
///
/// Returns an unchanged copy of `root` when the paths are equal, when either
/// path does not resolve, when an `Inside` target is not a Group, or when
/// the target lies inside the moved item.
pub fn move_item(
    root: &[SignalItem],
    source: &TreePath,
    target: &TreePath,
    position: DropPosition,
) -> Vec<SignalItem> {
    try_move_item(root, source, target, position).unwrap_or_else(|e| {
        log::debug!("move {source} -> {target} ({position:?}) ignored: {e}");
        root.to_vec()
    })
}

pub fn insert_item(
    root: &[SignalItem],
    target: &TreePath,
    item: SignalItem,
    position: DropPosition,
) -> Vec<SignalItem> {
    try_insert_item(root, target, item, position).unwrap_or_else(|e| {
        log::debug!("insert at {target} ({position:?}) ignored: {e}");
        root.to_vec()
    })
}

/// Remove the item at `path`, returning the new root and the removed item.
pub fn remove_item(root: &[SignalItem], path: &TreePath) -> (Vec<SignalItem>, Option<SignalItem>) {
    match try_remove_item(root, path) {
        Ok((tree, removed)) => (tree, Some(removed)),
        Err(e) => {
            log::debug!("remove at {path} ignored: {e}");
            (root.to_vec(), None)
        }
    }
}

impl WaveDocument {
    pub fn item_at(&self, path: &TreePath) -> Option<&SignalItem> {
        item_at_path(&self.signal, path)
    }

    /// Document-level [`move_item`]; all non-signal sections are carried over.
    pub fn moved(&self, source: &TreePath, target: &TreePath, position: DropPosition) -> Self {
        self.with_signal(move_item(&self.signal, source, target, position))
    }

    pub fn inserted(&self, target: &TreePath, item: SignalItem, position: DropPosition) -> Self {
        self.with_signal(insert_item(&self.signal, target, item, position))
    }

    pub fn removed(&self, path: &TreePath) -> (Self, Option<SignalItem>) {
        let (signal, removed) = remove_item(&self.signal, path);
        (self.with_signal(signal), removed)
    }
}
