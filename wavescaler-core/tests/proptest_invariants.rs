//! Property tests for history and tree-editor invariants.
//!
//! Validates:
//! - Equal consecutive saves never add an entry.
//! - `n` distinct saves, `n-1` undos and `n-1` redos land on the last save.
//! - Capacity is never exceeded and the newest state is always kept.
//! - `move_item` never mutates its input and preserves the item count.

use proptest::prelude::*;

use wavescaler_core::{
    move_item, DropPosition, Group, HistoryManager, Signal, SignalItem, TreePath, WaveDocument,
};

// ============================================================================
// Strategy helpers
// ============================================================================

fn wave_strategy() -> impl Strategy<Value = String> {
    "[01x.=]{1,8}"
}

fn leaf_strategy() -> impl Strategy<Value = SignalItem> {
    prop_oneof![
        4 => ("[a-z]{1,4}", wave_strategy())
            .prop_map(|(name, wave)| SignalItem::Signal(Signal::new(name, wave))),
        1 => Just(SignalItem::Spacer),
    ]
}

fn item_strategy() -> impl Strategy<Value = SignalItem> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        ("[A-Z]{1,3}", prop::collection::vec(inner, 0..4))
            .prop_map(|(name, items)| SignalItem::Group(Group { name, items }))
    })
}

fn tree_strategy() -> impl Strategy<Value = Vec<SignalItem>> {
    prop::collection::vec(item_strategy(), 1..6)
}

fn path_strategy() -> impl Strategy<Value = TreePath> {
    prop::collection::vec(0usize..5, 0..3).prop_map(TreePath::from)
}

fn position_strategy() -> impl Strategy<Value = DropPosition> {
    prop_oneof![
        Just(DropPosition::Before),
        Just(DropPosition::After),
        Just(DropPosition::Inside),
    ]
}

fn count_items(items: &[SignalItem]) -> usize {
    items
        .iter()
        .map(|item| match item {
            SignalItem::Group(group) => 1 + count_items(&group.items),
            _ => 1,
        })
        .sum()
}

fn numbered(n: usize) -> WaveDocument {
    WaveDocument::with_signals([Signal::new("s", format!("{n:b}")).into()])
}

// ============================================================================
// History
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn duplicate_saves_collapse(items in tree_strategy(), repeats in 1usize..5) {
        let doc = WaveDocument::with_signals(items);
        let mut history = HistoryManager::default();
        for _ in 0..repeats {
            history.save_state(&doc, None);
        }
        prop_assert_eq!(history.len(), 1);
    }

    #[test]
    fn undo_then_redo_returns_to_last(n in 2usize..40) {
        let mut history = HistoryManager::default();
        for i in 0..n {
            history.save_state(&numbered(i), None);
        }
        for _ in 0..n - 1 {
            prop_assert!(history.undo().is_some());
        }
        prop_assert!(history.undo().is_none());

        let mut last = None;
        for _ in 0..n - 1 {
            last = history.redo();
        }
        prop_assert_eq!(last, Some(numbered(n - 1)));
        prop_assert!(history.redo().is_none());
    }

    #[test]
    fn capacity_keeps_newest(capacity in 1usize..20, extra in 0usize..20) {
        let mut history = HistoryManager::with_capacity(capacity);
        let total = capacity + extra;
        for i in 0..total {
            history.save_state(&numbered(i), None);
            prop_assert!(history.len() <= capacity);
        }
        prop_assert_eq!(history.len(), capacity);
        prop_assert_eq!(history.current_index(), Some(capacity - 1));
        let first = history.entries().next().map(|e| e.snapshot.clone());
        prop_assert_eq!(first, Some(numbered(extra)));
        prop_assert_eq!(history.current().map(|e| e.snapshot.clone()), Some(numbered(total - 1)));
    }
}

// ============================================================================
// Tree editor
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn move_never_mutates_input(
        root in tree_strategy(),
        source in path_strategy(),
        target in path_strategy(),
        position in position_strategy(),
    ) {
        let before = root.clone();
        let moved = move_item(&root, &source, &target, position);
        prop_assert_eq!(&root, &before);
        prop_assert_eq!(count_items(&moved), count_items(&root));
    }

    #[test]
    fn move_to_same_path_is_identity(
        root in tree_strategy(),
        path in path_strategy(),
        position in position_strategy(),
    ) {
        prop_assert_eq!(move_item(&root, &path, &path, position), root);
    }
}
