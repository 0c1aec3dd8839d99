//! Removal of key paths from a translation tree

use super::{
    KeyPath,
    TranslationNode,
    TranslationTree,
};

/// Return a copy of `tree` without the nodes named by `paths`.
///
/// A path whose prefix is missing or runs into a leaf is skipped, so pruning
/// is idempotent.
#[must_use]
pub fn remove_keys(tree: &TranslationTree, paths: &[KeyPath]) -> TranslationTree {
    let mut pruned = tree.clone();
    for path in paths {
        if !remove_path(&mut pruned, path) {
            tracing::trace!(path = %path, "Key already absent");
        }
    }
    pruned
}

fn remove_path(tree: &mut TranslationTree, path: &KeyPath) -> bool {
    let Some((last, parents)) = path.segments().split_last() else {
        return false;
    };

    let mut current = tree;
    for segment in parents {
        match current.get_mut(segment) {
            Some(TranslationNode::Tree(child)) => current = child,
            _ => return false,
        }
    }

    current.remove(last).is_some()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::tree::{
        find_obsolete_keys,
        tree,
    };

    fn keys(paths: &[&str]) -> Vec<KeyPath> {
        paths.iter().map(|p| KeyPath::from(*p)).collect()
    }

    #[googletest::test]
    fn test_remove_nested_and_top_level() {
        let t = tree(json!({ "a": { "b": "1", "c": "2" }, "d": "3" }));

        let pruned = remove_keys(&t, &keys(&["a.c", "d"]));

        expect_that!(pruned == tree(json!({ "a": { "b": "1" } })), eq(true));
    }

    #[rstest]
    #[case::through_leaf(&["a.b.c"])]
    #[case::missing_prefix(&["x.y"])]
    #[case::missing_leaf(&["a.z"])]
    #[case::root(&[""])]
    fn test_unreachable_paths_are_noops(#[case] paths: &[&str]) {
        let t = tree(json!({ "a": { "b": "1" } }));

        assert_eq!(remove_keys(&t, &keys(paths)), t);
    }

    #[googletest::test]
    fn test_remove_is_idempotent() {
        let t = tree(json!({ "a": { "b": "1", "c": { "d": "2" } }, "e": "3" }));
        let paths = keys(&["a.c", "e", "a.c.d"]);

        let once = remove_keys(&t, &paths);
        let twice = remove_keys(&once, &paths);

        expect_that!(once == twice, eq(true));
        expect_that!(once == tree(json!({ "a": { "b": "1" } })), eq(true));
    }

    #[googletest::test]
    fn test_remove_leaves_input_untouched() {
        let t = tree(json!({ "a": "1" }));

        let pruned = remove_keys(&t, &keys(&["a"]));

        expect_that!(pruned.is_empty(), eq(true));
        expect_that!(t.contains_key("a"), eq(true));
    }

    #[googletest::test]
    fn test_pruning_obsolete_keys_aligns_with_source() {
        let s = tree(json!({ "a": { "b": "1" }, "menu": "Menu" }));
        let t = tree(json!({
            "a": { "b": "x", "old": "o" },
            "menu": { "open": "Ouvrir" },
            "gone": { "deep": "d" }
        }));

        let pruned = remove_keys(&t, &find_obsolete_keys(&s, &t));

        expect_that!(pruned == tree(json!({ "a": { "b": "x" } })), eq(true));
        expect_that!(find_obsolete_keys(&s, &pruned).is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_keys_with_separator_characters_are_addressed_by_segment() {
        let t = tree(json!({ "a.b": { "c": "1" }, "a": { "b": { "c": "2" } } }));

        let pruned = remove_keys(&t, &[KeyPath::new(["a.b", "c"])]);

        expect_that!(pruned == tree(json!({ "a.b": {}, "a": { "b": { "c": "2" } } })), eq(true));
    }
}
