//! Structural diff between a source tree and a target tree

use super::{
    KeyPath,
    TranslationNode,
    TranslationTree,
};

/// Content the target lacks plus keys the target should drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Subset of the source tree, shaped like the source.
    pub missing: TranslationTree,
    /// Target paths absent from the source, in target order.
    pub obsolete: Vec<KeyPath>,
}

impl TreeDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.obsolete.is_empty()
    }
}

/// Compute both halves of the diff at once.
#[must_use]
pub fn diff(source: &TranslationTree, target: &TranslationTree) -> TreeDiff {
    TreeDiff {
        missing: find_missing_content(source, target),
        obsolete: find_obsolete_keys(source, target),
    }
}

/// Collect source content that has no counterpart in `target`.
///
/// Leaves present on both sides count as translated even when the text
/// differs. A source subtree facing a target leaf is missing in full.
#[must_use]
pub fn find_missing_content(source: &TranslationTree, target: &TranslationTree) -> TranslationTree {
    let mut missing = TranslationTree::new();

    for (key, source_node) in source {
        match (source_node, target.get(key)) {
            (_, None) | (TranslationNode::Tree(_), Some(TranslationNode::Leaf(_))) => {
                missing.insert(key.clone(), source_node.clone());
            }
            (TranslationNode::Tree(source_child), Some(TranslationNode::Tree(target_child))) => {
                let nested = find_missing_content(source_child, target_child);
                if !nested.is_empty() {
                    missing.insert(key.clone(), nested);
                }
            }
            (TranslationNode::Leaf(_), Some(_)) => {}
        }
    }

    missing
}

/// Collect target paths that the source no longer defines.
///
/// A target subtree facing a source leaf is obsolete as a whole.
#[must_use]
pub fn find_obsolete_keys(source: &TranslationTree, target: &TranslationTree) -> Vec<KeyPath> {
    let mut obsolete = Vec::new();
    collect_obsolete(source, target, &KeyPath::root(), &mut obsolete);
    obsolete
}

fn collect_obsolete(
    source: &TranslationTree,
    target: &TranslationTree,
    prefix: &KeyPath,
    obsolete: &mut Vec<KeyPath>,
) {
    for (key, target_node) in target {
        let path = prefix.child(key);
        match (source.get(key), target_node) {
            (None, _) | (Some(TranslationNode::Leaf(_)), TranslationNode::Tree(_)) => {
                obsolete.push(path);
            }
            (Some(TranslationNode::Tree(source_child)), TranslationNode::Tree(target_child)) => {
                collect_obsolete(source_child, target_child, &path, obsolete);
            }
            (Some(_), TranslationNode::Leaf(_)) => {}
        }
    }
}
