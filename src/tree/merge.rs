//! Deep merge of translation trees

use super::{
    TranslationNode,
    TranslationTree,
};

/// Merge `overlay` into a copy of `base`.
///
/// Subtrees present on both sides are merged recursively. Anywhere else the
/// overlay value wins. Keys only in `base` are kept where they were; keys
/// only in `overlay` are appended.
#[must_use]
pub fn deep_merge(base: &TranslationTree, overlay: &TranslationTree) -> TranslationTree {
    let mut merged = base.clone();

    for (key, overlay_node) in overlay {
        let node = match (merged.get(key), overlay_node) {
            (Some(TranslationNode::Tree(base_child)), TranslationNode::Tree(overlay_child)) => {
                TranslationNode::Tree(deep_merge(base_child, overlay_child))
            }
            _ => overlay_node.clone(),
        };
        merged.insert(key.clone(), node);
    }

    merged
}
