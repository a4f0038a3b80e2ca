//! Tree reconstruction from the flat outline.

use super::entry::OutlineEntry;

/// An outline entry with its nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub entry: OutlineEntry,
    pub children: Vec<OutlineNode>,
}

/// Rebuild the tree from the level-tagged flat sequence.
///
/// Standard indent-stack reconstruction: each entry closes every open
/// ancestor whose level is `>=` its own, then nests under the remaining
/// top. Iterative, like every other tree walk here.
pub fn outline_tree(entries: &[OutlineEntry]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut open: Vec<OutlineNode> = Vec::new();

    for entry in entries {
        while open
            .last()
            .is_some_and(|top| top.entry.level >= entry.level)
        {
            if let Some(finished) = open.pop() {
                attach(&mut open, &mut roots, finished);
            }
        }
        open.push(OutlineNode {
            entry: entry.clone(),
            children: Vec::new(),
        });
    }

    while let Some(finished) = open.pop() {
        attach(&mut open, &mut roots, finished);
    }

    roots
}

fn attach(open: &mut [OutlineNode], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Span;
    use crate::outline::EntryKind;

    fn entry(label: &str, level: u32) -> OutlineEntry {
        OutlineEntry {
            label: label.to_string(),
            detail: String::new(),
            guid: None,
            level,
            range: Span::from_coords(0, 0, 0, 1),
            selection: Span::from_coords(0, 0, 0, 1),
            kind: EntryKind::Other,
        }
    }

    #[test]
    fn test_reconstructs_nesting() {
        let entries = vec![
            entry("section", 0),
            entry("group", 1),
            entry("op1", 2),
            entry("op2", 2),
            entry("section2", 0),
            entry("op3", 1),
        ];

        let tree = outline_tree(&entries);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].entry.label, "section");
        assert_eq!(tree[0].children.len(), 1);
        let group = &tree[0].children[0];
        assert_eq!(group.entry.label, "group");
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].entry.label, "op1");
        assert_eq!(group.children[1].entry.label, "op2");
        assert_eq!(tree[1].children[0].entry.label, "op3");
    }

    #[test]
    fn test_level_gaps_nest_under_closest_shallower() {
        // merged groups leave gaps: 0 → 2 still nests under 0
        let entries = vec![entry("a", 0), entry("b", 2), entry("c", 2)];
        let tree = outline_tree(&entries);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(outline_tree(&[]).is_empty());
    }
}
