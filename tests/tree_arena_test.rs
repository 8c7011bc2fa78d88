//! Tests for TreeArena structural edits
//!
//! Covers the mutation contract shared by every editable hierarchy:
//! duplicate keeps structure with fresh ids, reparent never creates cycles,
//! unnest keeps subtrees intact, remove tolerates stale selections.

use std::collections::HashSet;

use rstest::rstest;

use kernrig::domain::{DomainError, NodeId, TreeArena};
use kernrig::util::testing;

/// A: [a1: [x], a2], B: [b1]
fn sample() -> (TreeArena<String>, Vec<NodeId>) {
    testing::init_test_setup();
    let mut tree = TreeArena::new();
    let a = tree.add(None, "A".to_string()).unwrap();
    let a1 = tree.add(Some(a), "a1".to_string()).unwrap();
    let x = tree.add(Some(a1), "x".to_string()).unwrap();
    let a2 = tree.add(Some(a), "a2".to_string()).unwrap();
    let b = tree.add(None, "B".to_string()).unwrap();
    let b1 = tree.add(Some(b), "b1".to_string()).unwrap();
    (tree, vec![a, a1, x, a2, b, b1])
}

fn labels(tree: &TreeArena<String>, ids: &[NodeId]) -> Vec<String> {
    ids.iter().map(|id| tree.get(*id).unwrap().clone()).collect()
}

/// Structure of a subtree as (depth, label) in pre-order.
fn shape(tree: &TreeArena<String>, id: NodeId) -> Vec<(usize, String)> {
    fn walk(tree: &TreeArena<String>, id: NodeId, depth: usize, out: &mut Vec<(usize, String)>) {
        out.push((depth, tree.get(id).unwrap().clone()));
        for child in tree.children(id).unwrap() {
            walk(tree, *child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tree, id, 0, &mut out);
    out
}

// ============================================================
// add
// ============================================================

#[test]
fn given_unknown_parent_when_adding_then_not_found() {
    let (mut tree, ids) = sample();
    let b = ids[4];
    tree.remove(&[b]);

    let result = tree.add(Some(b), "orphan".to_string());

    assert_eq!(result, Err(DomainError::NotFound(b)));
}

#[test]
fn given_parent_when_adding_then_appended_last() {
    let (mut tree, ids) = sample();
    let a = ids[0];

    let a3 = tree.add(Some(a), "a3".to_string()).unwrap();

    assert_eq!(tree.children(a).unwrap().last(), Some(&a3));
    assert_eq!(tree.parent(a3).unwrap(), Some(a));
}

// ============================================================
// duplicate
// ============================================================

#[test]
fn given_subtree_when_duplicating_then_same_shape_with_disjoint_ids() {
    let (mut tree, ids) = sample();
    let a = ids[0];

    let clones = tree.duplicate(&[a]).unwrap();
    let clone = clones[0];

    assert_eq!(shape(&tree, clone), shape(&tree, a));
    let original: HashSet<_> = tree.subtree(a).into_iter().collect();
    let copied: HashSet<_> = tree.subtree(clone).into_iter().collect();
    assert!(original.is_disjoint(&copied));
    assert_eq!(copied.len(), 4);
}

#[test]
fn given_nested_node_when_duplicating_then_clone_follows_original() {
    let (mut tree, ids) = sample();
    let (a, a1, a2) = (ids[0], ids[1], ids[3]);

    let clones = tree.duplicate(&[a1]).unwrap();

    assert_eq!(tree.children(a).unwrap(), &[a1, clones[0], a2]);
    assert_eq!(tree.parent(clones[0]).unwrap(), Some(a));
}

#[test]
fn given_root_node_when_duplicating_then_clone_is_root_level() {
    let (mut tree, ids) = sample();
    let (a, b) = (ids[0], ids[4]);

    let clones = tree.duplicate(&[a]).unwrap();

    assert_eq!(tree.roots(), &[a, clones[0], b]);
    assert_eq!(tree.parent(clones[0]).unwrap(), None);
}

#[test]
fn given_clone_when_editing_then_original_untouched() {
    let (mut tree, ids) = sample();
    let a = ids[0];
    let before = shape(&tree, a);

    let clone = tree.duplicate(&[a]).unwrap()[0];
    *tree.get_mut(clone).unwrap() = "A copy".to_string();
    let first_child = tree.children(clone).unwrap()[0];
    tree.remove(&[first_child]);

    assert_eq!(shape(&tree, a), before);
}

// ============================================================
// reparent
// ============================================================

#[rstest]
#[case::onto_itself(0, 0)]
#[case::onto_child(0, 1)]
#[case::onto_grandchild(0, 2)]
fn given_cyclic_target_when_reparenting_then_invalid_and_unchanged(
    #[case] node: usize,
    #[case] target: usize,
) {
    let (mut tree, ids) = sample();
    let before: Vec<_> = tree.roots().iter().map(|r| shape(&tree, *r)).collect();

    let result = tree.reparent(ids[node], ids[target], None);

    assert!(matches!(result, Err(DomainError::InvalidOperation(_))));
    let after: Vec<_> = tree.roots().iter().map(|r| shape(&tree, *r)).collect();
    assert_eq!(after, before);
}

#[test]
fn given_valid_target_when_reparenting_then_parent_set_and_acyclic() {
    let (mut tree, ids) = sample();
    let (a, a1, b, b1) = (ids[0], ids[1], ids[4], ids[5]);

    tree.reparent(a1, b, Some(0)).unwrap();

    assert_eq!(tree.parent(a1).unwrap(), Some(b));
    assert_eq!(tree.children(b).unwrap(), &[a1, b1]);
    assert_eq!(labels(&tree, tree.children(a).unwrap()), vec!["a2"]);
    for id in tree.iter().map(|(id, _)| id).collect::<Vec<_>>() {
        assert!(!tree.ancestors(id).any(|ancestor| ancestor == id));
    }
}

#[test]
fn given_root_level_node_when_reparenting_then_leaves_root_list() {
    let (mut tree, ids) = sample();
    let (a, b) = (ids[0], ids[4]);

    tree.reparent(b, a, None).unwrap();

    assert_eq!(tree.roots(), &[a]);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn given_unknown_node_when_reparenting_then_not_found() {
    let (mut tree, ids) = sample();
    let x = ids[2];
    tree.remove(&[x]);

    assert_eq!(tree.reparent(x, ids[0], None), Err(DomainError::NotFound(x)));
}

// ============================================================
// unnest
// ============================================================

#[test]
fn given_node_two_levels_deep_when_unnesting_then_root_level_with_children_kept() {
    let (mut tree, ids) = sample();
    let (a, a1, x) = (ids[0], ids[1], ids[2]);
    tree.reparent(ids[4], a1, None).unwrap();
    let children_before = tree.children(a1).unwrap().to_vec();
    assert_eq!(tree.ancestors(a1).collect::<Vec<_>>(), vec![a]);
    assert_eq!(children_before[0], x);

    tree.unnest(&[a1]).unwrap();

    assert_eq!(tree.parent(a1).unwrap(), None);
    assert_eq!(tree.children(a1).unwrap(), children_before.as_slice());
    assert_eq!(tree.roots().last(), Some(&a1));
}

#[test]
fn given_siblings_when_unnesting_batch_then_processed_in_reverse() {
    let (mut tree, ids) = sample();
    let (a, a1, a2, b) = (ids[0], ids[1], ids[3], ids[4]);

    tree.unnest(&[a1, a2]).unwrap();

    assert_eq!(tree.roots(), &[a, b, a2, a1]);
    assert!(tree.children(a).unwrap().is_empty());
}

#[test]
fn given_unknown_id_in_batch_when_unnesting_then_nothing_moves() {
    let (mut tree, ids) = sample();
    let (a1, x) = (ids[1], ids[2]);
    tree.remove(&[x]);

    assert_eq!(tree.unnest(&[a1, x]), Err(DomainError::NotFound(x)));
    assert_eq!(tree.parent(a1).unwrap(), Some(ids[0]));
}

// ============================================================
// remove
// ============================================================

#[test]
fn given_stale_ids_when_removing_then_tree_unchanged() {
    let (mut tree, ids) = sample();
    let x = ids[2];
    tree.remove(&[x]);
    let len = tree.len();

    tree.remove(&[x, x]);

    assert_eq!(tree.len(), len);
}

#[test]
fn given_ancestor_and_descendant_when_removing_then_whole_subtree_gone() {
    let (mut tree, ids) = sample();
    let (a, a1, x, b) = (ids[0], ids[1], ids[2], ids[4]);

    tree.remove(&[a, x, a1]);

    assert_eq!(tree.roots(), &[b]);
    assert_eq!(tree.len(), 2);
    for id in [a, a1, x, ids[3]] {
        assert!(!tree.contains(id));
    }
}

// ============================================================
// reposition and traversal
// ============================================================

#[test]
fn given_sibling_when_repositioning_then_order_changes() {
    let (mut tree, ids) = sample();
    let (a, a1, a2) = (ids[0], ids[1], ids[3]);

    tree.reposition(a2, 0).unwrap();

    assert_eq!(tree.children(a).unwrap(), &[a2, a1]);
}

#[test]
fn given_forest_when_iterating_then_preorder_and_postorder_cover_all_roots() {
    let (tree, _) = sample();

    let pre: Vec<_> = tree.iter().map(|(_, node)| node.data.clone()).collect();
    let post: Vec<_> = tree.iter_postorder().map(|(_, node)| node.data.clone()).collect();

    assert_eq!(pre, vec!["A", "a1", "x", "a2", "B", "b1"]);
    assert_eq!(post, vec!["x", "a1", "a2", "A", "b1", "B"]);
}
