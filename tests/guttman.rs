//! End-to-end scenarios for the default Guttman tree, covering the empty
//! tree, a root split, pruned queries, predicate search, and the traversal
//! orders.

mod common;

use std::cell::Cell;

use common::rect;
use rtree::{EntryId, NodeId, RTree};

/// Five inserts that force exactly one root split with `max_entries = 4`:
/// the quadratic split seeds on `a` and `d`, separating the `(a, b, c)`
/// cluster from the `(d, e)` cluster.
fn sample_tree() -> (RTree<f64, char>, Vec<EntryId>) {
    let mut tree = RTree::new(4).unwrap();
    let entries = vec![
        tree.insert('a', rect(0.0, 0.0, 3.0, 3.0)).unwrap(),
        tree.insert('b', rect(2.0, 2.0, 4.0, 4.0)).unwrap(),
        tree.insert('c', rect(1.0, 1.0, 2.0, 4.0)).unwrap(),
        tree.insert('d', rect(8.0, 8.0, 10.0, 10.0)).unwrap(),
        tree.insert('e', rect(7.0, 7.0, 9.0, 9.0)).unwrap(),
    ];
    (tree, entries)
}

fn leaf_data(tree: &RTree<f64, char>, node: NodeId) -> Vec<char> {
    let mut data: Vec<char> = tree
        .node(node)
        .entries()
        .iter()
        .filter_map(|&e| tree.entry(e).data().copied())
        .collect();
    data.sort_unstable();
    data
}

#[test]
fn empty_tree() {
    let tree: RTree<f64, char> = RTree::new(4).unwrap();
    assert_eq!(0, tree.query(rect(0.0, 0.0, 1.0, 1.0)).count());
    assert_eq!(0, tree.get_leaf_entries().count());
    let root = tree.node(tree.root());
    assert!(root.is_leaf());
    assert!(root.is_empty());
    assert!(tree.validate().is_ok());
}

#[test]
fn fifth_insert_splits_the_root() {
    let (tree, _) = sample_tree();

    let root = tree.node(tree.root());
    assert_eq!(1, root.level());
    assert_eq!(2, root.len());

    let leaves: Vec<NodeId> = tree.get_leaves().collect();
    assert_eq!(2, leaves.len());
    assert!(leaves.iter().all(|&n| tree.node(n).level() == 0));
    assert_eq!(vec!['a', 'b', 'c'], leaf_data(&tree, leaves[0]));
    assert_eq!(vec!['d', 'e'], leaf_data(&tree, leaves[1]));
    assert!(tree.validate().is_ok());
}

#[test]
fn query_prunes_the_far_branch() {
    let (tree, entries) = sample_tree();
    let query = rect(7.5, 7.5, 8.5, 8.5);

    let mut hits: Vec<EntryId> = tree.query(query).collect();
    hits.sort_unstable();
    let mut expected = vec![entries[3], entries[4]];
    expected.sort_unstable();
    assert_eq!(expected, hits);

    // only the root and the (d, e) leaf are visited
    let visited: Vec<NodeId> = tree.query_nodes(query).collect();
    assert_eq!(2, visited.len());
    assert_eq!(tree.root(), visited[0]);
    assert_eq!(vec!['d', 'e'], leaf_data(&tree, visited[1]));
}

#[test]
fn search_by_data() {
    let (tree, entries) = sample_tree();
    let hits: Vec<EntryId> = tree
        .search(|t, e| t.entry(e).data() == Some(&'c'))
        .collect();
    assert_eq!(vec![entries[2]], hits);
}

#[test]
fn point_query_hits_covering_entries() {
    let (tree, entries) = sample_tree();
    let hits: Vec<EntryId> = tree.query_point(rtree::Point::new(8.5, 8.5)).collect();
    let mut hits_sorted = hits;
    hits_sorted.sort_unstable();
    let mut expected = vec![entries[3], entries[4]];
    expected.sort_unstable();
    assert_eq!(expected, hits_sorted);
}

#[test]
fn identical_rects_split_deterministically() {
    let build = || {
        let mut tree = RTree::new(4).unwrap();
        for i in 0..10usize {
            tree.insert(i, rect(0.0, 0.0, 1.0, 1.0)).unwrap();
        }
        tree
    };
    let first = build();
    let second = build();
    assert!(first.validate().is_ok());

    let shape = |tree: &RTree<f64, usize>| -> Vec<Vec<Vec<usize>>> {
        tree.get_levels()
            .iter()
            .map(|level| {
                level
                    .iter()
                    .map(|&node| {
                        tree.node(node)
                            .entries()
                            .iter()
                            .filter_map(|&e| tree.entry(e).data().copied())
                            .collect()
                    })
                    .collect()
            })
            .collect()
    };
    assert_eq!(shape(&first), shape(&second));
}

#[test]
fn level_order_yields_root_then_children() {
    let (tree, _) = sample_tree();
    let order: Vec<NodeId> = tree.traverse_level_order().collect();
    let children: Vec<NodeId> = tree
        .node(tree.root())
        .entries()
        .iter()
        .filter_map(|&e| tree.entry(e).child())
        .collect();
    assert_eq!(vec![tree.root(), children[0], children[1]], order);
}

#[test]
fn pre_order_visits_parents_before_children() {
    let (tree, _) = sample_tree();
    let order: Vec<NodeId> = tree.traverse().collect();
    let children: Vec<NodeId> = tree
        .node(tree.root())
        .entries()
        .iter()
        .filter_map(|&e| tree.entry(e).child())
        .collect();
    assert_eq!(vec![tree.root(), children[0], children[1]], order);
}

#[test]
fn false_condition_at_the_root_yields_only_the_root() {
    let (tree, _) = sample_tree();
    let visited: Vec<NodeId> = tree.traverse_where(|_, _| false).collect();
    assert_eq!(vec![tree.root()], visited);

    let visited: Vec<NodeId> = tree.traverse_level_order_where(|_, _| false).collect();
    assert_eq!(vec![tree.root()], visited);
}

#[test]
fn condition_runs_once_per_node_and_stops_with_the_iterator() {
    let (tree, _) = sample_tree();
    let calls = Cell::new(0usize);
    let mut walk = tree.traverse_where(|_, _| {
        calls.set(calls.get() + 1);
        true
    });

    assert!(walk.next().is_some());
    assert_eq!(1, calls.get());
    drop(walk);
    // dropping the iterator stopped the walk; nothing ran afterwards
    assert_eq!(1, calls.get());

    let total = tree
        .traverse_where(|_, _| {
            calls.set(calls.get() + 1);
            true
        })
        .count();
    assert_eq!(3, total);
    assert_eq!(4, calls.get());
}

#[test]
fn subtree_traversal_stays_in_the_subtree() {
    let (tree, _) = sample_tree();
    let children: Vec<NodeId> = tree
        .node(tree.root())
        .entries()
        .iter()
        .filter_map(|&e| tree.entry(e).child())
        .collect();
    let visited: Vec<NodeId> = tree.traverse_node(children[1]).collect();
    assert_eq!(vec![children[1]], visited);
}

#[test]
fn levels_are_grouped_leaves_first() {
    let (tree, _) = sample_tree();
    let levels = tree.get_levels();
    assert_eq!(2, levels.len());
    assert_eq!(2, levels[0].len());
    assert!(levels[0].iter().all(|&n| tree.node(n).is_leaf()));
    assert_eq!(vec![tree.root()], levels[1]);
}

#[test]
fn flattened_views_cover_everything() {
    let (tree, entries) = sample_tree();
    assert_eq!(5, tree.len());
    assert_eq!(3, tree.get_nodes().count());
    assert_eq!(2, tree.get_leaves().count());
    let mut flat: Vec<EntryId> = tree.get_leaf_entries().collect();
    flat.sort_unstable();
    let mut expected = entries;
    expected.sort_unstable();
    assert_eq!(expected, flat);
}

#[test]
fn search_nodes_sees_every_node() {
    let (tree, _) = sample_tree();
    let all: Vec<NodeId> = tree.search_nodes(|_, _| true).collect();
    assert_eq!(3, all.len());
    let leaves: Vec<NodeId> = tree.search_nodes(|t, n| t.node(n).is_leaf()).collect();
    assert_eq!(2, leaves.len());
}
