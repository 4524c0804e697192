// Copyright 2026 rtree-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Guttman's original R-tree strategies (Gut84): least-enlargement leaf
//! choice, upward tree adjustment, and quadratic node split. These are the
//! defaults bound by [`Strategies::guttman`](crate::Strategies::guttman).

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::geometry::{is_close, Rect};
use crate::node::{EntryId, NodeId};
use crate::rtree::RTree;
use crate::Coord;

/// Descend from the root into the child whose cover needs the least
/// enlargement to take the new entry, until a leaf is reached.
///
/// Enlargement ties (within relative tolerance) are broken by smaller
/// current area, then by position in the node, first entry winning.
pub fn least_enlargement<P: Coord, T>(tree: &RTree<P, T>, entry: EntryId) -> NodeId {
    let rect = tree.entry(entry).rect;
    let mut node = tree.root();
    while !tree.node(node).is_leaf() {
        let children = tree.node(node).entries();
        let areas: Vec<P> = children
            .iter()
            .map(|&child| tree.entry(child).rect.area())
            .collect();
        let enlargements: Vec<P> = children
            .iter()
            .map(|&child| tree.entry(child).rect.enlargement(&rect))
            .collect();
        let least = enlargements
            .iter()
            .copied()
            .map(OrderedFloat)
            .min()
            .expect("a non-leaf node holds at least one entry")
            .0;
        let tied: Vec<usize> = (0..children.len())
            .filter(|&i| is_close(enlargements[i], least))
            .collect();
        let winner = if tied.len() == 1 {
            tied[0]
        } else {
            // min_by_key keeps the first of equally small areas
            tied.into_iter()
                .min_by_key(|&i| OrderedFloat(areas[i]))
                .expect("at least the minimum itself is tied")
        };
        node = tree
            .entry(children[winner])
            .child()
            .expect("non-leaf nodes hold child entries");
    }
    node
}

/// Ascend from `node` to the root, refreshing the cover of every parent
/// entry on the way and propagating `split` upward. When the root itself
/// split, a new root is grown over the two halves.
///
/// Covers are refreshed on every level even when no split propagates: the
/// node may have given entries away during its own split, shrinking its
/// bounds.
pub fn adjust_tree<P: Coord, T>(tree: &mut RTree<P, T>, node: NodeId, split: Option<NodeId>) {
    let mut node = node;
    let mut split = split;
    loop {
        let links = (tree.node(node).parent(), tree.node(node).parent_entry());
        let (Some(parent), Some(parent_entry)) = links else {
            break;
        };
        let cover = tree
            .entries_bounds(node)
            .expect("a node on the adjust path is never empty");
        tree.set_entry_rect(parent_entry, cover);
        if let Some(sibling) = split.take() {
            let sibling_cover = tree
                .entries_bounds(sibling)
                .expect("a split sibling is never empty");
            let sibling_entry = tree.alloc_child_entry(sibling_cover, sibling);
            tree.push_entry(parent, sibling_entry);
            if tree.node(parent).len() > tree.max_entries() {
                split = Some(tree.split_node(parent));
            }
        }
        node = parent;
    }
    if let Some(sibling) = split {
        tree.grow_root(node, sibling);
    }
}

/// Guttman's quadratic split. Seeds the two groups with the pair of entries
/// wasting the most area when covered together, then hands out the rest by
/// strongest preference, keeping both groups able to reach the minimum
/// fanout. Returns the sibling node holding the second group.
pub fn quadratic_split<P: Coord, T>(tree: &mut RTree<P, T>, node: NodeId) -> NodeId {
    let (seed1, seed2) = pick_seeds(tree, tree.node(node).entries());
    let mut remaining: Vec<EntryId> = tree
        .node(node)
        .entries()
        .iter()
        .copied()
        .filter(|&entry| entry != seed1 && entry != seed2)
        .collect();
    let mut group1 = vec![seed1];
    let mut group2 = vec![seed2];
    let mut rect1 = tree.entry(seed1).rect;
    let mut rect2 = tree.entry(seed2).rect;
    // once a group reaches this size, the rest must go to the other group
    // for it to reach min_entries
    let cap = tree.max_entries() - tree.min_entries() + 1;
    while !remaining.is_empty() {
        if group1.len() == cap {
            group2.append(&mut remaining);
            break;
        }
        if group2.len() == cap {
            group1.append(&mut remaining);
            break;
        }
        let (area1, area2) = (rect1.area(), rect2.area());
        let next = pick_next(tree, &remaining, &rect1, area1, &rect2, area2);
        let entry = remaining.remove(next);
        let union1 = rect1.union(&tree.entry(entry).rect);
        let union2 = rect2.union(&tree.entry(entry).rect);
        let d1 = union1.area() - area1;
        let d2 = union2.area() - area2;
        // prefer the group enlarged least; ties go to the smaller cover,
        // then the smaller group, then group 1
        let to_first = if d1 == d2 {
            if area1 == area2 {
                group1.len() <= group2.len()
            } else {
                area1 < area2
            }
        } else {
            d1 < d2
        };
        if to_first {
            group1.push(entry);
            rect1 = union1;
        } else {
            group2.push(entry);
            rect2 = union2;
        }
    }
    tree.apply_split(node, group1, group2)
}

/// The pair of entries maximizing dead space, i.e. the cover area wasted by
/// putting the two in one group. The first pair in iteration order wins ties.
fn pick_seeds<P: Coord, T>(tree: &RTree<P, T>, entries: &[EntryId]) -> (EntryId, EntryId) {
    let mut seeds = None;
    let mut max_waste = P::zero();
    for (e1, e2) in entries.iter().copied().tuple_combinations::<(_, _)>() {
        let r1 = tree.entry(e1).rect;
        let r2 = tree.entry(e2).rect;
        let waste = r1.union(&r2).area() - r1.area() - r2.area();
        if seeds.is_none() || waste > max_waste {
            max_waste = waste;
            seeds = Some((e1, e2));
        }
    }
    seeds.expect("splitting requires at least two entries")
}

/// The index of the remaining entry with the strongest preference for one
/// group over the other. The first entry in iteration order wins ties.
fn pick_next<P: Coord, T>(
    tree: &RTree<P, T>,
    remaining: &[EntryId],
    rect1: &Rect<P>,
    area1: P,
    rect2: &Rect<P>,
    area2: P,
) -> usize {
    let mut winner = 0;
    let mut max_preference = None;
    for (i, &entry) in remaining.iter().enumerate() {
        let rect = tree.entry(entry).rect;
        let d1 = rect1.union(&rect).area() - area1;
        let d2 = rect2.union(&rect).area() - area2;
        let preference = OrderedFloat((d1 - d2).abs());
        if max_preference.map_or(true, |best| preference > best) {
            max_preference = Some(preference);
            winner = i;
        }
    }
    winner
}
