// Copyright 2026 rtree-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The strategy plug-in boundary. A tree is parameterized by three free
//! functions chosen at construction; each consumes the tree plus node/entry
//! handles and is replaceable independently of the others.

pub mod guttman;

use std::fmt;

use crate::node::{EntryId, NodeId};
use crate::rtree::RTree;
use crate::Coord;

/// Selects the leaf node that should receive a freshly created entry.
/// The entry is allocated but not yet attached to any node.
pub type ChooseLeafFn<P, T> = fn(&RTree<P, T>, EntryId) -> NodeId;

/// Ascends from a node (and its optional split sibling) to the root,
/// refreshing covers and propagating splits
pub type AdjustTreeFn<P, T> = fn(&mut RTree<P, T>, NodeId, Option<NodeId>);

/// Splits an overflowing node, returning the new sibling at the same level.
/// The sibling's parent entry is created later by the adjust strategy.
pub type SplitNodeFn<P, T> = fn(&mut RTree<P, T>, NodeId) -> NodeId;

/// The three strategy bindings of a tree
pub struct Strategies<P: Coord, T> {
    pub choose_leaf: ChooseLeafFn<P, T>,
    pub adjust_tree: AdjustTreeFn<P, T>,
    pub split_node: SplitNodeFn<P, T>,
}

impl<P: Coord, T> Strategies<P, T> {
    pub fn new(
        choose_leaf: ChooseLeafFn<P, T>,
        adjust_tree: AdjustTreeFn<P, T>,
        split_node: SplitNodeFn<P, T>,
    ) -> Strategies<P, T> {
        Strategies {
            choose_leaf,
            adjust_tree,
            split_node,
        }
    }

    /// Guttman's 1984 strategy set: least-enlargement leaf choice, upward
    /// adjustment, quadratic split
    pub fn guttman() -> Strategies<P, T> {
        Strategies {
            choose_leaf: guttman::least_enlargement,
            adjust_tree: guttman::adjust_tree,
            split_node: guttman::quadratic_split,
        }
    }
}

impl<P: Coord, T> Clone for Strategies<P, T> {
    fn clone(&self) -> Strategies<P, T> {
        *self
    }
}

impl<P: Coord, T> Copy for Strategies<P, T> {}

impl<P: Coord, T> fmt::Debug for Strategies<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategies").finish_non_exhaustive()
    }
}
