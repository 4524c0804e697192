// Copyright 2026 rtree-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The R-tree container: arenas, fanout bounds, strategy bindings, and the
//! public insert/traverse/query/search surface.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::geometry::{is_close, Point, Rect};
use crate::node::{Entry, EntryId, Node, NodeId};
use crate::strategy::Strategies;
use crate::traverse::{LevelOrder, PreOrder, Query, QueryNodes, Search, SearchNodes};
use crate::{Coord, DEFAULT_MAX_ENTRIES};

/// An in-memory R-tree over rectangle-indexed items of type `T`.
///
/// The tree is parameterized by three strategies chosen at construction
/// (leaf selection, tree adjustment, node split); the defaults implement
/// Guttman's original algorithms. Nodes and entries are addressed through
/// the stable [`NodeId`]/[`EntryId`] handles.
#[derive(Debug)]
pub struct RTree<P: Coord, T> {
    nodes: Vec<Node>,
    entries: Vec<Entry<P, T>>,
    root: NodeId,
    max_entries: usize,
    min_entries: usize,
    strategies: Strategies<P, T>,
    len: usize,
}

impl<P: Coord, T> Default for RTree<P, T> {
    fn default() -> RTree<P, T> {
        RTree::new(DEFAULT_MAX_ENTRIES).expect("default fanout is valid")
    }
}

impl<P: Coord, T> RTree<P, T> {
    /// New tree with the given maximum fanout, the default minimum of
    /// `ceil(max_entries / 2)`, and Guttman's strategies
    pub fn new(max_entries: usize) -> Result<RTree<P, T>> {
        RTree::with_min_entries(max_entries, max_entries.div_ceil(2))
    }

    /// New tree with explicit fanout bounds and Guttman's strategies
    pub fn with_min_entries(max_entries: usize, min_entries: usize) -> Result<RTree<P, T>> {
        RTree::with_strategies(max_entries, min_entries, Strategies::guttman())
    }

    /// New tree with explicit fanout bounds and strategy bindings
    pub fn with_strategies(
        max_entries: usize,
        min_entries: usize,
        strategies: Strategies<P, T>,
    ) -> Result<RTree<P, T>> {
        if max_entries < 2 {
            return Err(Error::InvalidFanout(format!(
                "max_entries ({max_entries}) must be at least 2"
            )));
        }
        if min_entries < 1 || min_entries > max_entries.div_ceil(2) {
            return Err(Error::InvalidFanout(format!(
                "min_entries ({min_entries}) must be between 1 and ceil(max_entries / 2) \
                 ({})",
                max_entries.div_ceil(2)
            )));
        }
        let mut tree = RTree {
            nodes: Vec::new(),
            entries: Vec::new(),
            root: NodeId(0),
            max_entries,
            min_entries,
            strategies,
            len: 0,
        };
        tree.root = tree.alloc_node(Node::new(0, Vec::new()));
        Ok(tree)
    }

    /// Maximum number of entries per node
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Minimum number of entries per non-root node
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// The current root node
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of leaf entries in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry, leaving an empty leaf root
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
        self.root = self.alloc_node(Node::new(0, Vec::new()));
        self.len = 0;
    }

    /// Borrow a node by id. Panics if the id does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Borrow an entry by id. Panics if the id does not belong to this tree.
    pub fn entry(&self, id: EntryId) -> &Entry<P, T> {
        &self.entries[id.0]
    }

    /// Insert `data` indexed by `rect`, returning the created leaf entry.
    ///
    /// The bound choose-leaf strategy selects the target leaf; an overflow
    /// triggers the bound split strategy, and the adjust strategy propagates
    /// cover updates and splits up to the root.
    pub fn insert(&mut self, data: T, rect: Rect<P>) -> Result<EntryId> {
        rect.check()?;
        let entry = self.alloc_data_entry(rect, data);
        let choose_leaf = self.strategies.choose_leaf;
        let adjust_tree = self.strategies.adjust_tree;
        let leaf = choose_leaf(self, entry);
        trace!("inserting {entry:?} into leaf {leaf:?}");
        self.nodes[leaf.0].entries.push(entry);
        let split = if self.node(leaf).len() > self.max_entries {
            Some(self.split_node(leaf))
        } else {
            None
        };
        adjust_tree(self, leaf, split);
        self.len += 1;
        #[cfg(debug_assertions)]
        if let Err(err) = self.validate() {
            panic!("insert left the tree inconsistent: {err}");
        }
        Ok(entry)
    }

    /// Split an overflowing node through the bound split strategy, returning
    /// the new sibling. Called by adjust strategies when an ancestor
    /// overflows in turn.
    pub fn split_node(&mut self, node: NodeId) -> NodeId {
        let split = self.strategies.split_node;
        let sibling = split(self, node);
        debug!("split {node:?} into sibling {sibling:?}");
        sibling
    }

    // ------------------------------------------------------------------
    // Graph operations exposed to strategies
    // ------------------------------------------------------------------

    /// New child-owning entry; its node links are bound by [`RTree::push_entry`]
    /// or [`RTree::set_node_entries`]
    pub fn alloc_child_entry(&mut self, rect: Rect<P>, child: NodeId) -> EntryId {
        self.alloc_entry(Entry::child_entry(rect, child))
    }

    /// New data-carrying entry, not yet attached to any node
    pub(crate) fn alloc_data_entry(&mut self, rect: Rect<P>, data: T) -> EntryId {
        self.alloc_entry(Entry::data_entry(rect, data))
    }

    /// New node at the given level owning `entries`; child nodes of the given
    /// entries are re-linked to it. The node's own parent links start unset.
    pub fn new_node(&mut self, level: usize, entries: Vec<EntryId>) -> NodeId {
        let node = self.alloc_node(Node::new(level, entries));
        self.rebind_children(node);
        node
    }

    /// Append an entry to a node, linking the entry's child (if any) back to
    /// the node
    pub fn push_entry(&mut self, node: NodeId, entry: EntryId) {
        self.nodes[node.0].entries.push(entry);
        if let Some(child) = self.entry(entry).child() {
            self.nodes[child.0].parent = Some(node);
            self.nodes[child.0].parent_entry = Some(entry);
        }
    }

    /// Replace a node's entry list, re-linking the children of the new
    /// entries. Used by split strategies.
    pub fn set_node_entries(&mut self, node: NodeId, entries: Vec<EntryId>) {
        self.nodes[node.0].entries = entries;
        self.rebind_children(node);
    }

    /// Overwrite an entry's bounding rectangle. Used by adjust strategies to
    /// refresh covers on the way up.
    pub fn set_entry_rect(&mut self, entry: EntryId, rect: Rect<P>) {
        self.entries[entry.0].rect = rect;
    }

    /// Shrink `node` to `group1` and move `group2` into a new sibling at the
    /// same level. Children of both groups are re-linked; the sibling's
    /// parent entry is left for the adjust strategy to create.
    pub fn apply_split(
        &mut self,
        node: NodeId,
        group1: Vec<EntryId>,
        group2: Vec<EntryId>,
    ) -> NodeId {
        let level = self.node(node).level;
        let parent = self.node(node).parent;
        self.set_node_entries(node, group1);
        let sibling = self.new_node(level, group2);
        self.nodes[sibling.0].parent = parent;
        sibling
    }

    /// Grow the tree by one level: a new root whose two entries cover
    /// `first` and `second`
    pub fn grow_root(&mut self, first: NodeId, second: NodeId) {
        let level = self.node(first).level + 1;
        let first_rect = self
            .entries_bounds(first)
            .expect("a split node is never empty");
        let second_rect = self
            .entries_bounds(second)
            .expect("a split node is never empty");
        let first_entry = self.alloc_entry(Entry::child_entry(first_rect, first));
        let second_entry = self.alloc_entry(Entry::child_entry(second_rect, second));
        let root = self.new_node(level, vec![first_entry, second_entry]);
        self.root = root;
        debug!("grew new root {root:?} at level {level}");
    }

    /// A node's bounding rectangle: the cached parent-entry rect, or the
    /// union of its entries for the root. `None` for an empty root.
    pub fn node_bounds(&self, node: NodeId) -> Option<Rect<P>> {
        match self.node(node).parent_entry {
            Some(entry) => Some(self.entry(entry).rect),
            None => self.entries_bounds(node),
        }
    }

    /// The union of a node's entry rectangles, always computed. `None` for an
    /// empty node.
    pub fn entries_bounds(&self, node: NodeId) -> Option<Rect<P>> {
        Rect::union_all(self.node(node).entries.iter().map(|&e| self.entry(e).rect))
    }

    // ------------------------------------------------------------------
    // Traversal, query, search
    // ------------------------------------------------------------------

    /// Pre-order traversal of all nodes
    pub fn traverse(&self) -> PreOrder<'_, P, T> {
        PreOrder::new(self, self.root, None)
    }

    /// Pre-order traversal with pruning: when `condition` returns false for
    /// a node, the node itself is still yielded but its descendants are
    /// skipped. The condition runs exactly once per yielded node.
    pub fn traverse_where<'a, C>(&'a self, condition: C) -> PreOrder<'a, P, T>
    where
        C: FnMut(&RTree<P, T>, NodeId) -> bool + 'a,
    {
        PreOrder::new(self, self.root, Some(Box::new(condition)))
    }

    /// Pre-order traversal of the subtree rooted at `node`
    pub fn traverse_node(&self, node: NodeId) -> PreOrder<'_, P, T> {
        PreOrder::new(self, node, None)
    }

    /// Pruned pre-order traversal of the subtree rooted at `node`
    pub fn traverse_node_where<'a, C>(&'a self, node: NodeId, condition: C) -> PreOrder<'a, P, T>
    where
        C: FnMut(&RTree<P, T>, NodeId) -> bool + 'a,
    {
        PreOrder::new(self, node, Some(Box::new(condition)))
    }

    /// Level-order (breadth-first) traversal of all nodes
    pub fn traverse_level_order(&self) -> LevelOrder<'_, P, T> {
        LevelOrder::new(self, self.root, None)
    }

    /// Level-order traversal with the same pruning contract as
    /// [`RTree::traverse_where`]
    pub fn traverse_level_order_where<'a, C>(&'a self, condition: C) -> LevelOrder<'a, P, T>
    where
        C: FnMut(&RTree<P, T>, NodeId) -> bool + 'a,
    {
        LevelOrder::new(self, self.root, Some(Box::new(condition)))
    }

    /// Every leaf entry whose rectangle intersects `rect`. Subtrees whose
    /// covers do not reach `rect` are never visited.
    pub fn query(&self, rect: Rect<P>) -> Query<'_, P, T> {
        Query::new(self, rect)
    }

    /// Every node whose bounding rectangle intersects `rect`, with the same
    /// pruning as [`RTree::query`]
    pub fn query_nodes(&self, rect: Rect<P>) -> QueryNodes<'_, P, T> {
        QueryNodes::new(self, rect)
    }

    /// Every leaf entry whose rectangle contains `point`
    pub fn query_point(&self, point: Point<P>) -> Query<'_, P, T> {
        self.query(point.into())
    }

    /// Every leaf entry satisfying `predicate`. The predicate sees entries,
    /// not node covers, so no subtree can be pruned.
    pub fn search<F>(&self, predicate: F) -> Search<'_, P, T, F>
    where
        F: FnMut(&RTree<P, T>, EntryId) -> bool,
    {
        Search::new(self, predicate)
    }

    /// Every node satisfying `predicate`, without pruning
    pub fn search_nodes<F>(&self, predicate: F) -> SearchNodes<'_, P, T, F>
    where
        F: FnMut(&RTree<P, T>, NodeId) -> bool,
    {
        SearchNodes::new(self, predicate)
    }

    /// Nodes grouped by level: index 0 is the leaf level, the root comes
    /// last. Within a level, nodes appear in level-order visit order.
    pub fn get_levels(&self) -> Vec<Vec<NodeId>> {
        let mut levels = vec![Vec::new(); self.node(self.root).level + 1];
        for node in self.traverse_level_order() {
            levels[self.node(node).level].push(node);
        }
        levels
    }

    /// All nodes in pre-order
    pub fn get_nodes(&self) -> PreOrder<'_, P, T> {
        self.traverse()
    }

    /// All leaf nodes, in level-order
    pub fn get_leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.traverse_level_order()
            .filter(move |&node| self.node(node).is_leaf())
    }

    /// All leaf entries, grouped by leaf node in level-order
    pub fn get_leaf_entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.get_leaves()
            .flat_map(move |node| self.node(node).entries.iter().copied())
    }

    // ------------------------------------------------------------------
    // Invariant checking
    // ------------------------------------------------------------------

    /// Walk the whole tree and verify its structural invariants: fanout
    /// bounds, uniform leaf depth, entry homogeneity, parent back-references,
    /// and cover rectangles. Returns
    /// [`Error::StrategyContractViolation`] on the first breach.
    ///
    /// Debug builds run this after every insert.
    pub fn validate(&self) -> Result<()> {
        let root = self.root;
        if self.node(root).parent.is_some() || self.node(root).parent_entry.is_some() {
            return Err(contract("the root must not have parent links"));
        }
        let mut leaf_entries = 0usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if id != root && (node.len() < self.min_entries || node.len() > self.max_entries) {
                return Err(contract(format!(
                    "{id:?} holds {} entries, outside [{}, {}]",
                    node.len(),
                    self.min_entries,
                    self.max_entries
                )));
            }
            if id == root && node.len() > self.max_entries {
                return Err(contract(format!(
                    "the root holds {} entries, more than {}",
                    node.len(),
                    self.max_entries
                )));
            }
            for &eid in &node.entries {
                match self.entry(eid).child() {
                    Some(child) => {
                        if node.is_leaf() {
                            return Err(contract(format!(
                                "leaf {id:?} holds child entry {eid:?}"
                            )));
                        }
                        let child_node = self.node(child);
                        if child_node.level + 1 != node.level {
                            return Err(contract(format!(
                                "{child:?} at level {} under {id:?} at level {}",
                                child_node.level, node.level
                            )));
                        }
                        if child_node.parent != Some(id) || child_node.parent_entry != Some(eid) {
                            return Err(contract(format!(
                                "{child:?} does not point back to {eid:?} in {id:?}"
                            )));
                        }
                        match self.entries_bounds(child) {
                            Some(bounds) if rects_close(&bounds, &self.entry(eid).rect) => {}
                            _ => {
                                return Err(contract(format!(
                                    "{eid:?} does not cover the entries of {child:?}"
                                )));
                            }
                        }
                        stack.push(child);
                    }
                    None => {
                        if !node.is_leaf() {
                            return Err(contract(format!(
                                "non-leaf {id:?} holds data entry {eid:?}"
                            )));
                        }
                        leaf_entries += 1;
                    }
                }
            }
        }
        if leaf_entries != self.len {
            return Err(contract(format!(
                "{leaf_entries} reachable leaf entries, expected {}",
                self.len
            )));
        }
        Ok(())
    }

    fn alloc_entry(&mut self, entry: Entry<P, T>) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(entry);
        id
    }

    fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Point the children of every child entry of `node` back at it
    fn rebind_children(&mut self, node: NodeId) {
        let entries = self.nodes[node.0].entries.clone();
        for entry in entries {
            if let Some(child) = self.entry(entry).child() {
                self.nodes[child.0].parent = Some(node);
                self.nodes[child.0].parent_entry = Some(entry);
            }
        }
    }
}

fn contract(message: impl Into<String>) -> Error {
    Error::StrategyContractViolation(message.into())
}

fn rects_close<P: Coord>(a: &Rect<P>, b: &Rect<P>) -> bool {
    is_close(a.min_x, b.min_x)
        && is_close(a.min_y, b.min_y)
        && is_close(a.max_x, b.max_x)
        && is_close(a.max_y, b.max_y)
}
