// Copyright 2026 rtree-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A pluggable in-memory R-tree spatial index.
//!
//! The tree stores rectangle-indexed items and is parameterized by three
//! swappable strategies (leaf selection, tree adjustment, node split) whose
//! defaults implement Guttman's 1984 algorithms. Traversal, region query,
//! and predicate search all produce lazy iterators, so consumers can stop
//! early without paying for a full walk.
//!
//! ```
//! use rtree::{RTree, Rect};
//!
//! let mut tree = RTree::new(4)?;
//! let a = tree.insert("a", Rect::new(0.0, 0.0, 3.0, 3.0)?)?;
//! tree.insert("b", Rect::new(8.0, 8.0, 10.0, 10.0)?)?;
//!
//! let hits: Vec<_> = tree.query(Rect::new(1.0, 1.0, 2.0, 2.0)?).collect();
//! assert_eq!(vec![a], hits);
//! # Ok::<(), rtree::Error>(())
//! ```

mod error;
mod geometry;
mod node;
mod rtree;
mod traverse;

pub mod strategy;

use std::fmt::Debug;

use num::traits::float::FloatCore;
use num::FromPrimitive;

pub use crate::error::{Error, Result};
pub use crate::geometry::{Point, Rect};
pub use crate::node::{Entry, EntryId, Node, NodeId};
pub use crate::rtree::RTree;
pub use crate::strategy::{AdjustTreeFn, ChooseLeafFn, SplitNodeFn, Strategies};
pub use crate::traverse::{LevelOrder, PreOrder, Query, QueryNodes, Search, SearchNodes};

/// Maximum fanout used by [`RTree::default`]. Other implementations of the
/// same structure choose their own default; nothing should rely on this
/// value for interoperability.
pub const DEFAULT_MAX_ENTRIES: usize = 8;

/// Relative tolerance for detecting enlargement ties during leaf selection
pub const EPSILON: f64 = 1e-5;

/// Coordinate scalar for rectangles and trees. Blanket-implemented for every
/// float type satisfying the bounds, notably `f32` and `f64`.
pub trait Coord: FloatCore + FromPrimitive + Default + Debug {}

impl<P> Coord for P where P: FloatCore + FromPrimitive + Default + Debug {}
