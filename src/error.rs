// Copyright 2026 rtree-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use thiserror::Error;

/// Errors reported by the spatial index
#[derive(Debug, Error)]
pub enum Error {
    /// A rectangle with non-finite coordinates, or with `min > max` on an axis
    #[error("invalid rectangle: {0}")]
    InvalidRectangle(String),

    /// Fanout bounds outside `max >= 2`, `1 <= min <= ceil(max / 2)`
    #[error("invalid fanout: {0}")]
    InvalidFanout(String),

    /// A strategy left the tree in a state that breaks a structural invariant.
    /// Only produced by [`crate::RTree::validate`] and by the debug checks run
    /// after each insert.
    #[error("strategy contract violation: {0}")]
    StrategyContractViolation(String),
}

pub type Result<V> = std::result::Result<V, Error>;
