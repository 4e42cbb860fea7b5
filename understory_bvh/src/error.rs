// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree operations.

/// Error returned by [`BvhTree`](crate::BvhTree) operations that address an object by identifier.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhError {
    /// The identifier is not registered in the tree.
    #[error("identifier is not registered in the tree")]
    NotFound,
}
