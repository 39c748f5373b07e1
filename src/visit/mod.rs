// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Traversal of type trees and of raw values.
//!
//! Two synchronized walks are provided:
//!
//! - **Type walk** ([`walk_type`]): dispatches on a type's category and
//!   recurses into composites. Visitors implement [`TypeVisit`]
//!   (tolerant, every hook defaulted) or [`TypeVisitStrict`] (scalar
//!   hooks required, null types rejected).
//! - **Value walk** ([`ValueWalk`]): pairs the type walk with a cursor
//!   over raw bytes, reinterpreting scalars and recursing into composite
//!   layouts. Bytes are fetched through a [`MemorySource`], so the walk
//!   is safe even for buffers that embed pointers.
//!
//! Hooks return `Ok(true)` to keep walking; `Ok(false)` terminates the
//! walk cleanly with the cursor stack restored. Composite hooks have
//! default bodies that perform the recursion; overrides may wrap, repeat
//! or skip it by calling the public recursion helpers themselves.

mod types;
mod values;

pub use types::{
    recurse_array, recurse_container, recurse_field, recurse_fields, recurse_pointer,
    walk_type, TypeVisit, TypeVisitStrict,
};
pub use values::{BufferSource, MemorySource, Scalar, ValueVisit, ValueWalk, WalkEnv};
