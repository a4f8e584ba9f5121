// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context and element identity types.

use core::fmt;

/// Identifies a rendering context (one document tree presented to one
/// output).
///
/// Context owners assign these and must call
/// [`DamageRegistry::on_context_destroyed`](crate::damage::DamageRegistry::on_context_destroyed)
/// before reusing a value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContextId(pub u32);

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

/// A handle to an element in the owner's element tree.
///
/// Contains both a slot index and a generation counter, so an element that
/// reuses a destroyed element's slot never inherits its bounding-box history.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId {
    idx: u32,
    generation: u32,
}

impl ElementId {
    /// Creates a handle from a slot index and its current generation.
    #[inline]
    #[must_use]
    pub const fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}
