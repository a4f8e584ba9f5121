// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped layer and scissor guards.
//!
//! Both guards borrow the render target mutably and dereference to it, so
//! they nest: a [`LayerScope`] pushed through a [`ScissorScope`] pops before
//! the scissor is restored.
//!
//! ```rust,ignore
//! let mut scissor = ScissorScope::new(target);
//! scissor.set_scissor_region(extended);
//! let mut temp = LayerScope::push(&mut *scissor);
//! temp.composite_layers(source, temp.layer(), BlendMode::Blend, &filters);
//! // `temp` pops, then `scissor` restores.
//! ```

use core::fmt;
use core::ops::{Deref, DerefMut};

use lacquer_core::geometry::IntRect;

use crate::target::{LayerHandle, RenderTarget};

/// Pushes a layer on creation and pops it on drop.
pub struct LayerScope<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
    layer: LayerHandle,
}

impl<'a, T: RenderTarget + ?Sized> LayerScope<'a, T> {
    /// Pushes a new layer onto `target`.
    pub fn push(target: &'a mut T) -> Self {
        let layer = target.push_layer();
        Self { target, layer }
    }

    /// The layer pushed by this scope.
    #[must_use]
    pub fn layer(&self) -> LayerHandle {
        self.layer
    }
}

impl<T: RenderTarget + ?Sized> Deref for LayerScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for LayerScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for LayerScope<'_, T> {
    fn drop(&mut self) {
        self.target.pop_layer();
    }
}

impl<T: RenderTarget + ?Sized> fmt::Debug for LayerScope<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerScope")
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

/// Records the scissor region on creation and restores it on drop.
pub struct ScissorScope<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
    saved: Option<IntRect>,
}

impl<'a, T: RenderTarget + ?Sized> ScissorScope<'a, T> {
    /// Remembers the current scissor region of `target`.
    pub fn new(target: &'a mut T) -> Self {
        let saved = target.scissor_region();
        Self { target, saved }
    }

    /// The region that will be restored.
    #[must_use]
    pub fn saved(&self) -> Option<IntRect> {
        self.saved
    }
}

impl<T: RenderTarget + ?Sized> Deref for ScissorScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for ScissorScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for ScissorScope<'_, T> {
    fn drop(&mut self) {
        self.target.set_scissor_region(self.saved);
    }
}

impl<T: RenderTarget + ?Sized> fmt::Debug for ScissorScope<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScissorScope")
            .field("saved", &self.saved)
            .finish_non_exhaustive()
    }
}
