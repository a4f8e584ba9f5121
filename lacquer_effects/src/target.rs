// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer-stack render target that effects composite through.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use lacquer_core::geometry::IntRect;

/// An opaque handle to an offscreen layer owned by a [`RenderTarget`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerHandle(pub u32);

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerHandle({})", self.0)
    }
}

/// An opaque handle to a compiled filter, passed through to
/// [`RenderTarget::composite_layers`] without interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterHandle(pub u64);

impl fmt::Debug for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterHandle({})", self.0)
    }
}

/// An ordered filter chain applied while compositing.
pub type FilterHandleList = Vec<FilterHandle>;

/// Blend mode for compositing one layer into another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard source-over alpha compositing.
    #[default]
    Blend,
    /// The source replaces the destination.
    Replace,
}

/// A filter compiled for one element, owned by whoever compiled it.
///
/// Implementations release their backend resources on drop.
pub trait CompiledFilter {
    /// Appends this filter's handles, in application order, to `handles`.
    fn add_handle_to(&self, handles: &mut FilterHandleList);
}

/// A stack of offscreen layers plus a scissor region.
///
/// Drawing always targets the top layer. Layers pushed during an element's
/// render stages must be popped in the same stage bracket; see
/// [`LayerScope`](crate::LayerScope) and [`ScissorScope`](crate::ScissorScope).
pub trait RenderTarget {
    /// Pushes a new, cleared layer and makes it the drawing target.
    fn push_layer(&mut self) -> LayerHandle;

    /// Pops the top layer, discarding its content.
    fn pop_layer(&mut self);

    /// The current drawing target.
    fn top_layer(&self) -> LayerHandle;

    /// The layer directly below the top layer.
    fn next_layer(&self) -> LayerHandle;

    /// The active scissor region, or `None` if scissoring is disabled.
    fn scissor_region(&self) -> Option<IntRect>;

    /// Sets or disables the scissor region.
    fn set_scissor_region(&mut self, region: Option<IntRect>);

    /// Composites `source` into `destination` through `filters`, in order.
    fn composite_layers(
        &mut self,
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: &[FilterHandle],
    );

    /// Converts the top layer's content into a mask-image filter.
    fn save_layer_as_mask_image(&mut self) -> Option<Box<dyn CompiledFilter>>;
}
