// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorator and filter capabilities.
//!
//! Effect objects are produced by a style sheet or a filter instancer and
//! shared (`Rc`) between every element whose style uses the same rule. They
//! hold no per-element state: anything an effect needs per element is
//! produced on demand and handed back to the caller to own, as a
//! [`DataHandle`] for decorators or a boxed
//! [`CompiledFilter`](crate::CompiledFilter) for filters.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Rect;
use lacquer_core::geometry::BoxArea;

use crate::element::Element;
use crate::target::{CompiledFilter, RenderTarget};

/// Per-element render data generated by a [`Decorator`].
///
/// The value is meaningful only to the decorator that produced it, and must
/// be handed back through [`Decorator::release_element_data`] exactly once.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataHandle(pub u64);

impl fmt::Debug for DataHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataHandle({})", self.0)
    }
}

/// A paintable effect anchored to one of an element's box areas.
pub trait Decorator {
    /// Prepares render data for `element`, or `None` on failure.
    fn generate_element_data(
        &self,
        element: &dyn Element,
        paint_area: BoxArea,
    ) -> Option<DataHandle>;

    /// Releases data previously returned by
    /// [`generate_element_data`](Self::generate_element_data).
    fn release_element_data(&self, data: DataHandle);

    /// Draws the decorator into the target's top layer.
    fn render_element(
        &self,
        element: &dyn Element,
        data: DataHandle,
        target: &mut dyn RenderTarget,
    );
}

/// A post-processing effect applied while compositing a layer.
pub trait Filter {
    /// Compiles the filter for `element`, or `None` on failure.
    fn compile_filter(&self, element: &dyn Element) -> Option<Box<dyn CompiledFilter>>;

    /// Grows `region` by whatever margin the filter paints outside its input,
    /// such as a blur radius or a shadow offset.
    fn extend_ink_overflow(&self, _element: &dyn Element, region: Rect) -> Rect {
        region
    }
}
