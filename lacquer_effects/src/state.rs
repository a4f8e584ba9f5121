// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element effect storage and cache invalidation.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use lacquer_core::geometry::BoxArea;

use crate::effect::{DataHandle, Decorator, Filter};
use crate::element::Element;
use crate::target::{CompiledFilter, FilterHandleList};

/// How stale an [`EffectsState`] is.
///
/// ```text
///   dirty_effects()          instance_effects()        reload_effects_data()
///  ─────────────────► StructureDirty ──────────► DataDirty ──────────► Clean
///                                                   ▲
///                         dirty_effects_data() ─────┘ (from Clean)
/// ```
///
/// A structure rebuild always implies a data reload, so marking data dirty
/// while the structure is dirty changes nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// Instanced effects and their data are current.
    #[default]
    Clean,
    /// Effects are current but their per-element data must be regenerated.
    DataDirty,
    /// Effects must be instanced again from style.
    StructureDirty,
}

/// An instanced decorator or mask image.
pub struct DecoratorEntry {
    pub(crate) decorator: Rc<dyn Decorator>,
    pub(crate) paint_area: BoxArea,
    pub(crate) data: Option<DataHandle>,
}

impl DecoratorEntry {
    /// The shared decorator.
    #[must_use]
    pub fn decorator(&self) -> &Rc<dyn Decorator> {
        &self.decorator
    }

    /// Box area the decorator paints into. Never [`BoxArea::Auto`].
    #[must_use]
    pub fn paint_area(&self) -> BoxArea {
        self.paint_area
    }

    /// Data generated for this element, if generation has run and succeeded.
    #[must_use]
    pub fn data(&self) -> Option<DataHandle> {
        self.data
    }

    fn release(&mut self) {
        if let Some(data) = self.data.take() {
            self.decorator.release_element_data(data);
        }
    }
}

impl fmt::Debug for DecoratorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorEntry")
            .field("paint_area", &self.paint_area)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// An instanced filter or backdrop filter.
pub struct FilterEntry {
    pub(crate) filter: Rc<dyn Filter>,
    pub(crate) compiled: Option<Box<dyn CompiledFilter>>,
}

impl FilterEntry {
    /// The shared filter.
    #[must_use]
    pub fn filter(&self) -> &Rc<dyn Filter> {
        &self.filter
    }

    /// Whether the filter has been compiled for this element.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub(crate) fn add_handle_to(&self, handles: &mut FilterHandleList) {
        if let Some(compiled) = &self.compiled {
            compiled.add_handle_to(handles);
        }
    }
}

impl fmt::Debug for FilterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEntry")
            .field("compiled", &self.is_compiled())
            .finish_non_exhaustive()
    }
}

/// Lets every filter in `entries` grow `region` by its ink overflow.
pub(crate) fn extend_ink_overflow(
    entries: &[FilterEntry],
    element: &dyn Element,
    region: Rect,
) -> Rect {
    entries.iter().fold(region, |region, entry| {
        entry.filter.extend_ink_overflow(element, region)
    })
}

/// The decorators, mask images, filters, and backdrop filters of one element.
///
/// Effects are instanced lazily from the element's style the next time they
/// are needed after [`dirty_effects`](Self::dirty_effects), and their
/// per-element data is regenerated after
/// [`dirty_effects_data`](Self::dirty_effects_data). See [`CacheState`].
///
/// The state owns every generated data handle and compiled filter and
/// releases them when rebuilt or dropped.
#[derive(Debug, Default)]
pub struct EffectsState {
    pub(crate) decorators: Vec<DecoratorEntry>,
    pub(crate) mask_images: Vec<DecoratorEntry>,
    pub(crate) filters: Vec<FilterEntry>,
    pub(crate) backdrop_filters: Vec<FilterEntry>,
    pub(crate) cache: CacheState,
    /// `Enter` pushed the element's layer and `Exit` has not popped it yet.
    pub(crate) layer_open: bool,
}

impl EffectsState {
    /// Creates an empty, clean state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current invalidation state.
    #[must_use]
    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    /// Instanced decorators, in declaration order.
    #[must_use]
    pub fn decorators(&self) -> &[DecoratorEntry] {
        &self.decorators
    }

    /// Instanced mask images, in declaration order.
    #[must_use]
    pub fn mask_images(&self) -> &[DecoratorEntry] {
        &self.mask_images
    }

    /// Instanced filters, in declaration order.
    #[must_use]
    pub fn filters(&self) -> &[FilterEntry] {
        &self.filters
    }

    /// Instanced backdrop filters, in declaration order.
    #[must_use]
    pub fn backdrop_filters(&self) -> &[FilterEntry] {
        &self.backdrop_filters
    }

    /// Returns `true` if no effect of any kind is instanced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
            && self.mask_images.is_empty()
            && self.filters.is_empty()
            && self.backdrop_filters.is_empty()
    }

    /// Whether the element renders into its own layer between `Enter` and
    /// `Exit`.
    #[must_use]
    pub fn needs_layer(&self) -> bool {
        !self.filters.is_empty() || !self.mask_images.is_empty()
    }

    /// Whether an `Enter` stage is waiting for its `Exit`.
    #[must_use]
    pub fn is_layer_open(&self) -> bool {
        self.layer_open
    }

    /// Requests a rebuild of all effects from style.
    pub fn dirty_effects(&mut self) {
        self.cache = CacheState::StructureDirty;
    }

    /// Requests regeneration of per-element effect data.
    pub fn dirty_effects_data(&mut self) {
        if self.cache == CacheState::Clean {
            self.cache = CacheState::DataDirty;
        }
    }

    /// Releases all generated data and drops every instanced effect.
    pub fn release_effects(&mut self) {
        for entry in self
            .decorators
            .iter_mut()
            .chain(self.mask_images.iter_mut())
        {
            entry.release();
        }
        self.decorators.clear();
        self.mask_images.clear();
        self.filters.clear();
        self.backdrop_filters.clear();
    }
}

impl Drop for EffectsState {
    fn drop(&mut self) {
        self.release_effects();
    }
}
