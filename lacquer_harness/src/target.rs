// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A render target that records instead of drawing.

use std::fmt;

use lacquer_core::geometry::IntRect;
use lacquer_effects::{
    BlendMode, CompiledFilter, FilterHandle, FilterHandleList, LayerHandle, RenderTarget,
};

use crate::command::{Command, CommandLog};

/// The layer that is always at the bottom of a [`RecordingTarget`].
pub const BASE_LAYER: LayerHandle = LayerHandle(0);

/// Handles returned for saved mask images start here, so they never collide
/// with the small handles tests give their filters.
pub const MASK_HANDLE_BASE: u64 = 1000;

/// A [`RenderTarget`] that tracks a layer stack and scissor region and
/// records every call into a [`CommandLog`].
///
/// Popping the base layer panics, since no correct caller can do it.
pub struct RecordingTarget {
    log: CommandLog,
    stack: Vec<LayerHandle>,
    next_layer_id: u32,
    next_mask_id: u64,
    scissor: Option<IntRect>,
    fail_masks: bool,
}

impl fmt::Debug for RecordingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingTarget")
            .field("stack", &self.stack)
            .field("scissor", &self.scissor)
            .finish_non_exhaustive()
    }
}

impl RecordingTarget {
    /// Creates a target holding only [`BASE_LAYER`], with scissoring off.
    #[must_use]
    pub fn new(log: &CommandLog) -> Self {
        Self {
            log: log.clone(),
            stack: vec![BASE_LAYER],
            next_layer_id: 1,
            next_mask_id: MASK_HANDLE_BASE,
            scissor: None,
            fail_masks: false,
        }
    }

    /// Starts with `region` as the scissor, without recording it.
    #[must_use]
    pub fn with_scissor(mut self, region: IntRect) -> Self {
        self.scissor = Some(region);
        self
    }

    /// Makes [`save_layer_as_mask_image`](RenderTarget::save_layer_as_mask_image)
    /// fail.
    #[must_use]
    pub fn with_failing_masks(mut self) -> Self {
        self.fail_masks = true;
        self
    }

    /// Number of layers above [`BASE_LAYER`].
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

impl RenderTarget for RecordingTarget {
    fn push_layer(&mut self) -> LayerHandle {
        let layer = LayerHandle(self.next_layer_id);
        self.next_layer_id += 1;
        self.stack.push(layer);
        self.log.record(Command::PushLayer(layer));
        layer
    }

    fn pop_layer(&mut self) {
        assert!(self.stack.len() > 1, "popped the base layer");
        if let Some(layer) = self.stack.pop() {
            self.log.record(Command::PopLayer(layer));
        }
    }

    fn top_layer(&self) -> LayerHandle {
        self.stack.last().copied().unwrap_or(BASE_LAYER)
    }

    fn next_layer(&self) -> LayerHandle {
        self.stack.iter().rev().nth(1).copied().unwrap_or(BASE_LAYER)
    }

    fn scissor_region(&self) -> Option<IntRect> {
        self.scissor
    }

    fn set_scissor_region(&mut self, region: Option<IntRect>) {
        self.scissor = region;
        self.log.record(Command::SetScissor(region));
    }

    fn composite_layers(
        &mut self,
        source: LayerHandle,
        destination: LayerHandle,
        blend_mode: BlendMode,
        filters: &[FilterHandle],
    ) {
        self.log.record(Command::Composite {
            source,
            destination,
            blend_mode,
            filters: filters.to_vec(),
        });
    }

    fn save_layer_as_mask_image(&mut self) -> Option<Box<dyn CompiledFilter>> {
        if self.fail_masks {
            self.log.record(Command::SaveMask(None));
            return None;
        }
        let handle = FilterHandle(self.next_mask_id);
        self.next_mask_id += 1;
        self.log.record(Command::SaveMask(Some(handle)));
        Some(Box::new(RecordedFilter::new(handle, &self.log)))
    }
}

/// A compiled filter that records when it is dropped.
pub struct RecordedFilter {
    handle: FilterHandle,
    log: CommandLog,
}

impl fmt::Debug for RecordedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordedFilter")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl RecordedFilter {
    /// Wraps `handle`.
    #[must_use]
    pub fn new(handle: FilterHandle, log: &CommandLog) -> Self {
        Self {
            handle,
            log: log.clone(),
        }
    }
}

impl CompiledFilter for RecordedFilter {
    fn add_handle_to(&self, handles: &mut FilterHandleList) {
        handles.push(self.handle);
    }
}

impl Drop for RecordedFilter {
    fn drop(&mut self) {
        self.log.record(Command::DropCompiled(self.handle));
    }
}
