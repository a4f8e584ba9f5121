// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering effects through the layer stack.
//!
//! The renderer calls [`EffectsState::render_effects`] three times per element
//! per frame, bracketing the element's own content and its descendants:
//!
//! ```text
//!   Enter       push the element layer (filters, mask images)
//!               composite the backdrop through backdrop filters
//!   Decoration  paint decorators, last-declared first
//!     ... element content, children (their own Enter/Decoration/Exit) ...
//!   Exit        render mask images into a mask layer
//!               composite the element layer down through filters + mask
//!               pop the element layer
//! ```
//!
//! Every layer pushed inside a stage is popped before the stage returns, and
//! every scissor change is undone. The element layer is the only one that
//! spans stages; `Exit` pops it only if `Enter` pushed it.

use kurbo::Rect;
use lacquer_core::geometry::{BoxArea, IntRect, intersect_if_valid};

use crate::element::Element;
use crate::scope::{LayerScope, ScissorScope};
use crate::state::{EffectsState, FilterEntry, extend_ink_overflow};
use crate::target::{BlendMode, FilterHandleList, RenderTarget};

/// Which of the three per-element render passes is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// Before the element's content.
    Enter,
    /// Background decoration, before the element's content.
    Decoration,
    /// After the element's content and all descendants.
    Exit,
}

/// Which clipping rules to apply before compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClipKind {
    /// The element's regular clip, widened by filter ink overflow.
    Filter,
    /// Exactly the element's border box.
    Backdrop,
}

fn collect_handles(entries: &[FilterEntry], handles: &mut FilterHandleList) {
    for entry in entries {
        entry.add_handle_to(handles);
    }
}

impl EffectsState {
    /// Brings effects up to date, then runs `stage`.
    ///
    /// Without a render target nothing is drawn; instancing reports the
    /// missing target once per rebuild.
    pub fn render_effects(
        &mut self,
        element: &dyn Element,
        mut target: Option<&mut (dyn RenderTarget + '_)>,
        stage: RenderStage,
    ) {
        // Failures are logged where they happen and leave the effect inert.
        let _ = self.instance_effects(element, target.as_deref_mut());
        let _ = self.reload_effects_data(element);

        let Some(target) = target else {
            return;
        };
        match stage {
            RenderStage::Enter => self.enter(element, target),
            RenderStage::Decoration => self.render_decorators(element, target),
            RenderStage::Exit => self.exit(element, target),
        }
    }

    /// Grows `bounds` by the ink overflow of every filter and backdrop
    /// filter.
    ///
    /// Instances effects first if needed, so layout can ask before the first
    /// render.
    pub fn extend_ink_overflow_bounds(
        &mut self,
        element: &dyn Element,
        target: Option<&mut (dyn RenderTarget + '_)>,
        bounds: Rect,
    ) -> Rect {
        let _ = self.instance_effects(element, target);
        let bounds = extend_ink_overflow(&self.filters, element, bounds);
        extend_ink_overflow(&self.backdrop_filters, element, bounds)
    }

    fn render_decorators(&self, element: &dyn Element, target: &mut dyn RenderTarget) {
        for entry in self.decorators.iter().rev() {
            if let Some(data) = entry.data {
                entry.decorator.render_element(element, data, target);
            }
        }
    }

    fn enter(&mut self, element: &dyn Element, target: &mut dyn RenderTarget) {
        if !self.needs_layer() && self.backdrop_filters.is_empty() {
            return;
        }

        let backdrop_source = target.top_layer();

        if self.needs_layer() {
            debug_assert!(
                !self.layer_open,
                "{}: Enter called twice without Exit",
                element.address()
            );
            target.push_layer();
            self.layer_open = true;
        }

        if self.backdrop_filters.is_empty() {
            return;
        }

        let backdrop_destination = target.top_layer();
        let mut filter_handles = FilterHandleList::new();
        collect_handles(&self.backdrop_filters, &mut filter_handles);

        // Pushing the element layer leaves the scissor untouched, so the saved
        // region is the one in effect when the stage began.
        let mut scissor = ScissorScope::new(target);
        let initial_scissor = scissor.saved();
        let base_region = self.backdrop_scissor_region(element, initial_scissor, false);
        let extended_region = self.backdrop_scissor_region(element, initial_scissor, true);
        if extended_region != base_region {
            // The filters read outside the element's box (blur, drop shadow),
            // so filter into a temporary layer covering the overflow first and
            // clip to the element's shape afterwards.
            scissor.set_scissor_region(extended_region);
            let mut temp = LayerScope::push(&mut *scissor);
            let temp_layer = temp.layer();
            temp.composite_layers(backdrop_source, temp_layer, BlendMode::Blend, &filter_handles);
            self.apply_clipping_region(element, &mut *temp, ClipKind::Backdrop);
            temp.composite_layers(temp_layer, backdrop_destination, BlendMode::Blend, &[]);
        } else {
            self.apply_clipping_region(element, &mut *scissor, ClipKind::Backdrop);
            scissor.composite_layers(
                backdrop_source,
                backdrop_destination,
                BlendMode::Blend,
                &filter_handles,
            );
        }
    }

    fn exit(&mut self, element: &dyn Element, target: &mut dyn RenderTarget) {
        if !self.layer_open {
            return;
        }
        self.layer_open = false;

        let mut scissor = ScissorScope::new(target);
        self.apply_clipping_region(element, &mut *scissor, ClipKind::Filter);

        let mask_slot = usize::from(!self.mask_images.is_empty());
        let mut filter_handles = FilterHandleList::with_capacity(self.filters.len() + mask_slot);
        collect_handles(&self.filters, &mut filter_handles);

        // Must outlive the composite below, which reads its handle.
        let mask_image = if self.mask_images.is_empty() {
            None
        } else {
            let mut mask_layer = LayerScope::push(&mut *scissor);
            for entry in self.mask_images.iter().rev() {
                if let Some(data) = entry.data {
                    entry.decorator.render_element(element, data, &mut *mask_layer);
                }
            }
            mask_layer.save_layer_as_mask_image()
        };
        if let Some(mask_image) = &mask_image {
            mask_image.add_handle_to(&mut filter_handles);
        }

        let top = scissor.top_layer();
        let next = scissor.next_layer();
        scissor.composite_layers(top, next, BlendMode::Blend, &filter_handles);
        scissor.pop_layer();
    }

    /// Clips to the element's shape and narrows the scissor to the area the
    /// composite may touch.
    fn apply_clipping_region(
        &self,
        element: &dyn Element,
        target: &mut dyn RenderTarget,
        kind: ClipKind,
    ) {
        let clip_to_border_box = kind == ClipKind::Backdrop;
        element.set_clipping_region(target, clip_to_border_box);

        let area = if clip_to_border_box {
            BoxArea::Border
        } else {
            BoxArea::Auto
        };
        let mut region = element.bounding_box(area);
        if kind == ClipKind::Filter {
            region = region.map(|region| extend_ink_overflow(&self.filters, element, region));
        }

        let region = region.map(IntRect::from_rect_expanded);
        target.set_scissor_region(intersect_if_valid(region, target.scissor_region()));
    }

    /// The element's border box on the pixel grid, optionally widened by the
    /// backdrop filters' ink overflow, clipped to `scissor`.
    fn backdrop_scissor_region(
        &self,
        element: &dyn Element,
        scissor: Option<IntRect>,
        extend_for_filters: bool,
    ) -> Option<IntRect> {
        let mut region = element.bounding_box(BoxArea::Border);
        if extend_for_filters {
            region =
                region.map(|region| extend_ink_overflow(&self.backdrop_filters, element, region));
        }
        intersect_if_valid(region.map(IntRect::from_rect_expanded), scissor)
    }
}
