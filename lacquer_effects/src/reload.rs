// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Regenerating per-element decorator data and compiled filters.

use alloc::vec::Vec;

use crate::element::Element;
use crate::error::EffectsError;
use crate::state::{CacheState, EffectsState};

impl EffectsState {
    /// Regenerates decorator data and recompiles filters if
    /// [`dirty_effects_data`](Self::dirty_effects_data) was called, or effects
    /// were just instanced.
    ///
    /// Entries that fail keep no data and render nothing. Failures do not
    /// stop the remaining entries; at most one warning per kind is logged,
    /// and the same aggregate errors are returned.
    pub fn reload_effects_data(&mut self, element: &dyn Element) -> Vec<EffectsError> {
        let mut errors = Vec::new();
        if self.cache != CacheState::DataDirty {
            return errors;
        }
        self.cache = CacheState::Clean;

        let mut decorator_data_failed = false;
        for entry in self
            .decorators
            .iter_mut()
            .chain(self.mask_images.iter_mut())
        {
            let old_data = entry.data.take();
            entry.data = entry
                .decorator
                .generate_element_data(element, entry.paint_area);
            decorator_data_failed |= entry.data.is_none();

            // Released only now so the decorator can carry cached resources
            // over from the old data to the new.
            if let Some(old_data) = old_data {
                entry.decorator.release_element_data(old_data);
            }
        }
        if decorator_data_failed {
            errors.push(EffectsError::DecoratorData {
                element: element.address(),
            });
        }

        let mut filter_compile_failed = false;
        for entry in self
            .filters
            .iter_mut()
            .chain(self.backdrop_filters.iter_mut())
        {
            entry.compiled = entry.filter.compile_filter(element);
            filter_compile_failed |= entry.compiled.is_none();
        }
        if filter_compile_failed {
            errors.push(EffectsError::FilterCompile {
                element: element.address(),
            });
        }

        for err in &errors {
            log::warn!("{err}");
        }
        errors
    }
}
