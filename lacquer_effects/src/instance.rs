// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building an element's effects from its declared style.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::element::{DecoratorSlot, EffectFlags, Element, FilterSlot, PropertySource};
use crate::error::EffectsError;
use crate::state::{CacheState, DecoratorEntry, EffectsState, FilterEntry};
use crate::target::RenderTarget;

/// The declaration site of a decorator property, or else the owning document.
fn resolve_source<'a>(
    declared: Option<&'a PropertySource>,
    element: &dyn Element,
) -> Option<Cow<'a, PropertySource>> {
    match declared {
        Some(source) => Some(Cow::Borrowed(source)),
        None => element
            .document_url()
            .map(|url| Cow::Owned(PropertySource::new(url, 0))),
    }
}

impl EffectsState {
    /// Rebuilds all effects from style if [`dirty_effects`](Self::dirty_effects)
    /// was called since the last rebuild.
    ///
    /// Previously instanced effects are released first. Individual
    /// decorators or filters that fail to instance are dropped; filter
    /// failures are logged as warnings naming the property's declaration
    /// site, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::MissingRenderTarget`] (also logged) if
    /// `target` is `None`. All effect lists are left empty.
    pub fn instance_effects(
        &mut self,
        element: &dyn Element,
        target: Option<&mut (dyn RenderTarget + '_)>,
    ) -> Result<(), EffectsError> {
        if self.cache != CacheState::StructureDirty {
            return Ok(());
        }
        self.cache = CacheState::DataDirty;
        self.release_effects();

        let Some(target) = target else {
            let err = EffectsError::MissingRenderTarget {
                element: element.address(),
            };
            log::error!("{err}");
            return Err(err);
        };

        let flags = element.effect_flags();
        if flags.decorator || flags.mask_image {
            self.instance_decorators(element, target, flags);
        }
        if flags.filter || flags.backdrop_filter {
            for err in self.instance_filters(element, flags) {
                log::warn!("{err}");
            }
        }

        log::trace!(
            "{}: instanced {} decorators, {} mask images, {} filters, {} backdrop filters",
            element.address(),
            self.decorators.len(),
            self.mask_images.len(),
            self.filters.len(),
            self.backdrop_filters.len(),
        );
        Ok(())
    }

    fn instance_decorators(
        &mut self,
        element: &dyn Element,
        target: &mut dyn RenderTarget,
        flags: EffectFlags,
    ) {
        let Some(style_sheet) = element.style_sheet() else {
            return;
        };

        for slot in [DecoratorSlot::Decorator, DecoratorSlot::MaskImage] {
            if !flags.has_decorators(slot) {
                continue;
            }
            let Some(declared) = element.decorator_property(slot) else {
                continue;
            };
            let declarations = &declared.value.list;
            let source = resolve_source(declared.source, element);

            let instanced =
                style_sheet.instance_decorators(target, declared.value, source.as_deref());
            debug_assert!(
                instanced.is_empty() || instanced.len() == declarations.len(),
                "style sheet returned {} decorators for {} declarations",
                instanced.len(),
                declarations.len()
            );

            let entries = match slot {
                DecoratorSlot::Decorator => &mut self.decorators,
                DecoratorSlot::MaskImage => &mut self.mask_images,
            };
            entries.reserve(declarations.len());

            for (decorator, declaration) in instanced.into_iter().zip(declarations) {
                let Some(decorator) = decorator else {
                    continue;
                };
                let paint_area = declaration.paint_area.or(slot.default_paint_area());
                debug_assert!(
                    paint_area.is_paint_area(),
                    "decorators paint into the border, padding, or content area, got {paint_area:?}"
                );
                entries.push(DecoratorEntry {
                    decorator,
                    paint_area,
                    data: None,
                });
            }
        }
    }

    /// Returns one error per dropped filter.
    fn instance_filters(
        &mut self,
        element: &dyn Element,
        flags: EffectFlags,
    ) -> Vec<EffectsError> {
        let mut errors = Vec::new();
        for slot in [FilterSlot::Filter, FilterSlot::BackdropFilter] {
            if !flags.has_filters(slot) {
                continue;
            }
            let Some(declared) = element.filter_property(slot) else {
                continue;
            };
            let entries = match slot {
                FilterSlot::Filter => &mut self.filters,
                FilterSlot::BackdropFilter => &mut self.backdrop_filters,
            };
            entries.reserve(declared.value.list.len());

            for declaration in &declared.value.list {
                match declaration
                    .instancer
                    .instance_filter(&declaration.kind, &declaration.properties)
                {
                    Some(filter) => entries.push(FilterEntry {
                        filter,
                        compiled: None,
                    }),
                    None => errors.push(EffectsError::FilterInstancing {
                        kind: declaration.kind.clone(),
                        value: declared.value.value.clone(),
                        source: declared.source.cloned(),
                    }),
                }
            }
        }
        errors
    }
}
