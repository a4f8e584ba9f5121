// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-context damage accumulation for partial re-rendering.
//!
//! A [`DamageRegistry`] keeps one [`DamageContextState`] per rendering
//! context. Each state folds partial damage into a single union rectangle
//! and remembers the last screen box every element was rendered at, so that
//! moving, resizing, or removing an element damages exactly the area it used
//! to cover plus the area it covers now.
//!
//! # State creation
//!
//! Only the marking operations ([`mark_full`](DamageRegistry::mark_full),
//! [`mark_rect`](DamageRegistry::mark_rect), and the bbox updates) create a
//! context entry. Queries, clears, and unregistration never do, so contexts
//! that never accumulate damage never occupy the registry.
//!
//! # Frame loop
//!
//! ```rust,ignore
//! // Layout moved an element.
//! registry.update_rendered_bbox(ctx, element, new_box);
//!
//! // Element removed: damage where it was, then forget it.
//! registry.mark_old_bbox(ctx, removed);
//! registry.unregister(ctx, removed);
//!
//! // Present.
//! let damage = registry.take_damage(ctx);
//! if damage.full_damage {
//!     redraw_everything();
//! } else if let Some(rect) = damage.union_rect {
//!     redraw(rect);
//! }
//! ```

use alloc::collections::BTreeMap;

use crate::geometry::{IntRect, union_if_valid};
use crate::id::{ContextId, ElementId};

/// Snapshot of a context's outstanding damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageInfo {
    /// Whether any damage, full or partial, is outstanding.
    pub has_damage: bool,
    /// Whether the whole context must be redrawn. Dominates `union_rect`.
    pub full_damage: bool,
    /// Smallest rectangle covering all partial damage, if any.
    pub union_rect: Option<IntRect>,
}

impl DamageInfo {
    /// Returns `true` if nothing needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_damage
    }
}

/// Damage bookkeeping for one rendering context.
#[derive(Clone, Debug, Default)]
pub struct DamageContextState {
    full_damage: bool,
    has_damage: bool,
    union_rect: Option<IntRect>,
    last_rendered_bbox: BTreeMap<ElementId, IntRect>,
}

impl DamageContextState {
    fn mark_full(&mut self) {
        self.full_damage = true;
        self.has_damage = true;
        self.union_rect = None;
    }

    fn mark_rect(&mut self, rect: IntRect) {
        if !rect.is_valid() {
            return;
        }
        self.has_damage = true;
        if self.full_damage {
            return;
        }
        self.union_rect = Some(match self.union_rect {
            Some(union) => union.union(rect),
            None => rect,
        });
    }

    fn clear(&mut self) {
        self.has_damage = false;
        self.full_damage = false;
        self.union_rect = None;
    }

    fn info(&self) -> DamageInfo {
        DamageInfo {
            has_damage: self.has_damage,
            full_damage: self.full_damage,
            union_rect: self.union_rect,
        }
    }

    /// Stores `new_box` and returns `true` if the element was already tracked.
    fn record_bbox(&mut self, element: ElementId, new_box: IntRect) -> bool {
        match self.last_rendered_bbox.insert(element, new_box) {
            Some(old_box) => {
                if old_box != new_box {
                    if let Some(damage) = union_if_valid(old_box, new_box) {
                        self.mark_rect(damage);
                    }
                }
                true
            }
            None => false,
        }
    }
}

/// Damage state for every rendering context, keyed by [`ContextId`].
///
/// The registry is owned by the rendering subsystem. Context and element
/// owners must call [`on_context_destroyed`](Self::on_context_destroyed) and
/// [`on_element_destroyed`](Self::on_element_destroyed) when tearing down, or
/// their entries stay alive.
#[derive(Clone, Debug, Default)]
pub struct DamageRegistry {
    states: BTreeMap<ContextId, DamageContextState>,
}

impl DamageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts with state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no context has state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Returns whether `ctx` has an entry.
    #[must_use]
    pub fn is_tracked(&self, ctx: ContextId) -> bool {
        self.states.contains_key(&ctx)
    }

    /// Number of elements with a recorded box in `ctx`.
    #[must_use]
    pub fn tracked_elements(&self, ctx: ContextId) -> usize {
        self.states
            .get(&ctx)
            .map_or(0, |state| state.last_rendered_bbox.len())
    }

    /// Returns the last box recorded for `element`, if any.
    #[must_use]
    pub fn rendered_bbox(&self, ctx: ContextId, element: ElementId) -> Option<IntRect> {
        self.states
            .get(&ctx)?
            .last_rendered_bbox
            .get(&element)
            .copied()
    }

    fn state_mut(&mut self, ctx: ContextId) -> &mut DamageContextState {
        self.states.entry(ctx).or_default()
    }

    /// Marks the whole context as needing a redraw.
    pub fn mark_full(&mut self, ctx: ContextId) {
        log::trace!("{ctx:?}: full damage");
        self.state_mut(ctx).mark_full();
    }

    /// Folds `rect` into the context's damage union.
    ///
    /// Invalid rectangles are ignored and do not create state.
    pub fn mark_rect(&mut self, ctx: ContextId, rect: IntRect) {
        if !rect.is_valid() {
            return;
        }
        self.state_mut(ctx).mark_rect(rect);
    }

    /// Marks the last box recorded for `element` as damage.
    ///
    /// Does nothing if the context or element is untracked.
    pub fn mark_old_bbox(&mut self, ctx: ContextId, element: ElementId) {
        let Some(state) = self.states.get_mut(&ctx) else {
            return;
        };
        if let Some(&old_box) = state.last_rendered_bbox.get(&element) {
            state.mark_rect(old_box);
        }
    }

    /// Records where `element` was rendered this frame.
    ///
    /// If the element was already tracked at a different box, the union of
    /// the old and new boxes is marked as damage. A first appearance is only
    /// recorded: the caller is responsible for damaging a newly visible
    /// element, or should use [`register_and_mark`](Self::register_and_mark).
    pub fn update_rendered_bbox(&mut self, ctx: ContextId, element: ElementId, new_box: IntRect) {
        self.state_mut(ctx).record_bbox(element, new_box);
    }

    /// Like [`update_rendered_bbox`](Self::update_rendered_bbox), but a first
    /// appearance also marks `new_box` as damage.
    pub fn register_and_mark(&mut self, ctx: ContextId, element: ElementId, new_box: IntRect) {
        let state = self.state_mut(ctx);
        if !state.record_bbox(element, new_box) {
            state.mark_rect(new_box);
        }
    }

    /// Forgets the recorded box of `element`.
    ///
    /// Does not mark damage; call [`mark_old_bbox`](Self::mark_old_bbox)
    /// first when the element's last box still shows on screen.
    pub fn unregister(&mut self, ctx: ContextId, element: ElementId) {
        if let Some(state) = self.states.get_mut(&ctx) {
            state.last_rendered_bbox.remove(&element);
        }
    }

    /// Returns the outstanding damage without clearing it.
    #[must_use]
    pub fn peek_damage(&self, ctx: ContextId) -> DamageInfo {
        self.states
            .get(&ctx)
            .map(DamageContextState::info)
            .unwrap_or_default()
    }

    /// Resets the context's damage. Recorded boxes are kept.
    pub fn clear_damage(&mut self, ctx: ContextId) {
        if let Some(state) = self.states.get_mut(&ctx) {
            state.clear();
        }
    }

    /// Returns the outstanding damage and clears it.
    pub fn take_damage(&mut self, ctx: ContextId) -> DamageInfo {
        let Some(state) = self.states.get_mut(&ctx) else {
            return DamageInfo::default();
        };
        let info = state.info();
        state.clear();
        info
    }

    /// Drops all state for a context that is going away.
    pub fn on_context_destroyed(&mut self, ctx: ContextId) {
        if self.states.remove(&ctx).is_some() {
            log::debug!("{ctx:?}: damage state released");
        }
    }

    /// Drops the recorded box of an element that is going away, in every
    /// context.
    pub fn on_element_destroyed(&mut self, element: ElementId) {
        for state in self.states.values_mut() {
            state.last_rendered_bbox.remove(&element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: ContextId = ContextId(1);

    fn el(idx: u32) -> ElementId {
        ElementId::new(idx, 0)
    }

    #[test]
    fn rects_accumulate_into_union() {
        let mut reg = DamageRegistry::new();
        reg.mark_rect(CTX, IntRect::new(0, 0, 10, 10));
        reg.mark_rect(CTX, IntRect::new(5, 5, 20, 20));
        let info = reg.peek_damage(CTX);
        assert!(info.has_damage);
        assert!(!info.full_damage);
        assert_eq!(info.union_rect, Some(IntRect::new(0, 0, 20, 20)));
    }

    #[test]
    fn union_of_many_rects_is_their_bounding_box() {
        let rects = [
            IntRect::new(3, 7, 4, 9),
            IntRect::new(-5, 2, 0, 3),
            IntRect::new(10, -1, 12, 0),
            IntRect::new(0, 0, 0, 0),
        ];
        let mut reg = DamageRegistry::new();
        for rect in rects {
            reg.mark_rect(CTX, rect);
        }
        assert_eq!(
            reg.peek_damage(CTX).union_rect,
            Some(IntRect::new(-5, -1, 12, 9))
        );
    }

    #[test]
    fn invalid_rect_is_ignored_without_creating_state() {
        let mut reg = DamageRegistry::new();
        reg.mark_rect(CTX, IntRect::new(10, 10, 0, 0));
        assert!(reg.is_empty());
        assert!(reg.peek_damage(CTX).is_empty());
    }

    #[test]
    fn full_damage_dominates_later_rects() {
        let mut reg = DamageRegistry::new();
        reg.mark_rect(CTX, IntRect::new(0, 0, 1, 1));
        reg.mark_full(CTX);
        reg.mark_rect(CTX, IntRect::new(0, 0, 50, 50));
        reg.mark_rect(CTX, IntRect::new(100, 100, 200, 200));
        let info = reg.peek_damage(CTX);
        assert!(info.full_damage);
        assert!(info.has_damage);
        assert_eq!(info.union_rect, None);
    }

    #[test]
    fn clear_resets_damage_but_keeps_history() {
        let mut reg = DamageRegistry::new();
        reg.update_rendered_bbox(CTX, el(1), IntRect::new(0, 0, 5, 5));
        reg.mark_full(CTX);
        reg.clear_damage(CTX);
        assert_eq!(reg.peek_damage(CTX), DamageInfo::default());
        assert_eq!(reg.tracked_elements(CTX), 1);
    }

    #[test]
    fn peek_on_untouched_context_creates_nothing() {
        let mut reg = DamageRegistry::new();
        let info = reg.peek_damage(ContextId(7));
        assert_eq!(info, DamageInfo::default());
        reg.clear_damage(ContextId(7));
        reg.unregister(ContextId(7), el(0));
        reg.mark_old_bbox(ContextId(7), el(0));
        assert!(reg.is_empty(), "read-only operations must not create state");
    }

    #[test]
    fn first_bbox_is_recorded_without_damage() {
        let mut reg = DamageRegistry::new();
        reg.update_rendered_bbox(CTX, el(1), IntRect::new(0, 0, 5, 5));
        assert!(reg.peek_damage(CTX).is_empty());
        assert_eq!(
            reg.rendered_bbox(CTX, el(1)),
            Some(IntRect::new(0, 0, 5, 5))
        );

        reg.update_rendered_bbox(CTX, el(1), IntRect::new(10, 10, 15, 15));
        let info = reg.peek_damage(CTX);
        assert!(info.has_damage);
        assert_eq!(info.union_rect, Some(IntRect::new(0, 0, 15, 15)));
    }

    #[test]
    fn unchanged_bbox_marks_nothing() {
        let mut reg = DamageRegistry::new();
        let b = IntRect::new(2, 2, 8, 8);
        reg.update_rendered_bbox(CTX, el(1), b);
        reg.update_rendered_bbox(CTX, el(1), b);
        reg.update_rendered_bbox(CTX, el(1), b);
        assert!(reg.peek_damage(CTX).is_empty());
    }

    #[test]
    fn register_and_mark_damages_first_appearance() {
        let mut reg = DamageRegistry::new();
        reg.register_and_mark(CTX, el(4), IntRect::new(1, 1, 3, 3));
        assert_eq!(
            reg.peek_damage(CTX).union_rect,
            Some(IntRect::new(1, 1, 3, 3))
        );

        reg.clear_damage(CTX);
        reg.register_and_mark(CTX, el(4), IntRect::new(1, 1, 3, 3));
        assert!(reg.peek_damage(CTX).is_empty(), "unchanged box is not damage");
    }

    #[test]
    fn unregister_disables_old_bbox_marking() {
        let mut reg = DamageRegistry::new();
        reg.update_rendered_bbox(CTX, el(1), IntRect::new(0, 0, 5, 5));
        reg.mark_old_bbox(CTX, el(1));
        assert_eq!(
            reg.take_damage(CTX).union_rect,
            Some(IntRect::new(0, 0, 5, 5))
        );

        reg.unregister(CTX, el(1));
        reg.mark_old_bbox(CTX, el(1));
        assert!(reg.peek_damage(CTX).is_empty());
    }

    #[test]
    fn take_damage_clears() {
        let mut reg = DamageRegistry::new();
        reg.mark_rect(CTX, IntRect::new(0, 0, 1, 1));
        assert!(reg.take_damage(CTX).has_damage);
        assert!(reg.peek_damage(CTX).is_empty());
    }

    #[test]
    fn contexts_are_independent() {
        let mut reg = DamageRegistry::new();
        reg.mark_full(ContextId(1));
        reg.mark_rect(ContextId(2), IntRect::new(0, 0, 2, 2));
        assert!(reg.peek_damage(ContextId(1)).full_damage);
        assert!(!reg.peek_damage(ContextId(2)).full_damage);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn teardown_hooks_release_state() {
        let mut reg = DamageRegistry::new();
        reg.update_rendered_bbox(ContextId(1), el(1), IntRect::new(0, 0, 1, 1));
        reg.update_rendered_bbox(ContextId(2), el(1), IntRect::new(0, 0, 1, 1));
        reg.update_rendered_bbox(ContextId(2), el(2), IntRect::new(0, 0, 1, 1));

        reg.on_element_destroyed(el(1));
        assert_eq!(reg.tracked_elements(ContextId(1)), 0);
        assert_eq!(reg.tracked_elements(ContextId(2)), 1);

        reg.on_context_destroyed(ContextId(2));
        assert!(!reg.is_tracked(ContextId(2)));
        assert!(reg.is_tracked(ContextId(1)));
    }

    #[test]
    fn reused_slot_does_not_inherit_history() {
        let mut reg = DamageRegistry::new();
        reg.update_rendered_bbox(CTX, ElementId::new(0, 0), IntRect::new(0, 0, 5, 5));
        reg.update_rendered_bbox(CTX, ElementId::new(0, 1), IntRect::new(50, 50, 60, 60));
        assert!(
            reg.peek_damage(CTX).is_empty(),
            "a new generation is a first appearance"
        );
    }
}
