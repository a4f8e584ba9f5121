// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorators, mask images, filters, and backdrop filters composited through
//! offscreen layers.
//!
//! Each element with visual effects owns an [`EffectsState`]. The state is
//! invalidated by style changes, rebuilt lazily from the element's declared
//! style, and driven by the renderer through three [`RenderStage`]s per frame.
//! It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   style change ──► dirty_effects() / dirty_effects_data()
//!                           │
//!   render_effects(stage)   ▼
//!       ├─ instance_effects()     Element + StyleSheet + FilterInstancer
//!       │                           ──► Decorator / Filter (shared, Rc)
//!       ├─ reload_effects_data()  ──► DataHandle / CompiledFilter (owned)
//!       └─ Enter / Decoration / Exit
//!               │
//!               ▼
//!          RenderTarget: push/pop layers, scissor, composite_layers()
//! ```
//!
//! **[`element`]**: the [`Element`], [`StyleSheet`], and [`FilterInstancer`]
//! seams to the style system, and the declared-value types.
//!
//! **[`effect`]**: the [`Decorator`] and [`Filter`] capabilities.
//!
//! **[`target`]**: the layer-stack [`RenderTarget`].
//!
//! **[`scope`]**: [`LayerScope`] and [`ScissorScope`] guards that keep layer
//! pushes and scissor changes balanced.
//!
//! **[`state`]**: [`EffectsState`] and its [`CacheState`].
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod composite;
pub mod effect;
pub mod element;
mod error;
mod instance;
mod reload;
pub mod scope;
pub mod state;
pub mod target;

pub use composite::RenderStage;
pub use effect::{DataHandle, Decorator, Filter};
pub use element::{
    Declared, DecoratorDeclaration, DecoratorDeclarationList, DecoratorSlot, EffectFlags, Element,
    FilterDeclaration, FilterDeclarationList, FilterInstancer, FilterProperties, FilterSlot,
    PropertySource, StyleSheet,
};
pub use error::EffectsError;
pub use scope::{LayerScope, ScissorScope};
pub use state::{CacheState, DecoratorEntry, EffectsState, FilterEntry};
pub use target::{
    BlendMode, CompiledFilter, FilterHandle, FilterHandleList, LayerHandle, RenderTarget,
};
