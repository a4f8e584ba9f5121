// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for driving `lacquer_effects` without a renderer.
//!
//! A [`RecordingTarget`] and the scripted [`doubles`] all append to one
//! shared [`CommandLog`]. Tests drive an
//! [`EffectsState`](lacquer_effects::EffectsState) through its render stages
//! and then assert on the recorded stream, or dump it with [`pretty`] or
//! [`json`] when an assertion fails.
//!
//! ```rust,ignore
//! let log = CommandLog::new();
//! let mut target = RecordingTarget::new(&log);
//! let element = FakeElement::new("div#box", &log).with_filters(&instancer, &["blur"]);
//! let mut state = EffectsState::new();
//! state.dirty_effects();
//! for stage in [RenderStage::Enter, RenderStage::Decoration, RenderStage::Exit] {
//!     state.render_effects(&element, Some(&mut target), stage);
//! }
//! assert_eq!(log.pushes(), log.pops(), "{}", pretty::format_commands(&log.commands()));
//! ```

pub mod command;
pub mod doubles;
pub mod json;
pub mod pretty;
pub mod target;

pub use command::{Command, CommandLog};
pub use doubles::{FakeDecorator, FakeElement, FakeFilter, FakeFilterInstancer, FakeStyleSheet};
pub use target::{BASE_LAYER, MASK_HANDLE_BASE, RecordedFilter, RecordingTarget};
