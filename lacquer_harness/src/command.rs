// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recorded command stream.
//!
//! Every double in this crate appends to a shared [`CommandLog`], so a test
//! sees render-target calls and decorator/filter callbacks interleaved in the
//! order they happened.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lacquer_core::geometry::{BoxArea, IntRect};
use lacquer_effects::{BlendMode, DataHandle, FilterHandle, LayerHandle};

/// One observable call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// [`RenderTarget::push_layer`](lacquer_effects::RenderTarget::push_layer).
    PushLayer(LayerHandle),
    /// [`RenderTarget::pop_layer`](lacquer_effects::RenderTarget::pop_layer),
    /// with the layer that was popped.
    PopLayer(LayerHandle),
    /// The scissor region changed.
    SetScissor(Option<IntRect>),
    /// A layer was composited.
    Composite {
        /// Layer read from.
        source: LayerHandle,
        /// Layer written to.
        destination: LayerHandle,
        /// Blend mode used.
        blend_mode: BlendMode,
        /// Filter chain, in application order.
        filters: Vec<FilterHandle>,
    },
    /// The top layer was saved as a mask image.
    SaveMask(Option<FilterHandle>),
    /// An element clipped to its shape.
    SetClip {
        /// Element address.
        element: String,
        /// Whether the border box was requested instead of the regular clip.
        border_box: bool,
    },
    /// A decorator generated element data.
    GenerateData {
        /// Decorator name.
        decorator: String,
        /// Requested paint area.
        paint_area: BoxArea,
        /// The data produced, if any.
        data: Option<DataHandle>,
    },
    /// A decorator released element data.
    ReleaseData {
        /// Decorator name.
        decorator: String,
        /// The data released.
        data: DataHandle,
    },
    /// A decorator drew into a layer.
    RenderDecorator {
        /// Decorator name.
        decorator: String,
        /// The data it drew with.
        data: DataHandle,
        /// The layer it drew into.
        layer: LayerHandle,
    },
    /// A filter was compiled for an element.
    CompileFilter {
        /// Filter name.
        filter: String,
        /// The handle produced, if compilation succeeded.
        handle: Option<FilterHandle>,
    },
    /// A compiled filter was dropped.
    DropCompiled(FilterHandle),
}

impl Command {
    /// Returns `true` for commands issued to the render target itself.
    #[must_use]
    pub fn is_target_call(&self) -> bool {
        matches!(
            self,
            Self::PushLayer(_)
                | Self::PopLayer(_)
                | Self::SetScissor(_)
                | Self::Composite { .. }
                | Self::SaveMask(_)
        )
    }
}

/// A shared, append-only list of [`Command`]s.
///
/// Cloning yields another handle to the same list.
#[derive(Clone, Default)]
pub struct CommandLog(Rc<RefCell<Vec<Command>>>);

impl fmt::Debug for CommandLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLog")
            .field("len", &self.0.borrow().len())
            .finish_non_exhaustive()
    }
}

impl CommandLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn record(&self, command: Command) {
        self.0.borrow_mut().push(command);
    }

    /// A copy of everything recorded so far.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        self.0.borrow().clone()
    }

    /// Removes and returns everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Number of recorded commands matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// Number of layers pushed.
    #[must_use]
    pub fn pushes(&self) -> usize {
        self.count(|c| matches!(c, Command::PushLayer(_)))
    }

    /// Number of layers popped.
    #[must_use]
    pub fn pops(&self) -> usize {
        self.count(|c| matches!(c, Command::PopLayer(_)))
    }

    /// Every composite, in order, as `(source, destination, filters)`.
    #[must_use]
    pub fn composites(&self) -> Vec<(LayerHandle, LayerHandle, Vec<FilterHandle>)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Command::Composite {
                    source,
                    destination,
                    filters,
                    ..
                } => Some((*source, *destination, filters.clone())),
                _ => None,
            })
            .collect()
    }
}
