// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the effects layer needs from elements and style.
//!
//! The style cascade, property parsing, layout, and the element tree live
//! outside this crate. They are reached only through [`Element`],
//! [`StyleSheet`], and [`FilterInstancer`], plus the declared-value types
//! below, which the style system fills in.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use lacquer_core::geometry::BoxArea;

use crate::effect::{Decorator, Filter};
use crate::target::RenderTarget;

/// Which effect-bearing properties an element's computed style sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EffectFlags {
    /// `decorator` is set.
    pub decorator: bool,
    /// `mask-image` is set.
    pub mask_image: bool,
    /// `filter` is set.
    pub filter: bool,
    /// `backdrop-filter` is set.
    pub backdrop_filter: bool,
}

impl EffectFlags {
    /// Whether the given decorator-bearing property is set.
    #[must_use]
    pub const fn has_decorators(self, slot: DecoratorSlot) -> bool {
        match slot {
            DecoratorSlot::Decorator => self.decorator,
            DecoratorSlot::MaskImage => self.mask_image,
        }
    }

    /// Whether the given filter-bearing property is set.
    #[must_use]
    pub const fn has_filters(self, slot: FilterSlot) -> bool {
        match slot {
            FilterSlot::Filter => self.filter,
            FilterSlot::BackdropFilter => self.backdrop_filter,
        }
    }
}

/// A property holding a list of decorators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecoratorSlot {
    /// `decorator`: painted behind the element's content.
    Decorator,
    /// `mask-image`: rendered into a mask applied when compositing.
    MaskImage,
}

impl DecoratorSlot {
    /// Paint area used when a declaration leaves it as [`BoxArea::Auto`].
    #[must_use]
    pub const fn default_paint_area(self) -> BoxArea {
        match self {
            Self::Decorator => BoxArea::Padding,
            Self::MaskImage => BoxArea::Border,
        }
    }
}

/// A property holding a list of filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterSlot {
    /// `filter`: applied to the element's own content.
    Filter,
    /// `backdrop-filter`: applied to whatever is behind the element.
    BackdropFilter,
}

/// Where a property value was declared, for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertySource {
    /// Style sheet or document path.
    pub path: String,
    /// One-based line number, or `0` if unknown.
    pub line: i32,
}

impl PropertySource {
    /// Creates a source location.
    #[must_use]
    pub fn new(path: impl Into<String>, line: i32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// A declared property value together with where it was declared.
#[derive(Debug)]
pub struct Declared<'a, T> {
    /// The parsed value.
    pub value: &'a T,
    /// Declaration site, if the style system tracked one.
    pub source: Option<&'a PropertySource>,
}

impl<T> Clone for Declared<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Declared<'_, T> {}

/// One declared decorator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoratorDeclaration {
    /// Decorator type name, such as `gradient` or `image`.
    pub kind: String,
    /// Box area the decorator paints into.
    pub paint_area: BoxArea,
}

/// The parsed value of a decorator-bearing property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecoratorDeclarationList {
    /// Declarations in source order.
    pub list: Vec<DecoratorDeclaration>,
    /// The property's source text.
    pub value: String,
}

/// Named filter parameters as parsed by the style system.
pub type FilterProperties = BTreeMap<String, String>;

/// One declared filter.
#[derive(Clone)]
pub struct FilterDeclaration {
    /// Filter type name, such as `blur` or `drop-shadow`.
    pub kind: String,
    /// Parameters for the instancer.
    pub properties: FilterProperties,
    /// Factory registered for `kind`.
    pub instancer: Rc<dyn FilterInstancer>,
}

impl fmt::Debug for FilterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDeclaration")
            .field("kind", &self.kind)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// The parsed value of a filter-bearing property.
#[derive(Clone, Debug, Default)]
pub struct FilterDeclarationList {
    /// Declarations in source order.
    pub list: Vec<FilterDeclaration>,
    /// The property's source text.
    pub value: String,
}

/// Creates filters of the kinds it was registered for.
pub trait FilterInstancer {
    /// Instances a filter, or returns `None` if `properties` are unusable.
    fn instance_filter(
        &self,
        kind: &str,
        properties: &FilterProperties,
    ) -> Option<Rc<dyn Filter>>;
}

/// The style sheet active for an element.
pub trait StyleSheet {
    /// Instances every declaration in `declarations`.
    ///
    /// Returns one entry per declaration, `None` where instancing failed, or
    /// an empty list if nothing could be instanced at all. `source` is only
    /// used for diagnostics.
    fn instance_decorators(
        &self,
        target: &mut dyn RenderTarget,
        declarations: &DecoratorDeclarationList,
        source: Option<&PropertySource>,
    ) -> Vec<Option<Rc<dyn Decorator>>>;
}

/// An element whose effects are being rendered.
pub trait Element {
    /// Which effect properties the computed style sets.
    fn effect_flags(&self) -> EffectFlags;

    /// The declared value of a decorator-bearing property.
    fn decorator_property(
        &self,
        slot: DecoratorSlot,
    ) -> Option<Declared<'_, DecoratorDeclarationList>>;

    /// The declared value of a filter-bearing property.
    fn filter_property(&self, slot: FilterSlot) -> Option<Declared<'_, FilterDeclarationList>>;

    /// The style sheet of the owning document.
    fn style_sheet(&self) -> Option<&dyn StyleSheet>;

    /// Source URL of the owning document, if attached to one.
    fn document_url(&self) -> Option<&str>;

    /// A human-readable path to the element, for log messages.
    fn address(&self) -> String;

    /// The element's box at `area` in screen space.
    ///
    /// [`BoxArea::Auto`] asks for the element's full paint bounds.
    fn bounding_box(&self, area: BoxArea) -> Option<Rect>;

    /// Clips subsequent drawing to the element's shape, honoring
    /// `border-radius`. When `clip_to_border_box` is false the element's
    /// regular clipping region (including ancestors and overflow) is used.
    fn set_clipping_region(&self, target: &mut dyn RenderTarget, clip_to_border_box: bool);
}
