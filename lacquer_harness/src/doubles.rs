// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted decorators, filters, style sheets, and elements.
//!
//! ```rust,ignore
//! let log = CommandLog::new();
//! let mut sheet = FakeStyleSheet::new();
//! sheet.register("gradient", Rc::new(FakeDecorator::new("gradient", &log)));
//! let element = FakeElement::new("div#box", &log)
//!     .with_style_sheet(sheet)
//!     .with_decorators(&[("gradient", BoxArea::Auto)]);
//! ```

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use kurbo::Rect;
use lacquer_core::geometry::BoxArea;
use lacquer_effects::{
    CompiledFilter, DataHandle, Declared, Decorator, DecoratorDeclaration,
    DecoratorDeclarationList, DecoratorSlot, EffectFlags, Element, Filter, FilterDeclaration,
    FilterDeclarationList, FilterHandle, FilterInstancer, FilterProperties, FilterSlot,
    PropertySource, RenderTarget, StyleSheet,
};

use crate::command::{Command, CommandLog};
use crate::target::RecordedFilter;

/// A decorator that records its callbacks and hands out sequential data.
pub struct FakeDecorator {
    name: String,
    log: CommandLog,
    next_data: Cell<u64>,
    fail: bool,
}

impl fmt::Debug for FakeDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDecorator")
            .field("name", &self.name)
            .field("fail", &self.fail)
            .finish_non_exhaustive()
    }
}

impl FakeDecorator {
    /// Creates a decorator whose data handles count up from 1.
    #[must_use]
    pub fn new(name: &str, log: &CommandLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            next_data: Cell::new(1),
            fail: false,
        }
    }

    /// Makes data generation fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl Decorator for FakeDecorator {
    fn generate_element_data(
        &self,
        _element: &dyn Element,
        paint_area: BoxArea,
    ) -> Option<DataHandle> {
        let data = (!self.fail).then(|| {
            let id = self.next_data.get();
            self.next_data.set(id + 1);
            DataHandle(id)
        });
        self.log.record(Command::GenerateData {
            decorator: self.name.clone(),
            paint_area,
            data,
        });
        data
    }

    fn release_element_data(&self, data: DataHandle) {
        self.log.record(Command::ReleaseData {
            decorator: self.name.clone(),
            data,
        });
    }

    fn render_element(
        &self,
        _element: &dyn Element,
        data: DataHandle,
        target: &mut dyn RenderTarget,
    ) {
        self.log.record(Command::RenderDecorator {
            decorator: self.name.clone(),
            data,
            layer: target.top_layer(),
        });
    }
}

/// A filter with a fixed handle and a uniform ink overflow margin.
pub struct FakeFilter {
    name: String,
    log: CommandLog,
    handle: FilterHandle,
    overflow: f64,
    fail_compile: bool,
}

impl fmt::Debug for FakeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeFilter")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .field("overflow", &self.overflow)
            .finish_non_exhaustive()
    }
}

impl FakeFilter {
    /// Creates a filter that compiles to `handle` and paints nothing outside
    /// its input.
    #[must_use]
    pub fn new(name: &str, handle: u64, log: &CommandLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            handle: FilterHandle(handle),
            overflow: 0.0,
            fail_compile: false,
        }
    }

    /// Grows ink overflow by `margin` on every side.
    #[must_use]
    pub fn with_overflow(mut self, margin: f64) -> Self {
        self.overflow = margin;
        self
    }

    /// Makes compilation fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_compile = true;
        self
    }
}

impl Filter for FakeFilter {
    fn compile_filter(&self, _element: &dyn Element) -> Option<Box<dyn CompiledFilter>> {
        let handle = (!self.fail_compile).then_some(self.handle);
        self.log.record(Command::CompileFilter {
            filter: self.name.clone(),
            handle,
        });
        handle.map(|handle| -> Box<dyn CompiledFilter> {
            Box::new(RecordedFilter::new(handle, &self.log))
        })
    }

    fn extend_ink_overflow(&self, _element: &dyn Element, region: Rect) -> Rect {
        region.inflate(self.overflow, self.overflow)
    }
}

/// Instances filters from a fixed table, failing for unknown kinds.
#[derive(Default)]
pub struct FakeFilterInstancer {
    filters: BTreeMap<String, Rc<dyn Filter>>,
}

impl fmt::Debug for FakeFilterInstancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeFilterInstancer")
            .field("kinds", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FakeFilterInstancer {
    /// Creates an instancer that knows no kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances `filter` for every declaration of `kind`.
    pub fn register(&mut self, kind: &str, filter: Rc<dyn Filter>) {
        self.filters.insert(kind.into(), filter);
    }
}

impl FilterInstancer for FakeFilterInstancer {
    fn instance_filter(
        &self,
        kind: &str,
        _properties: &FilterProperties,
    ) -> Option<Rc<dyn Filter>> {
        self.filters.get(kind).cloned()
    }
}

/// Instances decorators from a fixed table, failing for unknown kinds.
#[derive(Default)]
pub struct FakeStyleSheet {
    decorators: BTreeMap<String, Rc<dyn Decorator>>,
}

impl fmt::Debug for FakeStyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeStyleSheet")
            .field("kinds", &self.decorators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FakeStyleSheet {
    /// Creates a style sheet that knows no kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances `decorator` for every declaration of `kind`.
    pub fn register(&mut self, kind: &str, decorator: Rc<dyn Decorator>) {
        self.decorators.insert(kind.into(), decorator);
    }
}

impl StyleSheet for FakeStyleSheet {
    fn instance_decorators(
        &self,
        _target: &mut dyn RenderTarget,
        declarations: &DecoratorDeclarationList,
        _source: Option<&PropertySource>,
    ) -> Vec<Option<Rc<dyn Decorator>>> {
        declarations
            .list
            .iter()
            .map(|declaration| self.decorators.get(&declaration.kind).cloned())
            .collect()
    }
}

/// An element with scripted style and geometry.
///
/// Defaults: no effects, a document at `test.rml`, and a border box of
/// `(10, 10)..(50, 50)` that also serves as the paint bounds.
pub struct FakeElement {
    address: String,
    log: CommandLog,
    flags: EffectFlags,
    decorators: Option<DecoratorDeclarationList>,
    mask_images: Option<DecoratorDeclarationList>,
    filters: Option<FilterDeclarationList>,
    backdrop_filters: Option<FilterDeclarationList>,
    source: Option<PropertySource>,
    style_sheet: Option<FakeStyleSheet>,
    document_url: Option<String>,
    border_box: Option<Rect>,
    paint_bounds: Option<Rect>,
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeElement")
            .field("address", &self.address)
            .field("flags", &self.flags)
            .field("border_box", &self.border_box)
            .finish_non_exhaustive()
    }
}

fn decorator_list(declarations: &[(&str, BoxArea)]) -> DecoratorDeclarationList {
    DecoratorDeclarationList {
        list: declarations
            .iter()
            .map(|&(kind, paint_area)| DecoratorDeclaration {
                kind: kind.into(),
                paint_area,
            })
            .collect(),
        value: declarations
            .iter()
            .map(|(kind, _)| *kind)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn filter_list(instancer: &Rc<FakeFilterInstancer>, kinds: &[&str]) -> FilterDeclarationList {
    let instancer: Rc<dyn FilterInstancer> = instancer.clone();
    FilterDeclarationList {
        list: kinds
            .iter()
            .map(|&kind| FilterDeclaration {
                kind: kind.into(),
                properties: FilterProperties::new(),
                instancer: instancer.clone(),
            })
            .collect(),
        value: kinds.join(" "),
    }
}

impl FakeElement {
    /// Creates an element with no effects.
    #[must_use]
    pub fn new(address: &str, log: &CommandLog) -> Self {
        Self {
            address: address.into(),
            log: log.clone(),
            flags: EffectFlags::default(),
            decorators: None,
            mask_images: None,
            filters: None,
            backdrop_filters: None,
            source: None,
            style_sheet: None,
            document_url: Some("test.rml".into()),
            border_box: Some(Rect::new(10.0, 10.0, 50.0, 50.0)),
            paint_bounds: None,
        }
    }

    /// Uses `sheet` to instance decorators and mask images.
    #[must_use]
    pub fn with_style_sheet(mut self, sheet: FakeStyleSheet) -> Self {
        self.style_sheet = Some(sheet);
        self
    }

    /// Declares `decorator` as `(kind, paint area)` pairs.
    #[must_use]
    pub fn with_decorators(mut self, declarations: &[(&str, BoxArea)]) -> Self {
        self.flags.decorator = true;
        self.decorators = Some(decorator_list(declarations));
        self
    }

    /// Declares `mask-image` as `(kind, paint area)` pairs.
    #[must_use]
    pub fn with_mask_images(mut self, declarations: &[(&str, BoxArea)]) -> Self {
        self.flags.mask_image = true;
        self.mask_images = Some(decorator_list(declarations));
        self
    }

    /// Declares `filter` with filters of the given kinds.
    #[must_use]
    pub fn with_filters(mut self, instancer: &Rc<FakeFilterInstancer>, kinds: &[&str]) -> Self {
        self.flags.filter = true;
        self.filters = Some(filter_list(instancer, kinds));
        self
    }

    /// Declares `backdrop-filter` with filters of the given kinds.
    #[must_use]
    pub fn with_backdrop_filters(
        mut self,
        instancer: &Rc<FakeFilterInstancer>,
        kinds: &[&str],
    ) -> Self {
        self.flags.backdrop_filter = true;
        self.backdrop_filters = Some(filter_list(instancer, kinds));
        self
    }

    /// Overrides the computed-style flags without touching declarations.
    #[must_use]
    pub fn with_flags(mut self, flags: EffectFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Reports `source` as the declaration site of every property.
    #[must_use]
    pub fn with_source(mut self, source: PropertySource) -> Self {
        self.source = Some(source);
        self
    }

    /// Detaches the element from any document.
    #[must_use]
    pub fn without_document(mut self) -> Self {
        self.document_url = None;
        self
    }

    /// Sets the border box.
    #[must_use]
    pub fn with_border_box(mut self, rect: Rect) -> Self {
        self.border_box = Some(rect);
        self
    }

    /// Sets the paint bounds reported for [`BoxArea::Auto`].
    #[must_use]
    pub fn with_paint_bounds(mut self, rect: Rect) -> Self {
        self.paint_bounds = Some(rect);
        self
    }

    fn declared<'a, T>(&'a self, value: Option<&'a T>) -> Option<Declared<'a, T>> {
        value.map(|value| Declared {
            value,
            source: self.source.as_ref(),
        })
    }
}

impl Element for FakeElement {
    fn effect_flags(&self) -> EffectFlags {
        self.flags
    }

    fn decorator_property(
        &self,
        slot: DecoratorSlot,
    ) -> Option<Declared<'_, DecoratorDeclarationList>> {
        match slot {
            DecoratorSlot::Decorator => self.declared(self.decorators.as_ref()),
            DecoratorSlot::MaskImage => self.declared(self.mask_images.as_ref()),
        }
    }

    fn filter_property(&self, slot: FilterSlot) -> Option<Declared<'_, FilterDeclarationList>> {
        match slot {
            FilterSlot::Filter => self.declared(self.filters.as_ref()),
            FilterSlot::BackdropFilter => self.declared(self.backdrop_filters.as_ref()),
        }
    }

    fn style_sheet(&self) -> Option<&dyn StyleSheet> {
        self.style_sheet.as_ref().map(|sheet| sheet as &dyn StyleSheet)
    }

    fn document_url(&self) -> Option<&str> {
        self.document_url.as_deref()
    }

    fn address(&self) -> String {
        self.address.clone()
    }

    fn bounding_box(&self, area: BoxArea) -> Option<Rect> {
        match area {
            BoxArea::Auto => self.paint_bounds.or(self.border_box),
            BoxArea::Margin | BoxArea::Border | BoxArea::Padding | BoxArea::Content => {
                self.border_box
            }
        }
    }

    fn set_clipping_region(&self, _target: &mut dyn RenderTarget, clip_to_border_box: bool) {
        self.log.record(Command::SetClip {
            element: self.address.clone(),
            border_box: clip_to_border_box,
        });
    }
}
