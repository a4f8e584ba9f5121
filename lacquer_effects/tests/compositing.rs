// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer and scissor traffic of the three render stages.

use std::rc::Rc;

use lacquer_core::geometry::{BoxArea, IntRect};
use lacquer_effects::{
    BlendMode, EffectsState, FilterHandle, LayerHandle, RenderStage, RenderTarget,
};
use lacquer_harness::{
    BASE_LAYER, Command, CommandLog, FakeDecorator, FakeElement, FakeFilter, FakeFilterInstancer,
    FakeStyleSheet, MASK_HANDLE_BASE, RecordingTarget, json, pretty,
};

const TINT: FilterHandle = FilterHandle(1);
const BLUR: FilterHandle = FilterHandle(3);
const MASK: FilterHandle = FilterHandle(MASK_HANDLE_BASE);

struct Fixture {
    log: CommandLog,
    target: RecordingTarget,
    state: EffectsState,
}

impl Fixture {
    fn new() -> Self {
        let log = CommandLog::new();
        let target = RecordingTarget::new(&log);
        let mut state = EffectsState::new();
        state.dirty_effects();
        Self { log, target, state }
    }

    fn with_scissor(region: IntRect) -> Self {
        let mut fixture = Self::new();
        fixture.target = RecordingTarget::new(&fixture.log).with_scissor(region);
        fixture
    }

    fn render(&mut self, element: &FakeElement, stage: RenderStage) {
        self.state.render_effects(element, Some(&mut self.target), stage);
    }

    fn frame(&mut self, element: &FakeElement) {
        for stage in [RenderStage::Enter, RenderStage::Decoration, RenderStage::Exit] {
            self.render(element, stage);
        }
    }

    fn target_calls(&self) -> Vec<Command> {
        self.log
            .commands()
            .into_iter()
            .filter(Command::is_target_call)
            .collect()
    }

    fn dump(&self) -> String {
        pretty::format_commands(&self.log.commands())
    }
}

fn instancer(log: &CommandLog) -> Rc<FakeFilterInstancer> {
    let mut instancer = FakeFilterInstancer::new();
    instancer.register("tint", Rc::new(FakeFilter::new("tint", TINT.0, log)));
    instancer.register(
        "blur",
        Rc::new(FakeFilter::new("blur", BLUR.0, log).with_overflow(4.0)),
    );
    Rc::new(instancer)
}

fn style_sheet(log: &CommandLog) -> FakeStyleSheet {
    let mut sheet = FakeStyleSheet::new();
    for kind in ["a", "b", "mask"] {
        sheet.register(kind, Rc::new(FakeDecorator::new(kind, log)));
    }
    sheet
}

fn combo(log: &CommandLog, filter: bool, backdrop: bool, mask: bool) -> FakeElement {
    let filters = instancer(log);
    let mut element = FakeElement::new("div#combo", log).with_style_sheet(style_sheet(log));
    if filter {
        element = element.with_filters(&filters, &["tint"]);
    }
    if backdrop {
        element = element.with_backdrop_filters(&filters, &["tint"]);
    }
    if mask {
        element = element.with_mask_images(&[("mask", BoxArea::Auto)]);
    }
    element
}

fn composite(source: u32, destination: u32, filters: &[FilterHandle]) -> Command {
    Command::Composite {
        source: LayerHandle(source),
        destination: LayerHandle(destination),
        blend_mode: BlendMode::Blend,
        filters: filters.to_vec(),
    }
}

fn border_box() -> IntRect {
    IntRect::new(10, 10, 50, 50)
}

#[test_log::test]
fn every_combination_balances_layers() {
    for bits in 0..8_u8 {
        let (filter, backdrop, mask) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let mut fx = Fixture::new();
        let element = combo(&fx.log, filter, backdrop, mask);

        fx.render(&element, RenderStage::Enter);
        assert_eq!(
            fx.target.depth(),
            usize::from(filter || mask),
            "element layer after Enter (filter={filter} backdrop={backdrop} mask={mask}):\n{}",
            fx.dump()
        );
        fx.render(&element, RenderStage::Decoration);
        fx.render(&element, RenderStage::Exit);

        assert_eq!(fx.target.depth(), 0, "unbalanced:\n{}", fx.dump());
        assert_eq!(fx.log.pushes(), fx.log.pops(), "unbalanced:\n{}", fx.dump());
        assert_eq!(
            fx.log.pushes(),
            usize::from(filter || mask) + usize::from(mask),
            "push count:\n{}",
            fx.dump()
        );
        assert_eq!(
            fx.log.composites().len(),
            usize::from(filter || mask) + usize::from(backdrop),
            "composite count:\n{}",
            fx.dump()
        );
        assert_eq!(fx.target.scissor_region(), None, "scissor leaked:\n{}", fx.dump());
    }
}

#[test_log::test]
fn filter_and_mask_composite_through_one_chain() {
    let mut fx = Fixture::new();
    let element = combo(&fx.log, true, false, true);
    fx.frame(&element);

    assert_eq!(
        fx.target_calls(),
        vec![
            Command::PushLayer(LayerHandle(1)),
            Command::SetScissor(Some(border_box())),
            Command::PushLayer(LayerHandle(2)),
            Command::SaveMask(Some(MASK)),
            Command::PopLayer(LayerHandle(2)),
            composite(1, 0, &[TINT, MASK]),
            Command::PopLayer(LayerHandle(1)),
            Command::SetScissor(None),
        ],
        "{}",
        fx.dump()
    );

    let commands = fx.log.commands();
    assert!(
        commands.contains(&Command::RenderDecorator {
            decorator: "mask".into(),
            data: lacquer_effects::DataHandle(1),
            layer: LayerHandle(2),
        }),
        "mask renders into its own layer:\n{}",
        fx.dump()
    );
    let composited = commands
        .iter()
        .position(|c| matches!(c, Command::Composite { .. }));
    let mask_dropped = commands
        .iter()
        .position(|c| *c == Command::DropCompiled(MASK));
    assert!(
        composited < mask_dropped,
        "mask outlives the composite:\n{}",
        fx.dump()
    );
}

#[test_log::test]
fn exit_clips_to_regular_region() {
    let mut fx = Fixture::new();
    let element = combo(&fx.log, true, false, false);
    fx.frame(&element);
    assert!(
        fx.log.commands().contains(&Command::SetClip {
            element: "div#combo".into(),
            border_box: false,
        }),
        "{}",
        fx.dump()
    );
}

#[test_log::test]
fn exit_scissor_covers_filter_overflow() {
    let mut fx = Fixture::new();
    let element =
        FakeElement::new("div#blurred", &fx.log).with_filters(&instancer(&fx.log), &["blur"]);
    fx.frame(&element);
    assert!(
        fx.target_calls()
            .contains(&Command::SetScissor(Some(IntRect::new(6, 6, 54, 54)))),
        "{}",
        fx.dump()
    );
}

#[test_log::test]
fn backdrop_without_overflow_composites_in_place() {
    let mut fx = Fixture::new();
    let element = combo(&fx.log, false, true, false);
    fx.frame(&element);

    assert_eq!(
        fx.target_calls(),
        vec![
            Command::SetScissor(Some(border_box())),
            composite(0, 0, &[TINT]),
            Command::SetScissor(None),
        ],
        "{}",
        fx.dump()
    );
    assert!(
        fx.log.commands().contains(&Command::SetClip {
            element: "div#combo".into(),
            border_box: true,
        }),
        "backdrop clips to the border box:\n{}",
        fx.dump()
    );
}

#[test_log::test]
fn backdrop_overflow_filters_through_temporary_layer() {
    let mut fx = Fixture::new();
    let element =
        FakeElement::new("div#frosted", &fx.log).with_backdrop_filters(&instancer(&fx.log), &["blur"]);
    fx.render(&element, RenderStage::Enter);

    assert_eq!(
        fx.target_calls(),
        vec![
            Command::SetScissor(Some(IntRect::new(6, 6, 54, 54))),
            Command::PushLayer(LayerHandle(1)),
            composite(0, 1, &[BLUR]),
            Command::SetScissor(Some(border_box())),
            composite(1, 0, &[]),
            Command::PopLayer(LayerHandle(1)),
            Command::SetScissor(None),
        ],
        "{}",
        fx.dump()
    );
    assert_eq!(fx.target.depth(), 0);

    let mut exported = Vec::new();
    json::export(&fx.target_calls(), &mut exported).expect("writing to a Vec cannot fail");
    let exported = String::from_utf8(exported).expect("JSON is UTF-8");
    assert_eq!(exported.matches("\"op\": \"composite\"").count(), 2, "{exported}");
    assert!(exported.contains("\"op\": \"push_layer\""), "{exported}");
    assert!(exported.ends_with("]\n"), "{exported}");
}

#[test_log::test]
fn optional_target_is_reborrowed_across_stages() {
    let log = CommandLog::new();
    let mut recording = RecordingTarget::new(&log);
    let element = combo(&log, true, true, true);
    let mut state = EffectsState::new();
    state.dirty_effects();

    let mut target: Option<&mut dyn RenderTarget> = Some(&mut recording);
    assert_eq!(state.instance_effects(&element, target.as_deref_mut()), Ok(()));
    let bounds = kurbo::Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(
        state.extend_ink_overflow_bounds(&element, target.as_deref_mut(), bounds),
        bounds
    );
    state.render_effects(&element, target.as_deref_mut(), RenderStage::Enter);
    state.render_effects(&element, target.as_deref_mut(), RenderStage::Decoration);
    state.render_effects(&element, target, RenderStage::Exit);

    assert_eq!(recording.depth(), 0, "{}", pretty::format_commands(&log.commands()));
    assert_eq!(log.pushes(), log.pops());
    assert_eq!(log.composites().len(), 2);
}

#[test_log::test]
fn backdrop_lands_on_element_layer() {
    let mut fx = Fixture::new();
    let filters = instancer(&fx.log);
    let element = FakeElement::new("div#both", &fx.log)
        .with_filters(&filters, &["tint"])
        .with_backdrop_filters(&filters, &["tint"]);
    fx.render(&element, RenderStage::Enter);

    assert_eq!(
        fx.log.composites(),
        vec![(BASE_LAYER, LayerHandle(1), vec![TINT])],
        "{}",
        fx.dump()
    );
    assert_eq!(fx.target.depth(), 1, "element layer stays open until Exit");
    fx.render(&element, RenderStage::Exit);
    assert_eq!(fx.target.depth(), 0);
}

#[test_log::test]
fn initial_scissor_is_restored_and_respected() {
    let clip = IntRect::new(0, 0, 30, 30);
    let mut fx = Fixture::with_scissor(clip);
    let filters = instancer(&fx.log);
    let element = FakeElement::new("div#clipped", &fx.log)
        .with_filters(&filters, &["tint"])
        .with_backdrop_filters(&filters, &["blur"]);

    fx.render(&element, RenderStage::Enter);
    assert_eq!(fx.target.scissor_region(), Some(clip), "{}", fx.dump());
    let calls = fx.target_calls();
    assert!(
        calls.contains(&Command::SetScissor(Some(IntRect::new(6, 6, 30, 30)))),
        "extended backdrop region is clipped:\n{}",
        fx.dump()
    );
    assert!(
        calls.contains(&Command::SetScissor(Some(IntRect::new(10, 10, 30, 30)))),
        "border box is clipped:\n{}",
        fx.dump()
    );

    fx.render(&element, RenderStage::Decoration);
    fx.render(&element, RenderStage::Exit);
    assert_eq!(fx.target.scissor_region(), Some(clip), "{}", fx.dump());
    assert_eq!(fx.target.depth(), 0);
}

#[test_log::test]
fn decorators_render_back_to_front() {
    let mut fx = Fixture::new();
    let element = FakeElement::new("div#layers", &fx.log)
        .with_style_sheet(style_sheet(&fx.log))
        .with_decorators(&[("a", BoxArea::Auto), ("b", BoxArea::Content)]);
    fx.frame(&element);

    let drawn: Vec<_> = fx
        .log
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::RenderDecorator {
                decorator, layer, ..
            } => Some((decorator, layer)),
            _ => None,
        })
        .collect();
    assert_eq!(
        drawn,
        vec![("b".to_owned(), BASE_LAYER), ("a".to_owned(), BASE_LAYER)],
        "{}",
        fx.dump()
    );
    assert_eq!(fx.log.pushes(), 0, "decorators alone need no layer");
}

#[test_log::test]
fn exit_without_enter_is_a_no_op() {
    let mut fx = Fixture::new();
    let element = combo(&fx.log, true, true, true);
    fx.render(&element, RenderStage::Exit);
    assert!(fx.target_calls().is_empty(), "{}", fx.dump());
}

#[test_log::test]
fn restyle_between_enter_and_exit_still_pops() {
    let mut fx = Fixture::new();
    let filtered = combo(&fx.log, true, false, false);
    fx.render(&filtered, RenderStage::Enter);
    assert_eq!(fx.target.depth(), 1);

    fx.state.dirty_effects();
    let plain = FakeElement::new("div#combo", &fx.log);
    fx.render(&plain, RenderStage::Exit);

    assert_eq!(fx.target.depth(), 0, "{}", fx.dump());
    assert_eq!(fx.log.composites(), vec![(LayerHandle(1), BASE_LAYER, vec![])]);
    assert!(!fx.state.is_layer_open());
}

#[test_log::test]
fn failed_mask_save_composites_without_mask() {
    let mut fx = Fixture::new();
    fx.target = RecordingTarget::new(&fx.log).with_failing_masks();
    let element = combo(&fx.log, false, false, true);
    fx.frame(&element);

    assert_eq!(fx.log.composites(), vec![(LayerHandle(1), BASE_LAYER, vec![])]);
    assert_eq!(fx.target.depth(), 0, "{}", fx.dump());
}

#[test_log::test]
fn missing_target_draws_nothing() {
    let mut fx = Fixture::new();
    let element = combo(&fx.log, true, true, true);
    for stage in [RenderStage::Enter, RenderStage::Decoration, RenderStage::Exit] {
        fx.state.render_effects(&element, None, stage);
    }
    assert!(fx.state.is_empty());
    assert!(fx.log.commands().is_empty(), "{}", fx.dump());
}

#[test_log::test]
fn ink_overflow_bounds_grow_by_both_filter_lists() {
    let mut fx = Fixture::new();
    let filters = instancer(&fx.log);
    let element = FakeElement::new("div#glow", &fx.log)
        .with_filters(&filters, &["blur", "tint"])
        .with_backdrop_filters(&filters, &["blur"]);

    let bounds = fx.state.extend_ink_overflow_bounds(
        &element,
        Some(&mut fx.target),
        kurbo::Rect::new(0.0, 0.0, 10.0, 10.0),
    );
    assert_eq!(bounds, kurbo::Rect::new(-8.0, -8.0, 18.0, 18.0));
}

#[test_log::test]
fn ink_overflow_bounds_without_target_are_unchanged() {
    let mut fx = Fixture::new();
    let element = FakeElement::new("div#glow", &fx.log)
        .with_filters(&instancer(&fx.log), &["blur"]);
    let rect = kurbo::Rect::new(0.0, 0.0, 10.0, 10.0);
    assert_eq!(fx.state.extend_ink_overflow_bounds(&element, None, rect), rect);
}
