// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable command output.
//!
//! One line per [`Command`], indented by the layer depth at the time the
//! command was issued, so unbalanced pushes are visible at a glance.

use std::fmt::Write as _;

use lacquer_core::geometry::IntRect;

use crate::command::Command;

fn rect(region: Option<IntRect>) -> String {
    match region {
        Some(r) => format!("({},{})..({},{})", r.x0, r.y0, r.x1, r.y1),
        None => "off".into(),
    }
}

fn handles<T: std::fmt::Debug>(list: &[T]) -> String {
    let mut out = String::from("[");
    for (i, item) in list.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{item:?}");
    }
    out.push(']');
    out
}

/// Formats one command without indentation.
#[must_use]
pub fn format_command(command: &Command) -> String {
    match command {
        Command::PushLayer(layer) => format!("[push] layer={}", layer.0),
        Command::PopLayer(layer) => format!("[pop] layer={}", layer.0),
        Command::SetScissor(region) => format!("[scissor] {}", rect(*region)),
        Command::Composite {
            source,
            destination,
            blend_mode,
            filters,
        } => format!(
            "[composite] {} -> {} {blend_mode:?} filters={}",
            source.0,
            destination.0,
            handles(filters),
        ),
        Command::SaveMask(Some(handle)) => format!("[mask] saved handle={}", handle.0),
        Command::SaveMask(None) => "[mask] failed".into(),
        Command::SetClip {
            element,
            border_box,
        } => {
            let kind = if *border_box { "border-box" } else { "regular" };
            format!("[clip] {element} {kind}")
        }
        Command::GenerateData {
            decorator,
            paint_area,
            data,
        } => match data {
            Some(data) => format!("[data:new] {decorator} {paint_area:?} -> {}", data.0),
            None => format!("[data:new] {decorator} {paint_area:?} -> FAILED"),
        },
        Command::ReleaseData { decorator, data } => {
            format!("[data:release] {decorator} {}", data.0)
        }
        Command::RenderDecorator {
            decorator,
            data,
            layer,
        } => format!("[draw] {decorator} data={} layer={}", data.0, layer.0),
        Command::CompileFilter { filter, handle } => match handle {
            Some(handle) => format!("[compile] {filter} -> {}", handle.0),
            None => format!("[compile] {filter} -> FAILED"),
        },
        Command::DropCompiled(handle) => format!("[drop] filter={}", handle.0),
    }
}

/// Formats a command stream, indenting each line by layer depth.
#[must_use]
pub fn format_commands(commands: &[Command]) -> String {
    let mut out = String::new();
    let mut depth = 0_usize;
    for command in commands {
        if matches!(command, Command::PopLayer(_)) {
            depth = depth.saturating_sub(1);
        }
        let _ = writeln!(out, "{:indent$}{}", "", format_command(command), indent = depth * 2);
        if matches!(command, Command::PushLayer(_)) {
            depth += 1;
        }
    }
    out
}
