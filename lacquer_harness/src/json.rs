// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured JSON export of command streams.
//!
//! Each command becomes an object with an `"op"` field and its arguments.
//! Output is stable, so it can be checked into golden files or diffed between
//! runs.

use std::io::{self, Write};

use serde_json::{Value, json};

use lacquer_core::geometry::IntRect;

use crate::command::Command;

fn rect_value(region: Option<IntRect>) -> Value {
    match region {
        Some(r) => json!([r.x0, r.y0, r.x1, r.y1]),
        None => Value::Null,
    }
}

/// Converts one command to JSON.
#[must_use]
pub fn command_to_json(command: &Command) -> Value {
    match command {
        Command::PushLayer(layer) => json!({ "op": "push_layer", "layer": layer.0 }),
        Command::PopLayer(layer) => json!({ "op": "pop_layer", "layer": layer.0 }),
        Command::SetScissor(region) => json!({
            "op": "set_scissor",
            "region": rect_value(*region),
        }),
        Command::Composite {
            source,
            destination,
            blend_mode,
            filters,
        } => json!({
            "op": "composite",
            "source": source.0,
            "destination": destination.0,
            "blend_mode": format!("{blend_mode:?}"),
            "filters": filters.iter().map(|f| f.0).collect::<Vec<_>>(),
        }),
        Command::SaveMask(handle) => json!({
            "op": "save_mask",
            "handle": handle.map(|h| h.0),
        }),
        Command::SetClip {
            element,
            border_box,
        } => json!({
            "op": "set_clip",
            "element": element,
            "border_box": border_box,
        }),
        Command::GenerateData {
            decorator,
            paint_area,
            data,
        } => json!({
            "op": "generate_data",
            "decorator": decorator,
            "paint_area": format!("{paint_area:?}"),
            "data": data.map(|d| d.0),
        }),
        Command::ReleaseData { decorator, data } => json!({
            "op": "release_data",
            "decorator": decorator,
            "data": data.0,
        }),
        Command::RenderDecorator {
            decorator,
            data,
            layer,
        } => json!({
            "op": "render_decorator",
            "decorator": decorator,
            "data": data.0,
            "layer": layer.0,
        }),
        Command::CompileFilter { filter, handle } => json!({
            "op": "compile_filter",
            "filter": filter,
            "handle": handle.map(|h| h.0),
        }),
        Command::DropCompiled(handle) => json!({ "op": "drop_compiled", "handle": handle.0 }),
    }
}

/// Converts a command stream to a JSON array.
#[must_use]
pub fn commands_to_json(commands: &[Command]) -> Value {
    Value::Array(commands.iter().map(command_to_json).collect())
}

/// Writes [`commands_to_json`] output to `writer`, pretty-printed.
pub fn export(commands: &[Command], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &commands_to_json(commands))?;
    writer.write_all(b"\n")
}
