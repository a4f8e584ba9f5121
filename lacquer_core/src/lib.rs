// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry, element handles, and damage tracking for incremental repaint.
//!
//! `lacquer_core` holds the pieces of the repaint pipeline that do not depend
//! on effects or rendering backends. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   layout / transforms
//!       │  element screen boxes
//!       ▼
//!   DamageRegistry::update_rendered_bbox() ──► per-context union rect
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   DamageRegistry::take_damage() ──► DamageInfo ──► present
//! ```
//!
//! **[`geometry`]**: pixel-grid [`IntRect`](geometry::IntRect) and
//! [`BoxArea`](geometry::BoxArea).
//!
//! **[`id`]**: [`ContextId`](id::ContextId) and generational
//! [`ElementId`](id::ElementId) handles.
//!
//! **[`damage`]**: the [`DamageRegistry`](damage::DamageRegistry).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod damage;
pub mod geometry;
pub mod id;
