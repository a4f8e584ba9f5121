// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect failures.
//!
//! None of these abort rendering. Each is logged where it happens and the
//! affected effect simply does not render.

use alloc::string::String;
use core::fmt;

use crate::element::PropertySource;

/// Why an effect will not render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectsError {
    /// Effects were instanced before the element had a render target.
    ///
    /// All effect lists stay empty until the next rebuild.
    MissingRenderTarget {
        /// Address of the element.
        element: String,
    },
    /// A declared filter could not be instanced and was dropped.
    FilterInstancing {
        /// Declared filter type.
        kind: String,
        /// Source text of the whole property.
        value: String,
        /// Where the property was declared.
        source: Option<PropertySource>,
    },
    /// At least one decorator or mask image could not generate its data.
    DecoratorData {
        /// Address of the element.
        element: String,
    },
    /// At least one filter or backdrop filter failed to compile.
    FilterCompile {
        /// Address of the element.
        element: String,
    },
}

impl fmt::Display for EffectsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRenderTarget { element } => write!(
                f,
                "effects on {element} are being instanced before a render target is available; \
                 is the element attached to a document?"
            ),
            Self::FilterInstancing {
                kind,
                value,
                source,
            } => {
                write!(f, "filter '{kind}' in '{value}' could not be instanced, declared at ")?;
                match source {
                    Some(source) => write!(f, "{source}"),
                    None => f.write_str(":-1"),
                }
            }
            Self::DecoratorData { element } => {
                write!(f, "could not generate decorator element data: {element}")
            }
            Self::FilterCompile { element } => {
                write!(f, "could not compile filter on element: {element}")
            }
        }
    }
}

impl core::error::Error for EffectsError {}
