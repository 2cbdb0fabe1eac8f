//! Recognising output this generator produced in an earlier round.

use crate::diag::{Diagnostic, DiagnosticSink};
use crate::model::{DeclarationModel, TypeDescriptor};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Schema tag of [`GenerationMarker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerFormat {
    /// `@Generated(value = <generator id>, date = <timestamp>)`
    #[default]
    V1,
}

/// The marker stamped on every generated matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationMarker {
    #[serde(default)]
    pub format: MarkerFormat,
    #[serde(alias = "value")]
    pub generator_id: String,
    #[serde(default, alias = "date")]
    pub timestamp: String,
}

impl GenerationMarker {
    pub fn new(generator_id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        GenerationMarker {
            format: MarkerFormat::V1,
            generator_id: generator_id.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Whether `generator_id` produced this marker. The timestamp is ignored.
    pub fn is_from(&self, generator_id: &str) -> bool {
        match self.format {
            MarkerFormat::V1 => self.generator_id == generator_id,
        }
    }
}

pub fn is_self_generated(
    model: &dyn DeclarationModel,
    ty: &TypeDescriptor,
    generator_id: &str,
) -> bool {
    model
        .marker_of(ty)
        .is_some_and(|marker| marker.is_from(generator_id))
}

/// Removes the candidates this generator already produced, with a note for each.
pub fn filter(
    candidates: BTreeSet<TypeDescriptor>,
    generator_id: &str,
    model: &dyn DeclarationModel,
    sink: &mut dyn DiagnosticSink,
) -> BTreeSet<TypeDescriptor> {
    candidates
        .into_iter()
        .filter(|ty| {
            if !is_self_generated(model, ty, generator_id) {
                return true;
            }
            sink.report(
                Diagnostic::note(format!(
                    "Generation skipped for: '{ty}' because it is already generated by this processor"
                ))
                .on(ty.qualified_name()),
            );
            false
        })
        .collect()
}
