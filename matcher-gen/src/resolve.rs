use crate::config::MatcherConfiguration;
use crate::diag::{Diagnostic, DiagnosticSink};
use crate::model::{DeclarationModel, TypeDescriptor};

use std::collections::{BTreeSet, HashSet};

/// Resolves every configured name to the top-level types it stands for.
///
/// A name may denote a package, a type, or both. A package contributes the
/// types declared directly in it. A nested type contributes its outermost
/// enclosing type, whose generation covers it. Names resolving to nothing are
/// reported and skipped.
pub fn resolve(
    config: &MatcherConfiguration,
    model: &dyn DeclarationModel,
    sink: &mut dyn DiagnosticSink,
) -> BTreeSet<TypeDescriptor> {
    let mut resolved = BTreeSet::new();

    for name in config.names() {
        let mut found = model.package_members(name);
        found.extend(model.type_named(name).map(|ty| outermost(model, ty)));

        if found.is_empty() {
            sink.report(
                Diagnostic::warning(format!("Neither a type nor a package exists for '{name}'"))
                    .from_origin(&config.origin, Some(name.to_string())),
            );
            continue;
        }

        tracing::debug!(name, types = found.len(), "resolved configured name");
        resolved.extend(found);
    }

    resolved
}

fn outermost(model: &dyn DeclarationModel, mut ty: TypeDescriptor) -> TypeDescriptor {
    let mut seen = HashSet::new();
    while seen.insert(ty.qualified_name().to_string()) {
        match model.enclosing_of(&ty) {
            Some(enclosing) => ty = enclosing,
            None => break,
        }
    }
    ty
}
