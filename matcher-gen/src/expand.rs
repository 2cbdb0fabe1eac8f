use crate::diag::{Diagnostic, DiagnosticSink};
use crate::model::{DeclarationModel, TypeDescriptor};

use std::collections::{BTreeSet, HashSet};

/// Adds every public nested type reachable from `roots`.
///
/// Roots are kept whatever their visibility. A non-public nested type is
/// reported once, attributed to the configuration declared on `origin`, and
/// nothing below it is visited.
pub fn expand(
    roots: &BTreeSet<TypeDescriptor>,
    origin: &str,
    model: &dyn DeclarationModel,
    sink: &mut dyn DiagnosticSink,
) -> BTreeSet<TypeDescriptor> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut expanded = BTreeSet::new();
    let mut worklist: Vec<TypeDescriptor> = roots.iter().rev().cloned().collect();

    while let Some(ty) = worklist.pop() {
        if !visited.insert(ty.qualified_name().to_string()) {
            continue;
        }

        let mut public = Vec::new();
        for nested in model.enclosed_types(&ty) {
            if nested.is_public() {
                public.push(nested);
            } else if visited.insert(nested.qualified_name().to_string()) {
                sink.report(
                    Diagnostic::note(format!(
                        "Matcher generation skipped for non public type: {nested}"
                    ))
                    .on(nested.qualified_name())
                    .from_origin(origin, None),
                );
            }
        }
        worklist.extend(public.into_iter().rev());
        expanded.insert(ty);
    }

    tracing::debug!(
        roots = roots.len(),
        candidates = expanded.len(),
        "expanded nested types"
    );
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Severity;
    use crate::model::{InMemoryModel, TypeDef, Visibility};

    const CONFIG: &str = "com.example.Config";

    fn names(types: &BTreeSet<TypeDescriptor>) -> Vec<&str> {
        types.iter().map(TypeDescriptor::qualified_name).collect()
    }

    #[test]
    fn test_private_subtree_is_pruned() {
        let model = InMemoryModel::builder()
            .type_def(
                TypeDef::new("com.example.Outer")
                    .nested(TypeDef::new("Open").nested(TypeDef::new("Deeper")))
                    .nested(
                        TypeDef::new("Closed")
                            .with_visibility(Visibility::Private)
                            .nested(TypeDef::new("Unreachable")),
                    ),
            )
            .build()
            .unwrap();
        let roots: BTreeSet<_> = model.package_members("com.example").into_iter().collect();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let expanded = expand(&roots, CONFIG, &model, &mut diagnostics);

        assert_eq!(
            names(&expanded),
            [
                "com.example.Outer",
                "com.example.Outer.Open",
                "com.example.Outer.Open.Deeper"
            ]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Note);
        assert_eq!(
            diagnostics[0].message,
            "Matcher generation skipped for non public type: com.example.Outer.Closed"
        );
        assert_eq!(diagnostics[0].element.as_deref(), Some("com.example.Outer.Closed"));
        let origin = diagnostics[0].origin.as_ref().unwrap();
        assert_eq!(origin.element, CONFIG);
        assert_eq!(origin.entry, None);
    }

    #[test]
    fn test_non_public_root_is_kept() {
        let model = InMemoryModel::builder()
            .type_def(
                TypeDef::new("com.example.Hidden")
                    .with_visibility(Visibility::PackagePrivate)
                    .nested(TypeDef::new("Visible")),
            )
            .build()
            .unwrap();
        let roots: BTreeSet<_> = model.package_members("com.example").into_iter().collect();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let expanded = expand(&roots, CONFIG, &model, &mut diagnostics);

        assert_eq!(
            names(&expanded),
            ["com.example.Hidden", "com.example.Hidden.Visible"]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_shared_roots_are_expanded_once() {
        let model = InMemoryModel::builder()
            .type_def(TypeDef::new("com.example.A").nested(
                TypeDef::new("Secret").with_visibility(Visibility::Protected),
            ))
            .build()
            .unwrap();
        let a = model.type_named("com.example.A").unwrap();
        let roots: BTreeSet<_> = [a.clone(), a].into_iter().collect();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let expanded = expand(&roots, CONFIG, &model, &mut diagnostics);

        assert_eq!(names(&expanded), ["com.example.A"]);
        assert_eq!(diagnostics.len(), 1);
    }
}
