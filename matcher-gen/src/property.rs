use crate::model::{DeclarationModel, Member, MemberKind, TypeDescriptor, TypeKind, TypeRef, Visibility};

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static ACCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(get|is)(.+)$").expect("accessor pattern is valid"));

/// A readable property of a type, backed by an accessor method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Accessor name without its prefix, first letter lower-cased. Only ever
    /// printed as a string literal or behind a `with` prefix, so keywords and
    /// leading digits (`default`, `18`) are fine.
    pub name: String,
    pub declared: TypeRef,
    /// `declared` as usable in a type argument.
    pub boxed: TypeRef,
    /// The accessor's signature, for tracing a property back to its source.
    pub accessor: String,
}

/// Collects the properties of `ty`, inherited ones included.
///
/// Members are visited in preorder: the type's own members, then the
/// superclass hierarchy (skipped for enums), then each interface hierarchy in
/// declaration order. A property name seen earlier in that order shadows later
/// ones, so the most derived accessor wins. Every type is visited at most once.
pub fn extract(ty: &TypeDescriptor, model: &dyn DeclarationModel) -> Vec<PropertyDescriptor> {
    let mut properties = Vec::new();
    let mut names = HashSet::new();
    let mut visited = HashSet::new();
    let mut stack = vec![ty.clone()];

    while let Some(current) = stack.pop() {
        if !visited.insert(current.qualified_name().to_string()) {
            continue;
        }

        for member in model.members_of(&current) {
            let Some(property) = property_of(&member) else {
                continue;
            };
            if names.insert(property.name.clone()) {
                properties.push(property);
            }
        }

        let mut supertypes = Vec::new();
        if current.kind() != TypeKind::Enum {
            supertypes.extend(model.superclass_of(&current));
        }
        supertypes.extend(model.interfaces_of(&current));
        stack.extend(supertypes.into_iter().rev());
    }

    tracing::debug!(ty = %ty, properties = properties.len(), "extracted properties");
    properties
}

/// The property `member` reads, if it is an accessor.
pub fn property_of(member: &Member) -> Option<PropertyDescriptor> {
    if member.kind != MemberKind::Method
        || member.visibility != Visibility::Public
        || member.is_static
        || !member.parameters.is_empty()
        || member.return_type.is_void()
    {
        return None;
    }

    let captures = ACCESSOR.captures(member.name.as_str())?;
    let prefix = captures.get(1)?.as_str();
    let rest = captures.get(2)?.as_str();

    let is_boolean = member.return_type.is_boolean();
    if (prefix == "get") == is_boolean {
        return None;
    }

    Some(PropertyDescriptor {
        name: property_name(rest),
        declared: member.return_type.clone(),
        boxed: member.return_type.boxed(),
        accessor: member.signature(),
    })
}

fn property_name(rest: &str) -> String {
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
