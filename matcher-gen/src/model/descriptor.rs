use super::TypeRef;
use crate::java::{ClassName, Ident};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    PackagePrivate,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// A type declaration as seen by the generator.
///
/// Identity is the qualified name: two descriptors naming the same type are
/// equal regardless of the other attributes the host reported for them.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    qualified_name: String,
    package: String,
    /// Enclosing chain from the top-level type down to this one.
    names: Vec<Ident>,
    type_parameters: usize,
    visibility: Visibility,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// A public, non-generic, top-level class.
    pub fn new(package: impl Into<String>, simple_name: Ident) -> Self {
        let package = package.into();
        let qualified_name = if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{package}.{simple_name}")
        };
        TypeDescriptor {
            qualified_name,
            package,
            names: vec![simple_name],
            type_parameters: 0,
            visibility: Visibility::Public,
            kind: TypeKind::Class,
        }
    }

    /// A public, non-generic class declared inside `outer`.
    pub fn nested_in(outer: &TypeDescriptor, simple_name: Ident) -> Self {
        let mut names = outer.names.clone();
        let qualified_name = format!("{}.{simple_name}", outer.qualified_name);
        names.push(simple_name);
        TypeDescriptor {
            qualified_name,
            package: outer.package.clone(),
            names,
            type_parameters: 0,
            visibility: Visibility::Public,
            kind: TypeKind::Class,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn simple_name(&self) -> &Ident {
        &self.names[self.names.len() - 1]
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Qualified name of the directly enclosing type, if this type is nested.
    pub fn enclosing_name(&self) -> Option<&str> {
        if self.names.len() < 2 {
            return None;
        }
        let own = self.simple_name().as_str().len() + 1;
        Some(&self.qualified_name[..self.qualified_name.len() - own])
    }

    pub fn is_nested(&self) -> bool {
        self.names.len() > 1
    }

    pub fn type_parameters(&self) -> usize {
        self.type_parameters
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn class_name(&self) -> ClassName {
        ClassName::new(self.package.clone(), self.names.clone())
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.qualified_name.hash(state);
    }
}

impl PartialOrd for TypeDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.qualified_name.cmp(&other.qualified_name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    #[default]
    Method,
    Field,
    Constructor,
}

/// The accessor shape of a declared member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: Ident,
    pub kind: MemberKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub parameters: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl Member {
    /// A public instance method without parameters.
    pub fn method(name: Ident, return_type: TypeRef) -> Self {
        Member {
            name,
            kind: MemberKind::Method,
            visibility: Visibility::Public,
            is_static: false,
            parameters: Vec::new(),
            return_type,
        }
    }

    /// `name(ParamType, ...)`, the way the host prints executable members.
    pub fn signature(&self) -> String {
        let parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, parameters.join(","))
    }
}
