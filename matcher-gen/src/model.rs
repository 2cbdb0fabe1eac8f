//! The declaration graph the generator reads from.
//!
//! Hosts expose their view of the compiled sources through
//! [`DeclarationModel`]. The generator never mutates the graph and asks only
//! these questions of it, so any compiler front end, index or fixture can sit
//! behind the trait. [`InMemoryModel`] is the implementation used by the tests
//! and by the command line host.

mod descriptor;
mod memory;
mod type_ref;

pub use descriptor::{Member, MemberKind, TypeDescriptor, TypeKind, Visibility};
pub use memory::{InMemoryModel, MemberDef, ModelBuilder, ModelDocument, TypeDef};
pub use type_ref::{Bound, TypeRef, TypeRefParseError};

use crate::guard::GenerationMarker;

use thiserror::Error;

/// Read-only queries over the host's declaration graph.
///
/// Lookups of names the host does not know answer `None` or an empty list;
/// the generator treats a missing supertype as contributing nothing.
pub trait DeclarationModel {
    /// Every type declared directly in `package`, nested types excluded.
    fn package_members(&self, package: &str) -> Vec<TypeDescriptor>;

    fn type_named(&self, qualified_name: &str) -> Option<TypeDescriptor>;

    /// The type `ty` is declared in, if it is nested.
    fn enclosing_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        ty.enclosing_name().and_then(|name| self.type_named(name))
    }

    /// Types declared directly inside `ty`, in declaration order.
    fn enclosed_types(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor>;

    fn superclass_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor>;

    /// Directly implemented interfaces, in declaration order.
    fn interfaces_of(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor>;

    /// Members declared by `ty` itself, in declaration order.
    fn members_of(&self, ty: &TypeDescriptor) -> Vec<Member>;

    /// The generation marker `ty` is annotated with, if any.
    fn marker_of(&self, ty: &TypeDescriptor) -> Option<GenerationMarker>;
}

/// Errors raised while building an [`InMemoryModel`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[cfg(feature = "json")]
    #[error("failed to parse model document")]
    Json(#[from] serde_json::Error),

    #[error("type `{name}` declares an invalid type `{ty}`")]
    InvalidType {
        name: String,
        ty: String,
        #[source]
        source: TypeRefParseError,
    },

    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("`{name}` is not a valid type or member name")]
    InvalidIdentifier {
        name: String,
        #[source]
        source: crate::java::JavaError,
    },
}
