//! Typed Java syntax tree and pretty-printer for generated sources.
//!
//! Generated code is never assembled by string interpolation. The matcher
//! builder produces a [`CompilationUnit`] made of declarations, statements and
//! expressions, and [`CompilationUnit::render`] turns that tree into source
//! text. Keeping the two phases apart means:
//!
//! - identifiers are validated once, when an [`Ident`] is created
//! - braces, separators and indentation come from the printer, never from callers
//! - imports are resolved from the class references the tree actually contains

mod ast;
mod printer;

pub use ast::{
    Annotation, ClassName, CompilationUnit, Expr, FieldDecl, Ident, MethodDecl, Modifier,
    Parameter, PrimitiveKind, Statement, TypeDecl, TypeName, WildcardBound,
};

use thiserror::Error;

/// Errors raised while constructing syntax tree leaves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JavaError {
    #[error("`{0}` is not a valid Java identifier")]
    InvalidIdentifier(String),

    #[error("`{0}` does not name a class (expected `package.Type` with an upper-case type segment)")]
    InvalidClassName(String),
}
