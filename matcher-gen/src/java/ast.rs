use super::JavaError;
use super::printer;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// A validated Java identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Result<Self, JavaError> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(Ident(name))
        } else {
            Err(JavaError::InvalidIdentifier(name))
        }
    }

    /// Identifier for names the generator itself owns.
    pub(crate) fn known(name: &'static str) -> Self {
        debug_assert!(is_identifier(name), "`{name}` is not an identifier");
        Ident(name.to_string())
    }

    /// `prefix` followed by `rest` with its first character upper-cased.
    ///
    /// `prefix` must be a lower-case identifier start and `rest` must consist of
    /// identifier characters, which holds for every suffix of a valid identifier.
    /// The result can never collide with a keyword because keywords are all
    /// lower-case.
    pub(crate) fn prefixed(prefix: &str, rest: &str) -> Self {
        let mut name = String::with_capacity(prefix.len() + rest.len());
        name.push_str(prefix);
        let mut chars = rest.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
        debug_assert!(is_identifier(&name), "`{name}` is not an identifier");
        Ident(name)
    }

    /// `self` followed by a fixed identifier-character suffix.
    pub(crate) fn suffixed(&self, suffix: &str) -> Self {
        let name = format!("{}{suffix}", self.0);
        debug_assert!(is_identifier(&name), "`{name}` is not an identifier");
        Ident(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ident {
    type Error = JavaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ident::new(value)
    }
}

impl From<Ident> for String {
    fn from(ident: Ident) -> Self {
        ident.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') && !KEYWORDS.contains(&name)
}

/// The eight primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Char,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }

    /// The `java.lang` wrapper class of this primitive.
    pub fn boxed(self) -> ClassName {
        let simple = match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        };
        ClassName::known("java.lang", &[simple])
    }
}

/// A fully qualified reference to a (possibly nested) class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassName {
    package: String,
    simple_names: Vec<Ident>,
}

impl ClassName {
    /// # Panics
    ///
    /// Panics if `simple_names` is empty.
    pub fn new(package: impl Into<String>, simple_names: Vec<Ident>) -> Self {
        assert!(!simple_names.is_empty(), "a class name needs a simple name");
        ClassName {
            package: package.into(),
            simple_names,
        }
    }

    pub(crate) fn known(package: &str, simple_names: &[&'static str]) -> Self {
        ClassName::new(
            package,
            simple_names.iter().map(|name| Ident::known(name)).collect(),
        )
    }

    /// Splits a canonical name into package and class segments.
    ///
    /// Segments up to the first one starting with an upper-case letter form the
    /// package; the rest are the enclosing chain down to the class itself.
    pub fn best_guess(canonical: &str) -> Result<Self, JavaError> {
        let invalid = || JavaError::InvalidClassName(canonical.to_string());

        let segments: Vec<&str> = canonical.split('.').collect();
        let first_class = segments
            .iter()
            .position(|segment| segment.starts_with(|c: char| c.is_uppercase()))
            .ok_or_else(invalid)?;

        let package = &segments[..first_class];
        if package.iter().any(|segment| !is_identifier(segment)) {
            return Err(invalid());
        }

        let simple_names = segments[first_class..]
            .iter()
            .map(|segment| Ident::new(*segment).map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClassName {
            package: package.join("."),
            simple_names,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn simple_names(&self) -> &[Ident] {
        &self.simple_names
    }

    pub fn simple_name(&self) -> &Ident {
        // `new` guarantees at least one segment
        &self.simple_names[self.simple_names.len() - 1]
    }

    /// The outermost class of the enclosing chain.
    pub fn top_level(&self) -> ClassName {
        ClassName {
            package: self.package.clone(),
            simple_names: vec![self.simple_names[0].clone()],
        }
    }

    /// `Outer.Inner`, the name as written once the top-level class is in scope.
    pub fn relative_name(&self) -> String {
        self.simple_names
            .iter()
            .map(Ident::as_str)
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn canonical_name(&self) -> String {
        if self.package.is_empty() {
            self.relative_name()
        } else {
            format!("{}.{}", self.package, self.relative_name())
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardBound {
    Extends(Box<TypeName>),
    Super(Box<TypeName>),
}

/// A type as it appears in generated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Primitive(PrimitiveKind),
    Class(ClassName),
    /// A type declared in the compilation unit being printed, referenced by its
    /// simple name.
    Local(Ident),
    Parameterized {
        raw: ClassName,
        args: Vec<TypeName>,
    },
    Wildcard(Option<WildcardBound>),
    Array(Box<TypeName>),
}

impl TypeName {
    pub fn object() -> Self {
        TypeName::Class(ClassName::known("java.lang", &["Object"]))
    }

    pub fn parameterized(raw: ClassName, args: Vec<TypeName>) -> Self {
        if args.is_empty() {
            TypeName::Class(raw)
        } else {
            TypeName::Parameterized { raw, args }
        }
    }

    pub fn super_of(bound: TypeName) -> Self {
        TypeName::Wildcard(Some(WildcardBound::Super(Box::new(bound))))
    }
}

/// Declaration modifiers, ordered the way Java style guides list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name(Ident),
    This,
    Str(String),
    ClassLiteral(ClassName),
    New {
        ty: TypeName,
        args: Vec<Expr>,
    },
    Call {
        receiver: Option<Box<Expr>>,
        method: Ident,
        args: Vec<Expr>,
    },
    StaticCall {
        owner: ClassName,
        method: Ident,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn name(ident: &Ident) -> Self {
        Expr::Name(ident.clone())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// `receiver.method(args)`
    pub fn call(receiver: Expr, method: Ident, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(receiver)),
            method,
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Expr(Expr),
    Assign { target: Ident, value: Expr },
    Return(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub ty: ClassName,
    pub members: Vec<(Ident, Expr)>,
}

impl Annotation {
    pub fn new(ty: ClassName) -> Self {
        Annotation {
            ty,
            members: Vec::new(),
        }
    }

    pub fn member(mut self, name: Ident, value: Expr) -> Self {
        self.members.push((name, value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeName,
    pub name: Ident,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: BTreeSet<Modifier>,
    pub ty: TypeName,
    pub name: Ident,
}

impl FieldDecl {
    pub fn new(ty: TypeName, name: Ident, modifiers: &[Modifier]) -> Self {
        FieldDecl {
            modifiers: modifiers.iter().copied().collect(),
            ty,
            name,
        }
    }
}

/// A method or constructor. Constructors have no return slot and are named
/// after their type when printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: Ident,
    pub constructor: bool,
    pub annotations: Vec<Annotation>,
    pub modifiers: BTreeSet<Modifier>,
    pub parameters: Vec<Parameter>,
    /// `None` prints as `void`.
    pub returns: Option<TypeName>,
    pub body: Vec<Statement>,
}

impl MethodDecl {
    pub fn method(name: Ident) -> Self {
        MethodDecl {
            name,
            constructor: false,
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            parameters: Vec::new(),
            returns: None,
            body: Vec::new(),
        }
    }

    pub fn constructor(type_name: Ident) -> Self {
        MethodDecl {
            constructor: true,
            ..MethodDecl::method(type_name)
        }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend(modifiers.iter().copied());
        self
    }

    /// Adds a `final` parameter.
    pub fn parameter(mut self, ty: TypeName, name: Ident) -> Self {
        self.parameters.push(Parameter {
            ty,
            name,
            is_final: true,
        });
        self
    }

    pub fn returns(mut self, ty: TypeName) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.body.push(statement);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: Ident,
    pub annotations: Vec<Annotation>,
    pub modifiers: BTreeSet<Modifier>,
    pub superclass: Option<TypeName>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub nested: Vec<TypeDecl>,
}

impl TypeDecl {
    pub fn class(name: Ident) -> Self {
        TypeDecl {
            name,
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend(modifiers.iter().copied());
        self
    }

    pub fn extends(mut self, superclass: TypeName) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods(mut self, methods: impl IntoIterator<Item = MethodDecl>) -> Self {
        self.methods.extend(methods);
        self
    }

    pub fn nested(mut self, nested: impl IntoIterator<Item = TypeDecl>) -> Self {
        self.nested.extend(nested);
        self
    }

    /// Names of this type and every type nested in it.
    pub(crate) fn declared_names(&self) -> Vec<&Ident> {
        let mut names = vec![&self.name];
        for nested in &self.nested {
            names.extend(nested.declared_names());
        }
        names
    }
}

/// One source file: a package clause and a single top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: String,
    pub decl: TypeDecl,
    pub indent: String,
}

impl CompilationUnit {
    pub fn new(package: impl Into<String>, decl: TypeDecl) -> Self {
        CompilationUnit {
            package: package.into(),
            decl,
            indent: "  ".to_string(),
        }
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Prints the unit, resolving imports for every class it references.
    pub fn render(&self) -> String {
        printer::render(self)
    }
}
