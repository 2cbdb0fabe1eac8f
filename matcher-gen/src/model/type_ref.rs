use crate::java::{ClassName, Ident, PrimitiveKind};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A declared type as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveKind),
    /// A type variable with no resolution in the generated code's scope.
    TypeVariable(String),
    Declared {
        class: ClassName,
        args: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
    Wildcard(Option<Bound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bound {
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

impl TypeRef {
    pub fn class(class: ClassName) -> Self {
        TypeRef::Declared {
            class,
            args: Vec::new(),
        }
    }

    pub fn object() -> Self {
        TypeRef::class(ClassName::known("java.lang", &["Object"]))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Only the primitive `boolean`; `java.lang.Boolean` does not count.
    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Boolean))
    }

    /// The type usable as a generic argument in place of this one.
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(kind) => TypeRef::class(kind.boxed()),
            TypeRef::TypeVariable(_) => TypeRef::object(),
            other => other.clone(),
        }
    }

    /// Rewrites bare names listed in `scope` into type variables.
    pub(crate) fn resolve_type_variables(self, scope: &[String]) -> TypeRef {
        match self {
            TypeRef::Declared { class, args } => {
                let is_variable = args.is_empty()
                    && class.package().is_empty()
                    && class.simple_names().len() == 1
                    && scope.iter().any(|name| name == class.simple_name().as_str());
                if is_variable {
                    TypeRef::TypeVariable(class.simple_name().to_string())
                } else {
                    TypeRef::Declared {
                        class,
                        args: args
                            .into_iter()
                            .map(|arg| arg.resolve_type_variables(scope))
                            .collect(),
                    }
                }
            }
            TypeRef::Array(element) => {
                TypeRef::Array(Box::new(element.resolve_type_variables(scope)))
            }
            TypeRef::Wildcard(Some(Bound::Extends(bound))) => TypeRef::Wildcard(Some(
                Bound::Extends(Box::new(bound.resolve_type_variables(scope))),
            )),
            TypeRef::Wildcard(Some(Bound::Super(bound))) => TypeRef::Wildcard(Some(Bound::Super(
                Box::new(bound.resolve_type_variables(scope)),
            ))),
            other => other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Primitive(kind) => write!(f, "{}", kind.keyword()),
            TypeRef::TypeVariable(name) => write!(f, "{name}"),
            TypeRef::Declared { class, args } => {
                write!(f, "{class}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Wildcard(None) => write!(f, "?"),
            TypeRef::Wildcard(Some(Bound::Extends(bound))) => write!(f, "? extends {bound}"),
            TypeRef::Wildcard(Some(Bound::Super(bound))) => write!(f, "? super {bound}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type `{input}` at offset {offset}: {reason}")]
pub struct TypeRefParseError {
    pub input: String,
    pub offset: usize,
    pub reason: &'static str,
}

impl FromStr for TypeRef {
    type Err = TypeRefParseError;

    /// Parses Java type syntax: `int`, `java.util.List<? extends T>`, `byte[][]`.
    ///
    /// Bare single-segment names parse as classes in the default package; the
    /// model turns the ones naming a type parameter into type variables.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input, offset: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.offset != input.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

struct Parser<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &'static str) -> TypeRefParseError {
        TypeRefParseError {
            input: self.input.to_string(),
            offset: self.offset,
            reason,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.offset = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: char) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.offset += token.len_utf8();
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let start = self.offset;
        self.offset += len;
        Some(&self.input[start..self.offset])
    }

    fn parse_type(&mut self) -> Result<TypeRef, TypeRefParseError> {
        let mut ty = self.parse_element()?;
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            if ty.is_void() {
                return Err(self.error("`void` cannot be an array element"));
            }
            ty = TypeRef::Array(Box::new(ty));
        }
        Ok(ty)
    }

    fn parse_element(&mut self) -> Result<TypeRef, TypeRefParseError> {
        if self.eat('?') {
            let checkpoint = self.offset;
            return match self.word() {
                Some("extends") => Ok(TypeRef::Wildcard(Some(Bound::Extends(Box::new(
                    self.parse_type()?,
                ))))),
                Some("super") => Ok(TypeRef::Wildcard(Some(Bound::Super(Box::new(
                    self.parse_type()?,
                ))))),
                Some(_) => Err(self.error("expected `extends` or `super` after `?`")),
                None => {
                    self.offset = checkpoint;
                    Ok(TypeRef::Wildcard(None))
                }
            };
        }

        let mut segments = vec![
            self.word()
                .ok_or_else(|| self.error("expected a type name"))?
                .to_string(),
        ];
        while self.eat('.') {
            let segment = self
                .word()
                .ok_or_else(|| self.error("expected a name segment after `.`"))?;
            segments.push(segment.to_string());
        }

        if let [single] = segments.as_slice() {
            if single == "void" {
                return Ok(TypeRef::Void);
            }
            if let Some(kind) = PrimitiveKind::from_keyword(single) {
                return Ok(TypeRef::Primitive(kind));
            }
        }

        let canonical = segments.join(".");
        let class = if segments.len() == 1 {
            Ident::new(canonical.as_str())
                .map(|name| ClassName::new("", vec![name]))
                .map_err(|_| self.error("not a valid identifier"))?
        } else {
            ClassName::best_guess(&canonical).map_err(|_| self.error("not a class name"))?
        };

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
            if args
                .iter()
                .any(|arg| matches!(arg, TypeRef::Primitive(_) | TypeRef::Void))
            {
                return Err(self.error("type arguments cannot be primitive"));
            }
        }

        Ok(TypeRef::Declared { class, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(input: &str) -> TypeRef {
        input.parse().unwrap()
    }

    #[rstest]
    #[case("int")]
    #[case("boolean")]
    #[case("void")]
    #[case("java.lang.String")]
    #[case("java.util.List<java.lang.String>")]
    #[case("java.util.Map<java.lang.String,java.util.List<? extends java.lang.Number>>")]
    #[case("java.util.Map.Entry<K,V>")]
    #[case("byte[][]")]
    #[case("java.util.function.Consumer<? super T>")]
    #[case("java.lang.Class<?>")]
    fn test_display_reproduces_input(#[case] input: &str) {
        assert_eq!(parse(input).to_string(), input);
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(
            parse(" java.util.Map < K , java.util.List< V > > [ ] "),
            parse("java.util.Map<K,java.util.List<V>>[]")
        );
    }

    #[test]
    fn test_parse_structure() {
        let ty = parse("java.util.Map.Entry<K, int[]>");
        let TypeRef::Declared { class, args } = ty else {
            panic!("expected a declared type");
        };
        assert_eq!(class.package(), "java.util");
        assert_eq!(class.relative_name(), "Map.Entry");
        assert_eq!(args.len(), 2);
        assert_eq!(
            args[1],
            TypeRef::Array(Box::new(TypeRef::Primitive(PrimitiveKind::Int)))
        );
    }

    #[rstest]
    #[case("", "expected a type name")]
    #[case("java.util.List<int>", "type arguments cannot be primitive")]
    #[case("java.util.List<java.lang.String", "expected `,` or `>`")]
    #[case("int[", "expected `]`")]
    #[case("void[]", "`void` cannot be an array element")]
    #[case("com.example.lower", "not a class name")]
    #[case("? implements Foo", "expected `extends` or `super` after `?`")]
    #[case("java.lang.String extra", "unexpected trailing input")]
    #[case("class", "not a valid identifier")]
    fn test_parse_errors(#[case] input: &str, #[case] reason: &str) {
        let err = input.parse::<TypeRef>().unwrap_err();
        assert_eq!(err.reason, reason);
    }

    #[test]
    fn test_boxed_mapping() {
        assert_eq!(parse("int").boxed(), parse("java.lang.Integer"));
        assert_eq!(parse("boolean").boxed(), parse("java.lang.Boolean"));
        assert_eq!(
            TypeRef::TypeVariable("T".to_string()).boxed(),
            parse("java.lang.Object")
        );
        assert_eq!(parse("int[]").boxed(), parse("int[]"));
        assert_eq!(parse("java.util.List<T>").boxed(), parse("java.util.List<T>"));
    }

    #[test]
    fn test_resolve_type_variables() {
        let scope = vec!["T".to_string(), "E".to_string()];
        let ty = parse("java.util.Map<T, java.util.List<E[]>>").resolve_type_variables(&scope);

        let expected = TypeRef::Declared {
            class: ClassName::best_guess("java.util.Map").unwrap(),
            args: vec![
                TypeRef::TypeVariable("T".to_string()),
                TypeRef::Declared {
                    class: ClassName::best_guess("java.util.List").unwrap(),
                    args: vec![TypeRef::Array(Box::new(TypeRef::TypeVariable(
                        "E".to_string(),
                    )))],
                },
            ],
        };
        assert_eq!(ty, expected);

        // names outside the scope stay classes
        assert_eq!(parse("U").resolve_type_variables(&scope), parse("U"));
    }
}
