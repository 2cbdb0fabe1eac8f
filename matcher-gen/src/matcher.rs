//! Building matcher definitions and lowering them to Java.
//!
//! A [`MatcherSpec`] is the language-neutral description of one matcher: the
//! type it asserts on, that type's properties and the matchers of its nested
//! types. [`MatcherSpec::to_type_decl`] turns it into a class of this shape:
//!
//! ```text
//! @Generated(value = "<generator id>", date = "<timestamp>")
//! public class PersonMatcher extends TypeSafeMatcher<Person> {
//!   private final BeanPropertyMatcher<Person> beanPropertyMatcher;
//!
//!   public PersonMatcher() { ... }
//!
//!   public PersonMatcher withName(final Matcher<? super String> matcher) { ... }
//!   public PersonMatcher withName(final String value) { ... }
//!
//!   @Override public void describeTo(final Description description) { ... }
//!   @Override protected boolean matchesSafely(final Person item) { ... }
//!   @Override protected void describeMismatchSafely(final Person item, final Description description) { ... }
//!
//!   public static PersonMatcher isPerson() { ... }
//!
//!   public static class AddressMatcher extends TypeSafeMatcher<Person.Address> { ... }
//! }
//! ```
//!
//! The generated class declares no type parameters of its own. A generic
//! target is matched through its wildcard parameterization (`Box<?>`), and type
//! variables in property types are erased: to `Object` where a type stands on
//! its own and to `?` where it is a type argument.

use crate::emit::GeneratedUnit;
use crate::guard::{self, GenerationMarker};
use crate::java::{
    Annotation, ClassName, CompilationUnit, Expr, FieldDecl, Ident, MethodDecl, Modifier,
    PrimitiveKind, Statement, TypeDecl, TypeName, WildcardBound,
};
use crate::model::{Bound, DeclarationModel, TypeDescriptor, TypeRef};
use crate::property::{self, PropertyDescriptor};

use std::collections::BTreeSet;

const BEAN_PROPERTY_MATCHER_PACKAGE: &str =
    "io.github.marmer.testutils.generators.beanmatcher.dependencies";

/// What a round knows while building matchers for one configuration.
pub struct GenerationContext<'a> {
    pub model: &'a dyn DeclarationModel,
    /// Every type any configuration of the round wants a matcher for, nested
    /// types included.
    pub candidates: &'a BTreeSet<TypeDescriptor>,
    /// Qualified name of the declaration carrying the configuration.
    pub origin: &'a str,
}

/// The definition of one matcher class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherSpec {
    pub target: TypeDescriptor,
    pub properties: Vec<PropertyDescriptor>,
    pub nested: Vec<MatcherSpec>,
    pub marker: GenerationMarker,
    /// Declarations the matcher is derived from: the target, then the
    /// enclosing chain, then the configuration.
    pub originating: Vec<String>,
}

impl MatcherSpec {
    /// Builds the matcher of a top-level target.
    pub fn for_root(
        ty: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
        marker: &GenerationMarker,
    ) -> MatcherSpec {
        MatcherSpec::build(ty, ctx, marker, &[ctx.origin.to_string()])
    }

    /// Builds the matcher of `ty`, recursing into nested types that are
    /// candidates of the round.
    ///
    /// `originating` lists the declarations the enclosing matcher derives
    /// from; this matcher derives from `ty` and all of those.
    pub fn build(
        ty: &TypeDescriptor,
        ctx: &GenerationContext<'_>,
        marker: &GenerationMarker,
        originating: &[String],
    ) -> MatcherSpec {
        let mut own = Vec::with_capacity(originating.len() + 1);
        own.push(ty.qualified_name().to_string());
        own.extend(originating.iter().cloned());

        let nested = ctx
            .model
            .enclosed_types(ty)
            .into_iter()
            .filter(|inner| inner.is_public() && ctx.candidates.contains(inner))
            .filter(|inner| !own.iter().any(|name| name == inner.qualified_name()))
            .filter(|inner| !guard::is_self_generated(ctx.model, inner, &marker.generator_id))
            .map(|inner| MatcherSpec::build(&inner, ctx, marker, &own))
            .collect();

        MatcherSpec {
            target: ty.clone(),
            properties: property::extract(ty, ctx.model),
            nested,
            marker: marker.clone(),
            originating: own,
        }
    }

    pub fn matcher_name(&self) -> Ident {
        self.target.simple_name().suffixed("Matcher")
    }

    /// Originating elements of this matcher and every nested one, each once.
    pub fn originating_elements(&self) -> Vec<String> {
        let mut elements = Vec::new();
        let mut stack = vec![self];
        while let Some(spec) = stack.pop() {
            for element in &spec.originating {
                if !elements.contains(element) {
                    elements.push(element.clone());
                }
            }
            stack.extend(spec.nested.iter().rev());
        }
        elements
    }

    /// The target as matched: raw name, or wildcard parameterization when generic.
    fn target_type(&self) -> TypeName {
        let wildcards = (0..self.target.type_parameters())
            .map(|_| TypeName::Wildcard(None))
            .collect();
        TypeName::parameterized(self.target.class_name(), wildcards)
    }

    pub fn to_type_decl(&self) -> TypeDecl {
        let name = self.matcher_name();
        let this = TypeName::Local(name.clone());
        let target = self.target_type();
        let field = Ident::known("beanPropertyMatcher");

        let constructor = MethodDecl::constructor(name.clone())
            .modifiers(&[Modifier::Public])
            .statement(Statement::Assign {
                target: field.clone(),
                value: Expr::New {
                    ty: bean_property_matcher(&target),
                    args: vec![Expr::ClassLiteral(self.target.class_name())],
                },
            });

        let factory = MethodDecl::method(Ident::prefixed("is", self.target.simple_name().as_str()))
            .modifiers(&[Modifier::Public, Modifier::Static])
            .returns(this.clone())
            .statement(Statement::Return(Expr::New {
                ty: this.clone(),
                args: Vec::new(),
            }));

        TypeDecl::class(name)
            .annotate(generated(&self.marker))
            .modifiers(&[Modifier::Public])
            .extends(TypeName::parameterized(
                hamcrest("TypeSafeMatcher"),
                vec![target.clone()],
            ))
            .field(FieldDecl::new(
                bean_property_matcher(&target),
                field.clone(),
                &[Modifier::Private, Modifier::Final],
            ))
            .method(constructor)
            .methods(
                self.properties
                    .iter()
                    .flat_map(|property| with_methods(property, &this, &field)),
            )
            .methods(delegating_methods(&target, &field))
            .method(factory)
            .nested(
                self.nested
                    .iter()
                    .map(|nested| nested.to_type_decl().modifiers(&[Modifier::Static])),
            )
    }

    /// Renders the matcher into a source unit of the target's package.
    pub fn to_unit(&self, indent: &str) -> GeneratedUnit {
        let unit =
            CompilationUnit::new(self.target.package(), self.to_type_decl()).indent(indent);
        GeneratedUnit {
            package: self.target.package().to_string(),
            type_name: self.matcher_name(),
            source: unit.render(),
            originating_elements: self.originating_elements(),
            marker: self.marker.clone(),
        }
    }
}

fn hamcrest(name: &'static str) -> ClassName {
    ClassName::known("org.hamcrest", &[name])
}

fn bean_property_matcher(target: &TypeName) -> TypeName {
    TypeName::parameterized(
        ClassName::known(BEAN_PROPERTY_MATCHER_PACKAGE, &["BeanPropertyMatcher"]),
        vec![target.clone()],
    )
}

fn generated(marker: &GenerationMarker) -> Annotation {
    Annotation::new(ClassName::known("javax.annotation.processing", &["Generated"]))
        .member(Ident::known("value"), Expr::str(&marker.generator_id))
        .member(Ident::known("date"), Expr::str(&marker.timestamp))
}

fn override_annotation() -> Annotation {
    Annotation::new(ClassName::known("java.lang", &["Override"]))
}

/// `with<Name>(Matcher)` and `with<Name>(value)`.
fn with_methods(property: &PropertyDescriptor, this: &TypeName, field: &Ident) -> [MethodDecl; 2] {
    let method = Ident::prefixed("with", property.name.as_str());
    let matcher = Ident::known("matcher");
    let value = Ident::known("value");
    let key = Expr::str(property.name.as_str());

    let delegate = |argument: Expr| {
        Statement::Expr(Expr::call(
            Expr::name(field),
            Ident::known("with"),
            vec![key.clone(), argument],
        ))
    };

    [
        MethodDecl::method(method.clone())
            .modifiers(&[Modifier::Public])
            .parameter(
                TypeName::parameterized(
                    hamcrest("Matcher"),
                    vec![TypeName::super_of(type_name(&property.boxed))],
                ),
                matcher.clone(),
            )
            .returns(this.clone())
            .statement(delegate(Expr::name(&matcher)))
            .statement(Statement::Return(Expr::This)),
        MethodDecl::method(method)
            .modifiers(&[Modifier::Public])
            .parameter(type_name(&property.declared), value.clone())
            .returns(this.clone())
            .statement(delegate(Expr::StaticCall {
                owner: hamcrest("Matchers"),
                method: Ident::known("equalTo"),
                args: vec![Expr::name(&value)],
            }))
            .statement(Statement::Return(Expr::This)),
    ]
}

/// The `TypeSafeMatcher` overrides, all forwarding to the bean matcher.
fn delegating_methods(target: &TypeName, field: &Ident) -> [MethodDecl; 3] {
    let description = Ident::known("description");
    let item = Ident::known("item");
    let forward = |method: &'static str, args: &[&Ident]| {
        Expr::call(
            Expr::name(field),
            Ident::known(method),
            args.iter().map(|arg| Expr::name(arg)).collect(),
        )
    };

    [
        MethodDecl::method(Ident::known("describeTo"))
            .annotate(override_annotation())
            .modifiers(&[Modifier::Public])
            .parameter(TypeName::Class(hamcrest("Description")), description.clone())
            .statement(Statement::Expr(forward("describeTo", &[&description]))),
        MethodDecl::method(Ident::known("matchesSafely"))
            .annotate(override_annotation())
            .modifiers(&[Modifier::Protected])
            .parameter(target.clone(), item.clone())
            .returns(TypeName::Primitive(PrimitiveKind::Boolean))
            .statement(Statement::Return(forward("matches", &[&item]))),
        MethodDecl::method(Ident::known("describeMismatchSafely"))
            .annotate(override_annotation())
            .modifiers(&[Modifier::Protected])
            .parameter(target.clone(), item.clone())
            .parameter(TypeName::Class(hamcrest("Description")), description.clone())
            .statement(Statement::Expr(forward(
                "describeMismatch",
                &[&item, &description],
            ))),
    ]
}

/// The Java spelling of a property type.
pub(crate) fn type_name(ty: &TypeRef) -> TypeName {
    match ty {
        TypeRef::Primitive(kind) => TypeName::Primitive(*kind),
        // property types are never void
        TypeRef::Void | TypeRef::TypeVariable(_) => TypeName::object(),
        TypeRef::Declared { class, args } => {
            TypeName::parameterized(class.clone(), args.iter().map(type_argument).collect())
        }
        TypeRef::Array(element) => TypeName::Array(Box::new(type_name(element))),
        TypeRef::Wildcard(None) => TypeName::Wildcard(None),
        TypeRef::Wildcard(Some(Bound::Extends(bound))) => TypeName::Wildcard(Some(
            WildcardBound::Extends(Box::new(type_name(bound))),
        )),
        TypeRef::Wildcard(Some(Bound::Super(bound))) => TypeName::super_of(type_name(bound)),
    }
}

fn type_argument(ty: &TypeRef) -> TypeName {
    match ty {
        TypeRef::TypeVariable(_) => TypeName::Wildcard(None),
        other => type_name(other),
    }
}
