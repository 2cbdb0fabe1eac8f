use super::{
    DeclarationModel, Member, MemberKind, ModelError, TypeDescriptor, TypeKind, TypeRef,
    Visibility,
};
use crate::config::MatcherConfiguration;
use crate::emit::GeneratedUnit;
use crate::guard::GenerationMarker;
use crate::java::Ident;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A member declaration in the fixture format.
///
/// Types are written in Java syntax (`java.util.List<T>`, `int[]`) and parsed
/// when the owning type is added to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDef {
    pub name: String,
    #[serde(default)]
    pub kind: MemberKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default = "MemberDef::void")]
    pub returns: String,
    /// Type parameters declared by a generic method.
    #[serde(default)]
    pub type_parameters: Vec<String>,
}

impl MemberDef {
    fn void() -> String {
        "void".to_string()
    }

    /// A public instance method without parameters.
    pub fn method(name: impl Into<String>, returns: impl Into<String>) -> Self {
        MemberDef {
            name: name.into(),
            kind: MemberKind::Method,
            visibility: Visibility::Public,
            is_static: false,
            parameters: Vec::new(),
            returns: returns.into(),
            type_parameters: Vec::new(),
        }
    }

    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        MemberDef {
            kind: MemberKind::Field,
            ..MemberDef::method(name, ty)
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_parameter(mut self, ty: impl Into<String>) -> Self {
        self.parameters.push(ty.into());
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }
}

/// A type declaration in the fixture format.
///
/// Top-level definitions carry their qualified name; nested definitions carry
/// only their simple name and inherit package and enclosing chain from the
/// definition they are listed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub members: Vec<MemberDef>,
    #[serde(default)]
    pub nested: Vec<TypeDef>,
    #[serde(default)]
    pub generated: Option<GenerationMarker>,
}

impl TypeDef {
    /// A public class without members.
    pub fn new(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            kind: TypeKind::Class,
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
            generated: None,
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_type_parameters(mut self, names: &[&str]) -> Self {
        self.type_parameters
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.extends = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    /// Adds a public instance method without parameters.
    pub fn method(self, name: impl Into<String>, returns: impl Into<String>) -> Self {
        self.member(MemberDef::method(name, returns))
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn nested(mut self, nested: TypeDef) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn generated(mut self, marker: GenerationMarker) -> Self {
        self.generated = Some(marker);
        self
    }
}

/// A model and the configurations to run against it, as read from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDocument {
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub configurations: Vec<MatcherConfiguration>,
}

impl ModelDocument {
    #[cfg(feature = "json")]
    pub fn from_json(input: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn into_parts(self) -> Result<(InMemoryModel, Vec<MatcherConfiguration>), ModelError> {
        let model = self
            .types
            .into_iter()
            .fold(InMemoryModel::builder(), ModelBuilder::type_def)
            .build()?;
        Ok((model, self.configurations))
    }
}

#[derive(Debug, Default)]
pub struct ModelBuilder {
    types: Vec<TypeDef>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        ModelBuilder::default()
    }

    pub fn type_def(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    pub fn build(self) -> Result<InMemoryModel, ModelError> {
        let mut model = InMemoryModel::default();
        for def in self.types {
            model.add(def)?;
        }
        Ok(model)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    descriptor: TypeDescriptor,
    superclass: Option<String>,
    interfaces: Vec<String>,
    members: Vec<Member>,
    nested: Vec<String>,
    marker: Option<GenerationMarker>,
}

/// A declaration graph held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModel {
    types: BTreeMap<String, Entry>,
    /// Top-level types per package, in insertion order.
    packages: BTreeMap<String, Vec<String>>,
}

impl InMemoryModel {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Adds a top-level type and everything nested in it.
    pub fn add(&mut self, def: TypeDef) -> Result<TypeDescriptor, ModelError> {
        let (package, simple) = match def.name.rsplit_once('.') {
            Some((package, simple)) => (package.to_string(), simple.to_string()),
            None => (String::new(), def.name.clone()),
        };
        let descriptor = TypeDescriptor::new(package.clone(), ident(&simple, &def.name)?);
        let qualified_name = descriptor.qualified_name().to_string();

        let descriptor = self.insert(def, descriptor, &[])?;
        self.packages.entry(package).or_default().push(qualified_name);
        Ok(descriptor)
    }

    /// Makes a previously generated unit visible as a marked top-level type,
    /// the way a host sees generated sources in the next round.
    pub fn add_generated(&mut self, unit: &GeneratedUnit) -> Result<TypeDescriptor, ModelError> {
        self.add(TypeDef::new(unit.qualified_name()).generated(unit.marker.clone()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn insert(
        &mut self,
        def: TypeDef,
        descriptor: TypeDescriptor,
        outer_scope: &[String],
    ) -> Result<TypeDescriptor, ModelError> {
        let qualified_name = descriptor.qualified_name().to_string();
        if self.types.contains_key(&qualified_name) {
            return Err(ModelError::DuplicateType(qualified_name));
        }

        let descriptor = descriptor
            .with_kind(def.kind)
            .with_visibility(def.visibility)
            .with_type_parameters(def.type_parameters.len());

        let mut scope = outer_scope.to_vec();
        scope.extend(def.type_parameters.iter().cloned());

        let superclass = def
            .extends
            .as_deref()
            .map(|ty| raw_name(&qualified_name, ty))
            .transpose()?;
        let interfaces = def
            .implements
            .iter()
            .map(|ty| raw_name(&qualified_name, ty))
            .collect::<Result<Vec<_>, _>>()?;
        let members = def
            .members
            .into_iter()
            .map(|member| lower_member(&qualified_name, member, &scope))
            .collect::<Result<Vec<_>, _>>()?;

        // Reserve the name first so a nested type reusing it is reported.
        self.types.insert(
            qualified_name.clone(),
            Entry {
                descriptor: descriptor.clone(),
                superclass,
                interfaces,
                members,
                nested: Vec::new(),
                marker: def.generated,
            },
        );

        let mut nested = Vec::with_capacity(def.nested.len());
        for inner in def.nested {
            let inner_descriptor =
                TypeDescriptor::nested_in(&descriptor, ident(&inner.name, &inner.name)?);
            let inner_descriptor = self.insert(inner, inner_descriptor, &scope)?;
            nested.push(inner_descriptor.qualified_name().to_string());
        }
        if let Some(entry) = self.types.get_mut(&qualified_name) {
            entry.nested = nested;
        }

        Ok(descriptor)
    }

    fn entry(&self, ty: &TypeDescriptor) -> Option<&Entry> {
        self.types.get(ty.qualified_name())
    }

    fn descriptors<'a>(
        &'a self,
        names: impl IntoIterator<Item = &'a String>,
    ) -> Vec<TypeDescriptor> {
        names
            .into_iter()
            .filter_map(|name| self.type_named(name))
            .collect()
    }
}

impl DeclarationModel for InMemoryModel {
    fn package_members(&self, package: &str) -> Vec<TypeDescriptor> {
        self.packages
            .get(package)
            .map(|names| self.descriptors(names))
            .unwrap_or_default()
    }

    fn type_named(&self, qualified_name: &str) -> Option<TypeDescriptor> {
        self.types
            .get(qualified_name)
            .map(|entry| entry.descriptor.clone())
    }

    fn enclosed_types(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        self.entry(ty)
            .map(|entry| self.descriptors(&entry.nested))
            .unwrap_or_default()
    }

    fn superclass_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        self.entry(ty)?
            .superclass
            .as_deref()
            .and_then(|name| self.type_named(name))
    }

    fn interfaces_of(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        self.entry(ty)
            .map(|entry| self.descriptors(&entry.interfaces))
            .unwrap_or_default()
    }

    fn members_of(&self, ty: &TypeDescriptor) -> Vec<Member> {
        self.entry(ty)
            .map(|entry| entry.members.clone())
            .unwrap_or_default()
    }

    fn marker_of(&self, ty: &TypeDescriptor) -> Option<GenerationMarker> {
        self.entry(ty)?.marker.clone()
    }
}

fn ident(name: &str, context: &str) -> Result<Ident, ModelError> {
    Ident::new(name).map_err(|source| ModelError::InvalidIdentifier {
        name: context.to_string(),
        source,
    })
}

fn parse_type(owner: &str, ty: &str, scope: &[String]) -> Result<TypeRef, ModelError> {
    ty.parse::<TypeRef>()
        .map(|parsed| parsed.resolve_type_variables(scope))
        .map_err(|source| ModelError::InvalidType {
            name: owner.to_string(),
            ty: ty.to_string(),
            source,
        })
}

/// Supertypes are looked up by their erased name.
fn raw_name(owner: &str, ty: &str) -> Result<String, ModelError> {
    Ok(match parse_type(owner, ty, &[])? {
        TypeRef::Declared { class, .. } => class.canonical_name(),
        other => other.to_string(),
    })
}

fn lower_member(owner: &str, def: MemberDef, scope: &[String]) -> Result<Member, ModelError> {
    let mut scope = scope.to_vec();
    scope.extend(def.type_parameters.iter().cloned());

    Ok(Member {
        name: ident(&def.name, &format!("{owner}.{}", def.name))?,
        kind: def.kind,
        visibility: def.visibility,
        is_static: def.is_static,
        parameters: def
            .parameters
            .iter()
            .map(|ty| parse_type(owner, ty, &scope))
            .collect::<Result<_, _>>()?,
        return_type: parse_type(owner, &def.returns, &scope)?,
    })
}
