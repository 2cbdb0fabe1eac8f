//! Pretty-printer for [`CompilationUnit`] trees.
//!
//! The body is printed first so that every class reference passes through the
//! [`ImportTable`] in source order; the package clause and the import block are
//! prepended afterwards.

use super::ast::{
    Annotation, ClassName, CompilationUnit, Expr, FieldDecl, Ident, MethodDecl, Modifier,
    Statement, TypeDecl, TypeName, WildcardBound,
};

use std::collections::{BTreeSet, HashMap};

pub(super) fn render(unit: &CompilationUnit) -> String {
    let mut printer = Printer {
        indent: &unit.indent,
        level: 0,
        out: String::new(),
        imports: ImportTable::new(&unit.package, unit.decl.declared_names()),
    };
    printer.type_decl(&unit.decl);

    let mut source = String::new();
    if !unit.package.is_empty() {
        source.push_str(&format!("package {};\n\n", unit.package));
    }
    if !printer.imports.imports.is_empty() {
        for import in &printer.imports.imports {
            source.push_str(&format!("import {import};\n"));
        }
        source.push('\n');
    }
    source.push_str(&printer.out);
    source
}

/// Decides how each class reference is spelled.
///
/// The first class to use a simple name owns it for the rest of the file. Any
/// later class with the same simple name, or one colliding with a type declared
/// in the file, is written fully qualified.
struct ImportTable<'a> {
    package: &'a str,
    reserved: BTreeSet<&'a str>,
    claimed: HashMap<String, ClassName>,
    imports: BTreeSet<String>,
}

impl<'a> ImportTable<'a> {
    fn new(package: &'a str, declared: Vec<&'a Ident>) -> Self {
        ImportTable {
            package,
            reserved: declared.into_iter().map(Ident::as_str).collect(),
            claimed: HashMap::new(),
            imports: BTreeSet::new(),
        }
    }

    fn reference(&mut self, class: &ClassName) -> String {
        let top = class.top_level();
        let simple = top.simple_name().as_str();

        if self.reserved.contains(simple) {
            return class.canonical_name();
        }

        match self.claimed.get(simple) {
            Some(owner) if *owner == top => class.relative_name(),
            Some(_) => class.canonical_name(),
            None => {
                let implicit = top.package().is_empty()
                    || top.package() == self.package
                    || top.package() == "java.lang";
                if !implicit {
                    self.imports.insert(top.canonical_name());
                }
                self.claimed.insert(simple.to_string(), top);
                class.relative_name()
            }
        }
    }
}

struct Printer<'a> {
    indent: &'a str,
    level: usize,
    out: String,
    imports: ImportTable<'a>,
}

impl Printer<'_> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        for annotation in &decl.annotations {
            let text = self.annotation(annotation);
            self.line(&text);
        }

        let mut header = modifiers(&decl.modifiers);
        header.push_str("class ");
        header.push_str(decl.name.as_str());
        if let Some(superclass) = &decl.superclass {
            header.push_str(" extends ");
            header.push_str(&self.type_name(superclass));
        }
        header.push_str(" {");
        self.line(&header);

        self.level += 1;
        let mut first = true;
        let mut separate = |printer: &mut Self| {
            if !first {
                printer.out.push('\n');
            }
            first = false;
        };
        for field in &decl.fields {
            separate(self);
            self.field(field);
        }
        for method in &decl.methods {
            separate(self);
            self.method(method);
        }
        for nested in &decl.nested {
            separate(self);
            self.type_decl(nested);
        }
        self.level -= 1;

        self.line("}");
    }

    fn field(&mut self, field: &FieldDecl) {
        let text = format!(
            "{}{} {};",
            modifiers(&field.modifiers),
            self.type_name(&field.ty),
            field.name
        );
        self.line(&text);
    }

    fn method(&mut self, method: &MethodDecl) {
        for annotation in &method.annotations {
            let text = self.annotation(annotation);
            self.line(&text);
        }

        let mut header = modifiers(&method.modifiers);
        if !method.constructor {
            match &method.returns {
                Some(ty) => header.push_str(&self.type_name(ty)),
                None => header.push_str("void"),
            }
            header.push(' ');
        }
        header.push_str(method.name.as_str());

        let parameters: Vec<String> = method
            .parameters
            .iter()
            .map(|parameter| {
                let ty = self.type_name(&parameter.ty);
                if parameter.is_final {
                    format!("final {ty} {}", parameter.name)
                } else {
                    format!("{ty} {}", parameter.name)
                }
            })
            .collect();
        header.push_str(&format!("({}) {{", parameters.join(", ")));
        self.line(&header);

        self.level += 1;
        for statement in &method.body {
            let text = self.statement(statement);
            self.line(&text);
        }
        self.level -= 1;

        self.line("}");
    }

    fn statement(&mut self, statement: &Statement) -> String {
        match statement {
            Statement::Expr(expr) => format!("{};", self.expr(expr)),
            Statement::Assign { target, value } => format!("{target} = {};", self.expr(value)),
            Statement::Return(expr) => format!("return {};", self.expr(expr)),
        }
    }

    fn annotation(&mut self, annotation: &Annotation) -> String {
        let name = self.imports.reference(&annotation.ty);
        match annotation.members.as_slice() {
            [] => format!("@{name}"),
            [(member, value)] if member.as_str() == "value" => {
                format!("@{name}({})", self.expr(value))
            }
            members => {
                let members: Vec<String> = members
                    .iter()
                    .map(|(member, value)| format!("{member} = {}", self.expr(value)))
                    .collect();
                format!("@{name}({})", members.join(", "))
            }
        }
    }

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Name(name) => name.to_string(),
            Expr::This => "this".to_string(),
            Expr::Str(value) => quote(value),
            Expr::ClassLiteral(class) => format!("{}.class", self.imports.reference(class)),
            Expr::New { ty, args } => {
                format!("new {}({})", self.type_name(ty), self.args(args))
            }
            Expr::Call {
                receiver,
                method,
                args,
            } => match receiver {
                Some(receiver) => {
                    format!("{}.{method}({})", self.expr(receiver), self.args(args))
                }
                None => format!("{method}({})", self.args(args)),
            },
            Expr::StaticCall {
                owner,
                method,
                args,
            } => {
                let owner = self.imports.reference(owner);
                format!("{owner}.{method}({})", self.args(args))
            }
        }
    }

    fn args(&mut self, args: &[Expr]) -> String {
        args.iter()
            .map(|arg| self.expr(arg))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn type_name(&mut self, ty: &TypeName) -> String {
        match ty {
            TypeName::Primitive(kind) => kind.keyword().to_string(),
            TypeName::Class(class) => self.imports.reference(class),
            TypeName::Local(name) => name.to_string(),
            TypeName::Parameterized { raw, args } => {
                let raw = self.imports.reference(raw);
                let args: Vec<String> = args.iter().map(|arg| self.type_name(arg)).collect();
                format!("{raw}<{}>", args.join(", "))
            }
            TypeName::Wildcard(None) => "?".to_string(),
            TypeName::Wildcard(Some(WildcardBound::Extends(bound))) => {
                format!("? extends {}", self.type_name(bound))
            }
            TypeName::Wildcard(Some(WildcardBound::Super(bound))) => {
                format!("? super {}", self.type_name(bound))
            }
            TypeName::Array(element) => format!("{}[]", self.type_name(element)),
        }
    }
}

fn modifiers(modifiers: &BTreeSet<Modifier>) -> String {
    modifiers
        .iter()
        .map(|modifier| format!("{} ", modifier.keyword()))
        .collect()
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
