//! Go code generation for `gen`.
//!
//! Semantic checks run first; generation itself cannot fail.

use std::collections::HashSet;

use crate::ast::{Body, Decl, DeclKind, MemberKind, Module, TypeRef};
use crate::error::CompileError;

/// Generator knobs; the CLI fills these from its config file.
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Emit the "Code generated ... DO NOT EDIT." header.
    pub header: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self { header: true }
    }
}

/// Compile a module into Go source for `package` with default options.
pub fn compile(module: &Module, package: &str) -> Result<String, CompileError> {
    compile_with(module, package, &GenOptions::default())
}

pub fn compile_with(
    module: &Module,
    package: &str,
    options: &GenOptions,
) -> Result<String, CompileError> {
    check(module)?;

    let mut out = String::new();
    if options.header {
        out.push_str("// Code generated by idspec. DO NOT EDIT.\n\n");
    }
    out.push_str(&format!("package {package}\n"));

    let imports: Vec<&Decl> = module.decls().iter().filter(|d| d.is_import()).collect();
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for decl in imports {
            if let DeclKind::Import { path } = decl.kind() {
                out.push_str(&format!("\t{} {}\n", decl.name(), path));
            }
        }
        out.push_str(")\n");
    }

    for decl in module.decls().iter().filter(|d| !d.is_import()) {
        out.push('\n');
        for comment in decl.comments() {
            out.push_str(comment);
            out.push('\n');
        }
        match decl.kind() {
            DeclKind::Alias(ty) => {
                out.push_str(&format!("type {} {}", decl.name(), go_type(ty)));
                if let Some(comment) = decl.trailing_comment() {
                    out.push(' ');
                    out.push_str(comment);
                }
                out.push('\n');
            }
            DeclKind::Struct(body) => emit_struct(&mut out, decl.name(), body),
            DeclKind::Union(body) => emit_union(&mut out, decl.name(), body),
            DeclKind::Import { .. } => {}
        }
    }

    if !module.trailing_comments().is_empty() {
        out.push('\n');
        for comment in module.trailing_comments() {
            out.push_str(comment);
            out.push('\n');
        }
    }
    tracing::debug!(package, bytes = out.len(), "generated go source");
    Ok(out)
}

fn emit_struct(out: &mut String, name: &str, body: &Body) {
    let fields: Vec<(String, String, Option<&str>)> = body
        .fields()
        .map(|(m, ty)| (exported(&m.name), go_type(ty), m.trailing.as_deref()))
        .collect();
    out.push_str(&format!("type {name} struct {{\n"));
    emit_aligned_fields(out, &fields);
    out.push_str("}\n");
    emit_methods(out, name, body);
}

fn emit_union(out: &mut String, name: &str, body: &Body) {
    let case_type = format!("{name}_Case");
    out.push_str(&format!("type {case_type} int\n\nconst (\n"));
    for (i, (member, _)) in body.fields().enumerate() {
        if i == 0 {
            out.push_str(&format!("\t{case_type}_{} {case_type} = iota\n", member.name));
        } else {
            out.push_str(&format!("\t{case_type}_{}\n", member.name));
        }
    }
    out.push_str(")\n\n");

    let mut fields: Vec<(String, String, Option<&str>)> =
        vec![("Which".to_string(), case_type.clone(), None)];
    fields.extend(body.fields().map(|(m, ty)| {
        (
            exported(&m.name),
            format!("*{}", go_type(ty)),
            m.trailing.as_deref(),
        )
    }));
    out.push_str(&format!("type {name} struct {{\n"));
    emit_aligned_fields(out, &fields);
    out.push_str("}\n");
    emit_methods(out, name, body);
}

fn emit_aligned_fields(out: &mut String, fields: &[(String, String, Option<&str>)]) {
    let width = fields
        .iter()
        .map(|(name, _, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    for (name, ty, comment) in fields {
        out.push_str(&format!("\t{name:<width$} {ty}"));
        if let Some(comment) = comment {
            out.push(' ');
            out.push_str(comment);
        }
        out.push('\n');
    }
}

fn emit_methods(out: &mut String, name: &str, body: &Body) {
    let methods: Vec<_> = body.methods().collect();
    if methods.is_empty() {
        return;
    }
    out.push_str(&format!("\ntype {name}_I interface {{\n"));
    for member in methods {
        if let MemberKind::Method { params, ret } = &member.kind {
            let params = params
                .iter()
                .map(|p| format!("{} {}", p.name, go_type(&p.ty)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("\t{}({})", exported(&member.name), params));
            if let Some(ret) = ret {
                out.push(' ');
                out.push_str(&go_type(ret));
            }
            out.push('\n');
        }
    }
    out.push_str("}\n");
}

/// Go spelling of a spec type.
pub fn go_type(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named(name) => match name.as_str() {
            "bytes" => "[]byte".to_string(),
            "float" => "float64".to_string(),
            "any" => "interface{}".to_string(),
            other => other.to_string(),
        },
        TypeRef::Qualified { package, name } => format!("{package}.{name}"),
        TypeRef::Array(inner) => format!("[]{}", go_type(inner)),
        TypeRef::Map { key, value } => format!("map[{}]{}", go_type(key), go_type(value)),
        TypeRef::Ref(inner) => format!("*{}", go_type(inner)),
    }
}

fn exported(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn check(module: &Module) -> Result<(), CompileError> {
    let mut names = HashSet::new();
    for decl in module.decls() {
        if !names.insert(decl.name()) {
            return Err(CompileError::DuplicateDecl(decl.name().to_string()));
        }
    }
    let imports: HashSet<&str> = module
        .decls()
        .iter()
        .filter(|d| d.is_import())
        .map(|d| d.name())
        .collect();

    for decl in module.decls() {
        let refs: Vec<&TypeRef> = match decl.kind() {
            DeclKind::Import { .. } => continue,
            DeclKind::Alias(ty) => vec![ty],
            DeclKind::Struct(body) | DeclKind::Union(body) => {
                check_members(decl, body)?;
                body.members.iter().flat_map(|m| m.type_refs()).collect()
            }
        };
        for root in refs {
            let mut failure = None;
            root.walk(&mut |ty| {
                if failure.is_some() {
                    return;
                }
                match ty {
                    TypeRef::Map { key, .. }
                        if !matches!(**key, TypeRef::Named(_) | TypeRef::Qualified { .. }) =>
                    {
                        failure = Some(CompileError::InvalidMapKey {
                            decl: decl.name().to_string(),
                            key: key.to_string(),
                        });
                    }
                    TypeRef::Qualified { package, .. } if !imports.contains(package.as_str()) => {
                        failure = Some(CompileError::UnknownImport {
                            decl: decl.name().to_string(),
                            package: package.clone(),
                        });
                    }
                    _ => {}
                }
            });
            if let Some(err) = failure {
                return Err(err);
            }
        }
    }
    Ok(())
}

fn check_members(decl: &Decl, body: &Body) -> Result<(), CompileError> {
    let mut seen = HashSet::new();
    for member in &body.members {
        if !seen.insert(exported(&member.name)) {
            return Err(CompileError::DuplicateMember {
                decl: decl.name().to_string(),
                member: member.name.clone(),
            });
        }
    }
    if matches!(decl.kind(), DeclKind::Union(_)) && body.fields().next().is_none() {
        return Err(CompileError::EmptyUnion(decl.name().to_string()));
    }
    Ok(())
}
