//! Parsed representation of one `.id` file.
//!
//! A [`Module`] is immutable once built: the formatter renders it, the
//! symbol printer reads its decls, and the exporter queries its methods.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::render;

/// A type reference as written in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `Name`
    Named(String),
    /// `pkg.Name`
    Qualified { package: String, name: String },
    /// `[T]`
    Array(Box<TypeRef>),
    /// `{K: V}`
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    /// `&T`
    Ref(Box<TypeRef>),
}

impl TypeRef {
    /// Prefix names declared in this module with `package`.
    pub fn qualify(&self, package: &str, local: &HashSet<&str>) -> TypeRef {
        match self {
            TypeRef::Named(name) if !package.is_empty() && local.contains(name.as_str()) => {
                TypeRef::Qualified {
                    package: package.to_string(),
                    name: name.clone(),
                }
            }
            TypeRef::Named(_) | TypeRef::Qualified { .. } => self.clone(),
            TypeRef::Array(inner) => TypeRef::Array(Box::new(inner.qualify(package, local))),
            TypeRef::Map { key, value } => TypeRef::Map {
                key: Box::new(key.qualify(package, local)),
                value: Box::new(value.qualify(package, local)),
            },
            TypeRef::Ref(inner) => TypeRef::Ref(Box::new(inner.qualify(package, local))),
        }
    }

    /// Visit this reference and every nested one, outermost first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a TypeRef)) {
        visit(self);
        match self {
            TypeRef::Named(_) | TypeRef::Qualified { .. } => {}
            TypeRef::Array(inner) | TypeRef::Ref(inner) => inner.walk(visit),
            TypeRef::Map { key, value } => {
                key.walk(visit);
                value.walk(visit);
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Qualified { package, name } => write!(f, "{package}.{name}"),
            TypeRef::Array(inner) => write!(f, "[{inner}]"),
            TypeRef::Map { key, value } => write!(f, "{{{key}: {value}}}"),
            TypeRef::Ref(inner) => write!(f, "&{inner}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Field { ty: TypeRef },
    Method {
        params: Vec<Param>,
        ret: Option<TypeRef>,
    },
}

/// A field or method inside a `struct`/`union` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// Comment lines directly above the member.
    pub comments: Vec<String>,
    /// Comment on the same line, after the member.
    pub trailing: Option<String>,
    /// Source had a blank line before this member.
    pub blank_before: bool,
}

impl Member {
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    /// Every type reference used by this member.
    pub fn type_refs(&self) -> Vec<&TypeRef> {
        match &self.kind {
            MemberKind::Field { ty } => vec![ty],
            MemberKind::Method { params, ret } => {
                params.iter().map(|p| &p.ty).chain(ret.as_ref()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    pub members: Vec<Member>,
    /// Comments between the last member and the closing brace.
    pub trailing_comments: Vec<String>,
}

impl Body {
    pub fn fields(&self) -> impl Iterator<Item = (&Member, &TypeRef)> {
        self.members.iter().filter_map(|m| match &m.kind {
            MemberKind::Field { ty } => Some((m, ty)),
            MemberKind::Method { .. } => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_method())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// `import name "path"`; the literal keeps its quotes.
    Import { path: String },
    /// `type Name T`
    Alias(TypeRef),
    Struct(Body),
    Union(Body),
}

/// One named top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub(crate) name: String,
    pub(crate) kind: DeclKind,
    pub(crate) comments: Vec<String>,
    pub(crate) trailing: Option<String>,
}

impl Decl {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            comments: Vec::new(),
            trailing: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DeclKind {
        &self.kind
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn trailing_comment(&self) -> Option<&str> {
        self.trailing.as_deref()
    }

    pub fn is_import(&self) -> bool {
        matches!(self.kind, DeclKind::Import { .. })
    }

    /// `struct`/`union` body, if this is a composite type.
    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            DeclKind::Struct(body) | DeclKind::Union(body) => Some(body),
            DeclKind::Import { .. } | DeclKind::Alias(_) => None,
        }
    }

    /// Canonical text of this declaration, without a final newline.
    pub fn canonical_text(&self) -> String {
        render::render_decl(self)
    }
}

/// Method signature metadata exported by `methods-json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodPrototype {
    pub name: String,
    pub arg_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret_type: Option<String>,
}

/// The parsed form of exactly one `.id` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    decls: Vec<Decl>,
    trailing_comments: Vec<String>,
}

impl Module {
    pub fn new(decls: Vec<Decl>, trailing_comments: Vec<String>) -> Self {
        Self {
            decls,
            trailing_comments,
        }
    }

    pub fn decls(&self) -> &[Decl] {
        &self.decls
    }

    /// Comments after the last declaration.
    pub fn trailing_comments(&self) -> &[String] {
        &self.trailing_comments
    }

    /// Names of top-level `type` declarations.
    pub fn type_names(&self) -> HashSet<&str> {
        self.decls
            .iter()
            .filter(|d| !d.is_import())
            .map(|d| d.name())
            .collect()
    }

    /// Prototypes of every method on a top-level struct or union, in
    /// declaration order. Local type names are qualified with `package`.
    pub fn method_prototypes(&self, package: &str) -> Vec<MethodPrototype> {
        let local = self.type_names();
        self.decls
            .iter()
            .filter_map(Decl::body)
            .flat_map(|body| body.methods())
            .filter_map(|member| match &member.kind {
                MemberKind::Method { params, ret } => Some(MethodPrototype {
                    name: member.name.clone(),
                    arg_types: params
                        .iter()
                        .map(|p| p.ty.qualify(package, &local).to_string())
                        .collect(),
                    ret_type: ret.as_ref().map(|t| t.qualify(package, &local).to_string()),
                }),
                MemberKind::Field { .. } => None,
            })
            .collect()
    }
}
