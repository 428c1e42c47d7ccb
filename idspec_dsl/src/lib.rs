//! # idspec-dsl
//!
//! The `.id` interface-definition language: tokenizer, parser, canonical
//! renderer, Go generator and package-name rule.
//!
//! The `idspec` CLI consumes this crate only through the functions
//! re-exported here:
//!
//! ```rust
//! use idspec_dsl::{parse, render};
//!
//! let module = parse("type  Epoch   int").unwrap();
//! assert_eq!(module.decls()[0].name(), "Epoch");
//! assert_eq!(render(&module), "type Epoch int\n");
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod package;
pub mod parser;
pub mod render;

pub use ast::{Body, Decl, DeclKind, Member, MemberKind, MethodPrototype, Module, Param, TypeRef};
pub use codegen::{GenOptions, compile, compile_with};
pub use error::{CompileError, ParseError};
pub use package::package_name;
pub use parser::parse;
pub use render::render;
