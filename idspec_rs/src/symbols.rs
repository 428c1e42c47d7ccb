//! The `sym` command: print selected declarations of one spec file.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use idspec_dsl::{Decl, Module};

use crate::error::{IdspecError, Result};
use crate::source::SourceFile;

/// A printable unit of `sym` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'m> {
    Decl(&'m Decl),
    Blank,
}

/// Name → decl lookup. When a name is declared twice the last one wins.
pub fn decl_index(module: &Module) -> HashMap<&str, &Decl> {
    let mut index = HashMap::new();
    for decl in module.decls() {
        if index.insert(decl.name(), decl).is_some() {
            tracing::warn!(symbol = decl.name(), "duplicate declaration, using the last one");
        }
    }
    index
}

/// Resolve every requested symbol, in request order, separated by blanks.
/// Fails on the first missing symbol without producing any entries.
pub fn select_entries<'m, S: AsRef<str>>(
    module: &'m Module,
    symbols: &[S],
) -> Result<Vec<Entry<'m>>> {
    let index = decl_index(module);
    let mut entries = Vec::with_capacity(symbols.len() * 2);
    for (i, symbol) in symbols.iter().enumerate() {
        let symbol = symbol.as_ref();
        let decl = index
            .get(symbol)
            .copied()
            .ok_or_else(|| IdspecError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        if i > 0 {
            entries.push(Entry::Blank);
        }
        entries.push(Entry::Decl(decl));
    }
    Ok(entries)
}

pub fn write_entries<W: Write>(out: &mut W, entries: &[Entry<'_>]) -> std::io::Result<()> {
    for entry in entries {
        match entry {
            Entry::Decl(decl) => writeln!(out, "{}", decl.canonical_text())?,
            Entry::Blank => writeln!(out)?,
        }
    }
    Ok(())
}

/// Run `sym <src> SYM...`.
pub fn run_sym<W: Write, S: AsRef<str>>(src: &Path, symbols: &[S], out: &mut W) -> Result<()> {
    let source = SourceFile::load(src)?;
    let entries = select_entries(&source.module, symbols)?;
    write_entries(out, &entries).map_err(|e| IdspecError::io("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "type A struct {\n    X int\n}\n\ntype B int\n";

    fn module() -> Module {
        idspec_dsl::parse(SRC).expect("parse")
    }

    fn print(module: &Module, symbols: &[&str]) -> Result<String> {
        let entries = select_entries(module, symbols)?;
        let mut out = Vec::new();
        write_entries(&mut out, &entries).expect("write");
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn prints_in_request_order_with_single_blank_separators() {
        let module = module();
        let text = print(&module, &["B", "A"]).expect("print");
        let a = module.decls()[0].canonical_text();
        let b = module.decls()[1].canonical_text();
        assert_eq!(text, format!("{b}\n\n{a}\n"));
        assert_eq!(text, "type B int\n\ntype A struct {\n    X int\n}\n");
    }

    #[test]
    fn repeats_are_allowed() {
        let text = print(&module(), &["B", "B"]).expect("print");
        assert_eq!(text, "type B int\n\ntype B int\n");
    }

    #[test]
    fn missing_symbol_fails_before_any_output() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("a.id");
        std::fs::write(&path, SRC).expect("write");

        let mut out = Vec::new();
        let err = run_sym(&path, &["A", "MISSING"], &mut out).expect_err("missing");
        assert!(out.is_empty());
        assert_eq!(err.to_string(), "symbol not found: MISSING");
    }

    #[test]
    fn duplicate_names_resolve_to_the_last_declaration() {
        let module = idspec_dsl::parse("type A int\ntype A bool\n").expect("parse");
        let index = decl_index(&module);
        assert_eq!(index.len(), 1);
        assert_eq!(print(&module, &["A"]).expect("print"), "type A bool\n");
    }

    #[test]
    fn imports_are_symbols_too() {
        let module = idspec_dsl::parse("import abi \"x/abi\"\ntype A abi.T\n").expect("parse");
        assert_eq!(
            print(&module, &["abi"]).expect("print"),
            "import abi \"x/abi\"\n"
        );
    }
}
