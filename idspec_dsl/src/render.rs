//! Canonical rendering of parsed modules.
//!
//! The output is the one true layout of a spec file: `fmt` rewrites a file
//! whenever its bytes differ from `render(parse(file))`.

use crate::ast::{Body, Decl, DeclKind, Member, MemberKind, Module};

const INDENT: &str = "    ";

/// Render a module to canonical source text.
pub fn render(module: &Module) -> String {
    let mut out = String::new();
    let mut previous: Option<&Decl> = None;
    for decl in module.decls() {
        if let Some(prev) = previous {
            if !(prev.is_import() && decl.is_import()) {
                out.push('\n');
            }
        }
        out.push_str(&render_decl(decl));
        out.push('\n');
        previous = Some(decl);
    }
    if !module.trailing_comments().is_empty() {
        if previous.is_some() {
            out.push('\n');
        }
        for comment in module.trailing_comments() {
            out.push_str(comment);
            out.push('\n');
        }
    }
    out
}

/// Render one declaration, leading comments included, without a final
/// newline.
pub(crate) fn render_decl(decl: &Decl) -> String {
    let mut out = String::new();
    for comment in decl.comments() {
        out.push_str(comment);
        out.push('\n');
    }
    match decl.kind() {
        DeclKind::Import { path } => {
            out.push_str(&format!("import {} {}", decl.name(), path));
        }
        DeclKind::Alias(ty) => {
            out.push_str(&format!("type {} {}", decl.name(), ty));
        }
        DeclKind::Struct(body) => {
            out.push_str(&format!("type {} struct", decl.name()));
            render_body(&mut out, body);
        }
        DeclKind::Union(body) => {
            out.push_str(&format!("type {} union", decl.name()));
            render_body(&mut out, body);
        }
    }
    if let Some(comment) = decl.trailing_comment() {
        out.push(' ');
        out.push_str(comment);
    }
    out
}

fn render_body(out: &mut String, body: &Body) {
    if body.members.is_empty() && body.trailing_comments.is_empty() {
        out.push_str(" {}");
        return;
    }
    out.push_str(" {\n");
    let widths = field_name_widths(&body.members);
    for (member, width) in body.members.iter().zip(widths) {
        if member.blank_before {
            out.push('\n');
        }
        for comment in &member.comments {
            out.push_str(INDENT);
            out.push_str(comment);
            out.push('\n');
        }
        out.push_str(INDENT);
        render_member(out, member, width);
        if let Some(comment) = &member.trailing {
            out.push(' ');
            out.push_str(comment);
        }
        out.push('\n');
    }
    for comment in &body.trailing_comments {
        out.push_str(INDENT);
        out.push_str(comment);
        out.push('\n');
    }
    out.push('}');
}

fn render_member(out: &mut String, member: &Member, width: usize) {
    match &member.kind {
        MemberKind::Field { ty } => {
            out.push_str(&format!("{:<width$} {}", member.name, ty));
        }
        MemberKind::Method { params, ret } => {
            let params = params
                .iter()
                .map(|p| format!("{} {}", p.name, p.ty))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("{}({})", member.name, params));
            if let Some(ret) = ret {
                out.push(' ');
                out.push_str(&ret.to_string());
            }
        }
    }
}

/// Column width for each member's name. Fields are aligned within runs of
/// consecutive fields; a blank line or a method ends the run.
pub(crate) fn field_name_widths(members: &[Member]) -> Vec<usize> {
    let mut widths = vec![0; members.len()];
    let mut start = 0;
    while start < members.len() {
        if members[start].is_method() {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < members.len() && !members[end].is_method() && !members[end].blank_before {
            end += 1;
        }
        let width = members[start..end]
            .iter()
            .map(|m| m.name.chars().count())
            .max()
            .unwrap_or(0);
        widths[start..end].fill(width);
        start = end;
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn fmt(src: &str) -> String {
        render(&parse(src).expect("parse"))
    }

    #[test]
    fn normalizes_spacing_and_alignment() {
        let src = "import abi \"x/abi\"\nimport  big \"x/big\"\n\n\n\ntype Tipset struct {\n  Blocks [&Block]\n      Height   abi.ChainEpoch\n\n\n  Weight( ) big.Int\n}\ntype Epoch   int";
        let expected = "\
import abi \"x/abi\"
import big \"x/big\"

type Tipset struct {
    Blocks [&Block]
    Height abi.ChainEpoch

    Weight() big.Int
}

type Epoch int
";
        assert_eq!(fmt(src), expected);
    }

    #[test]
    fn aligns_each_run_of_fields_separately() {
        let src = "type S struct {\n    A int\n    LongName string\n\n    B bool\n    Cc {K: V}\n    Do(x int, y [int]) int\n    Z int\n}\n";
        let expected = "\
type S struct {
    A        int
    LongName string

    B  bool
    Cc {K: V}
    Do(x int, y [int]) int
    Z int
}
";
        assert_eq!(fmt(src), expected);
    }

    #[test]
    fn keeps_every_comment() {
        let src = "// doc\ntype U union {\n  // first\n  A int // inline\n  // tail\n}   // after\n\n\n// eof\n";
        let expected = "\
// doc
type U union {
    // first
    A int // inline
    // tail
} // after

// eof
";
        assert_eq!(fmt(src), expected);
    }

    #[test]
    fn empty_bodies_and_modules() {
        assert_eq!(fmt("type E struct {\n\n}"), "type E struct {}\n");
        assert_eq!(fmt(""), "");
        assert_eq!(fmt("// only a comment"), "// only a comment\n");
    }

    #[test]
    fn rendering_is_a_fixed_point() {
        let src = "type A struct {\n B int\n\n // c\n C(x &A)   // m\n}\nimport x \"y\"\ntype D {K: [V]}\n";
        let once = fmt(src);
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn round_trip_preserves_decl_names_and_text() {
        let module = parse(
            "import a \"a\"\n// doc\ntype S struct {\n  X int\n  Y() a.T\n}\ntype V union { P int\n Q bool }\n",
        )
        .expect("parse");
        let reparsed = parse(&render(&module)).expect("reparse");
        let before: Vec<(String, String)> = module
            .decls()
            .iter()
            .map(|d| (d.name().to_string(), d.canonical_text()))
            .collect();
        let after: Vec<(String, String)> = reparsed
            .decls()
            .iter()
            .map(|d| (d.name().to_string(), d.canonical_text()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn decl_text_has_no_final_newline() {
        let module = parse("type A int // note\n").expect("parse");
        assert_eq!(module.decls()[0].canonical_text(), "type A int // note");
    }
}
