//! The `methods-json` command: export method prototypes as JSON.

use std::io::Write;
use std::path::PathBuf;

use idspec_dsl::MethodPrototype;

use crate::error::{IdspecError, Result};
use crate::source::SourceFile;

/// Collect prototypes from every file, in file order then module order.
pub fn collect_prototypes(files: &[PathBuf]) -> Result<Vec<MethodPrototype>> {
    let mut prototypes = Vec::new();
    for path in files {
        let source = SourceFile::load(path)?;
        let package = idspec_dsl::package_name(path);
        let found = source.module.method_prototypes(&package);
        tracing::debug!(path = %path.display(), %package, methods = found.len(), "collected");
        prototypes.extend(found);
    }
    Ok(prototypes)
}

/// Pretty-print with two-space indent, followed by a newline.
pub fn write_json<W: Write>(out: &mut W, prototypes: &[MethodPrototype]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, prototypes)?;
    writeln!(out).map_err(|e| IdspecError::io("<stdout>", e))
}

/// Run `methods-json <spec>` over already-resolved files. Nothing is
/// printed unless every file parses.
pub fn run_methods_json<W: Write>(files: &[PathBuf], out: &mut W) -> Result<()> {
    let prototypes = collect_prototypes(files)?;
    write_json(out, &prototypes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn export(files: &[PathBuf]) -> Result<String> {
        let mut out = Vec::new();
        run_methods_json(files, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn single_method_has_exact_shape() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("a.id");
        fs::write(&path, "type S struct {\n    foo(a int, b string) bool\n}\n").expect("write");

        let json = export(&[path]).expect("export");
        assert_eq!(
            json,
            "[\n  {\n    \"name\": \"foo\",\n    \"argTypes\": [\n      \"int\",\n      \"string\"\n    ],\n    \"retType\": \"bool\"\n  }\n]\n"
        );
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(
            value,
            serde_json::json!([{"name": "foo", "argTypes": ["int", "string"], "retType": "bool"}])
        );
    }

    #[test]
    fn aggregates_files_in_order_with_package_context() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let market = tmp.path().join("market");
        let miner = tmp.path().join("miner");
        fs::create_dir_all(&market).expect("mkdir");
        fs::create_dir_all(&miner).expect("mkdir");
        let deal = market.join("deal.id");
        let sector = miner.join("sector.id");
        fs::write(&deal, "type Deal struct {\n    Verify() bool\n}\n").expect("write");
        fs::write(
            &sector,
            "type Sector struct {\n    Seal(d Deal, s &Sector)\n    Size() int\n}\n",
        )
        .expect("write");

        let prototypes = collect_prototypes(&[sector, deal]).expect("collect");
        let summary: Vec<(String, Vec<String>, Option<String>)> = prototypes
            .into_iter()
            .map(|p| (p.name, p.arg_types, p.ret_type))
            .collect();
        assert_eq!(
            summary,
            vec![
                (
                    "Seal".to_string(),
                    vec!["Deal".to_string(), "&miner.Sector".to_string()],
                    None
                ),
                ("Size".to_string(), Vec::new(), Some("int".to_string())),
                ("Verify".to_string(), Vec::new(), Some("bool".to_string())),
            ]
        );
    }

    #[test]
    fn empty_export_is_an_empty_array() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let path = tmp.path().join("a.id");
        fs::write(&path, "type A int\n").expect("write");
        assert_eq!(export(&[path]).expect("export"), "[]\n");
    }

    #[test]
    fn any_parse_failure_suppresses_all_output() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let good = tmp.path().join("a.id");
        let bad = tmp.path().join("b.id");
        fs::write(&good, "type S struct {\n    F() int\n}\n").expect("write");
        fs::write(&bad, "type").expect("write");

        let mut out = Vec::new();
        let err = run_methods_json(&[good, bad], &mut out).expect_err("bad file");
        assert!(matches!(err, IdspecError::Parse { .. }));
        assert!(out.is_empty());
    }
}
