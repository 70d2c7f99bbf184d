use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};

fn modimport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modimport"))
        .args(args)
        .output()
        .expect("run modimport")
}

fn path_arg(p: &Path) -> &str {
    p.to_str().expect("utf-8 temp path")
}

fn write_json(path: &Path, v: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(v).expect("encode json")).expect("write json");
}

fn decls_doc() -> Value {
    json!({
        "schema_version": "modimport.decls@0.1.0",
        "containers": [{
            "name": "DashStates",
            "partial": true,
            "import": {"surface": "CommunalHelper.DashStates"},
            "methods": [
                {"name": "GetState", "partial": true, "returns": "i32"},
                {"name": "SetState", "partial": true,
                 "params": [{"name": "state", "ty": "i32"}]}
            ]
        }]
    })
}

#[test]
fn gen_writes_then_check_accepts_identical_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let decls = dir.path().join("imports.decls.json");
    let out = dir.path().join("gen").join("imports.rs");
    write_json(&decls, &decls_doc());

    let o = modimport(&["gen", "--decls", path_arg(&decls), "--out", path_arg(&out)]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));

    let src = std::fs::read_to_string(&out).expect("read generated");
    assert!(src.starts_with("// @generated by modimport. Do not edit.\n"));
    assert!(src.contains("pub mod dash_states {"), "{src}");

    let o = modimport(&[
        "gen",
        "--decls",
        path_arg(&decls),
        "--out",
        path_arg(&out),
        "--check",
    ]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));

    std::fs::write(&out, "// stale\n").expect("overwrite");
    let o = modimport(&[
        "gen",
        "--decls",
        path_arg(&decls),
        "--out",
        path_arg(&out),
        "--check",
    ]);
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("generated output differs"));
    assert_eq!(
        std::fs::read_to_string(&out).expect("read"),
        "// stale\n",
        "--check must not write"
    );
}

#[test]
fn gen_reports_surface_errors_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let decls = dir.path().join("bad.decls.json");
    let out = dir.path().join("bad.rs");
    let mut doc = decls_doc();
    doc["containers"][0]["methods"][1]["params"][0]["mode"] = json!("params");
    write_json(&decls, &doc);

    let o = modimport(&["gen", "--decls", path_arg(&decls), "--out", path_arg(&out)]);
    assert!(!o.status.success());
    let stderr = String::from_utf8_lossy(&o.stderr);
    assert!(stderr.contains("1 import surface(s) failed"), "{stderr}");
    assert!(stderr.contains("\"params\""), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn check_and_fix_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let decls = dir.path().join("imports.decls.json");
    let mut doc = decls_doc();
    doc["containers"][0]["partial"] = json!(false);
    doc["containers"][0]["methods"][0]["body"] = json!("return 0;");
    write_json(&decls, &doc);

    let o = modimport(&["check", "--decls", path_arg(&decls)]);
    assert!(!o.status.success());
    let report: Value = serde_json::from_slice(&o.stdout).expect("report json");
    assert_eq!(report["diagnostics"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["diagnostics"][0]["code"], json!("MI0001"));

    let o = modimport(&["fix", "--decls", path_arg(&decls), "--write"]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));

    let o = modimport(&["check", "--decls", path_arg(&decls)]);
    assert!(o.status.success(), "stdout={}", String::from_utf8_lossy(&o.stdout));
    let fixed: Value =
        serde_json::from_slice(&std::fs::read(&decls).expect("read fixed")).expect("fixed json");
    assert_eq!(fixed["containers"][0]["partial"], json!(true));
    assert!(fixed["containers"][0]["methods"][0].get("body").is_none());
}

#[test]
fn batch_resolves_entries_next_to_the_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_json(&dir.path().join("a.decls.json"), &decls_doc());
    let manifest = dir.path().join("manifest.json");
    write_json(
        &manifest,
        &json!({
            "schema_version": "modimport.manifest@0.1.0",
            "entries": [
                {"decls": "a.decls.json", "out": "out/a.rs", "runtime_path": "crate::rt"}
            ]
        }),
    );

    let o = modimport(&["batch", "--manifest", path_arg(&manifest)]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));
    let src = std::fs::read_to_string(dir.path().join("out").join("a.rs")).expect("read a.rs");
    assert!(src.contains("crate::rt::ImportCell<Slots>"), "{src}");

    let o = modimport(&["batch", "--manifest", path_arg(&manifest), "--check"]);
    assert!(o.status.success(), "stderr={}", String::from_utf8_lossy(&o.stderr));
}

#[test]
fn batch_rejects_unknown_manifest_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manifest = dir.path().join("manifest.json");
    write_json(
        &manifest,
        &json!({"schema_version": "other@1", "entries": []}),
    );
    let o = modimport(&["batch", "--manifest", path_arg(&manifest)]);
    assert!(!o.status.success());
    assert!(String::from_utf8_lossy(&o.stderr).contains("schema_version mismatch"));
}
