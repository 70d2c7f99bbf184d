use std::path::PathBuf;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR is not set")?,
    );
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR is not set")?);

    let decls_path = manifest_dir.join("decls").join("imports.decls.json");
    println!("cargo:rerun-if-changed={}", decls_path.display());

    let bytes = std::fs::read(&decls_path)
        .with_context(|| format!("read declarations: {}", decls_path.display()))?;
    let doc = modimport_core::decls::parse_decls_json(&bytes)
        .with_context(|| format!("parse declarations: {}", decls_path.display()))?;

    let report = modimport_core::precheck::check_document(&doc);
    if !report.is_clean() {
        let msgs: Vec<String> = report
            .diagnostics
            .iter()
            .map(|d| format!("{}: {}", d.code, d.message))
            .collect();
        anyhow::bail!(
            "declarations need fixing (run `modimport fix`):\n{}",
            msgs.join("\n")
        );
    }

    let sha = modimport_core::decls::source_digest(&bytes);
    let file = modimport_core::generate_file(
        doc.surfaces(),
        Some(&sha),
        &modimport_core::GenOptions::default(),
    );
    if !file.is_ok() {
        let msgs: Vec<String> = file.errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("import generation failed:\n{}", msgs.join("\n"));
    }

    let out_path = out_dir.join("imports.rs");
    std::fs::write(&out_path, file.source.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    Ok(())
}
