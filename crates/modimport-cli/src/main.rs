use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modimport_contracts::{DEFAULT_RUNTIME_PATH, MANIFEST_SCHEMA_VERSION};
use modimport_core::decls::{self, DeclDocument};
use modimport_core::precheck;
use modimport_core::GenOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "modimport")]
#[command(about = "Generates runtime binding tables for declared import surfaces.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate every surface of a declaration document into one Rust file.
    Gen {
        #[arg(long)]
        decls: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// If set, fail if output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
        /// Path the generated code uses to reach the runtime crate.
        #[arg(long, default_value = DEFAULT_RUNTIME_PATH)]
        runtime_path: String,
        /// Omit rustdoc on generated items.
        #[arg(long, default_value_t = false)]
        no_docs: bool,
    },
    /// Print precondition diagnostics as JSON; fail if any fire.
    Check {
        #[arg(long)]
        decls: PathBuf,
    },
    /// Apply every offered quickfix to a declaration document.
    Fix {
        #[arg(long)]
        decls: PathBuf,
        /// Rewrite the document in place instead of printing it.
        #[arg(long, default_value_t = false)]
        write: bool,
    },
    /// Generate multiple files from a manifest.
    Batch {
        #[arg(long)]
        manifest: PathBuf,
        /// If set, fail if any output differs; do not write.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    try_main().map_err(|err| {
        eprintln!("{err:#}");
        err
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MODIMPORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Gen {
            decls,
            out,
            check,
            runtime_path,
            no_docs,
        } => {
            let options = GenOptions {
                runtime_path,
                emit_docs: !no_docs,
                ..GenOptions::default()
            };
            run_gen(&decls, &out, &options, check)
        }
        Command::Check { decls } => run_check(&decls),
        Command::Fix { decls, write } => run_fix(&decls, write),
        Command::Batch { manifest, check } => run_batch(&manifest, check),
    }
}

fn read_decls(path: &Path) -> Result<(Vec<u8>, DeclDocument)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read declarations: {}", path.display()))?;
    let doc = decls::parse_decls_json(&bytes)
        .with_context(|| format!("parse declarations: {}", path.display()))?;
    Ok((bytes, doc))
}

fn run_gen(decls_path: &Path, out_path: &Path, options: &GenOptions, check: bool) -> Result<()> {
    let (bytes, doc) = read_decls(decls_path)?;

    for d in precheck::check_document(&doc).diagnostics {
        warn!(code = %d.code, file = %decls_path.display(), "{}", d.message);
    }

    let sha = decls::source_digest(&bytes);
    let file = modimport_core::generate_file(doc.surfaces(), Some(&sha), options);
    if !file.is_ok() {
        let msgs: Vec<String> = file.errors.iter().map(|e| format!("  {e}")).collect();
        anyhow::bail!(
            "{} import surface(s) failed to generate from {}:\n{}",
            file.errors.len(),
            decls_path.display(),
            msgs.join("\n")
        );
    }
    info!(
        modules = file.modules.len(),
        out = %out_path.display(),
        "generated import surfaces"
    );
    write_output(out_path, &file.source, check)
}

fn run_check(decls_path: &Path) -> Result<()> {
    let (_, doc) = read_decls(decls_path)?;
    let report = precheck::check_document(&doc);
    let json = serde_json::to_string_pretty(&report).context("encode diagnostics report")?;
    println!("{json}");
    if !report.is_clean() {
        anyhow::bail!(
            "{} diagnostic(s) reported for {}",
            report.diagnostics.len(),
            decls_path.display()
        );
    }
    Ok(())
}

fn run_fix(decls_path: &Path, write: bool) -> Result<()> {
    let (bytes, doc) = read_decls(decls_path)?;
    let report = precheck::check_document(&doc);

    let mut raw: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse declarations: {}", decls_path.display()))?;
    let applied = precheck::apply_quickfixes(&mut raw, &report)
        .with_context(|| format!("apply quickfixes: {}", decls_path.display()))?;
    info!(applied, file = %decls_path.display(), "applied quickfixes");

    let mut out = serde_json::to_string_pretty(&raw).context("encode declarations")?;
    out.push('\n');
    if write {
        std::fs::write(decls_path, out.as_bytes())
            .with_context(|| format!("write declarations: {}", decls_path.display()))?;
    } else {
        print!("{out}");
    }
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    schema_version: String,
    entries: Vec<ManifestEntry>,
}

#[derive(Debug, serde::Deserialize)]
struct ManifestEntry {
    decls: String,
    out: String,
    #[serde(default)]
    runtime_path: Option<String>,
}

fn run_batch(manifest_path: &Path, check: bool) -> Result<()> {
    let bytes = std::fs::read(manifest_path)
        .with_context(|| format!("read manifest: {}", manifest_path.display()))?;
    let m: Manifest = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse manifest JSON: {}", manifest_path.display()))?;
    if m.schema_version.trim() != MANIFEST_SCHEMA_VERSION {
        anyhow::bail!(
            "manifest schema_version mismatch: expected {MANIFEST_SCHEMA_VERSION} got {:?}",
            m.schema_version
        );
    }

    // Entry paths are relative to the manifest.
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    for (idx, e) in m.entries.iter().enumerate() {
        let options = GenOptions {
            runtime_path: e
                .runtime_path
                .clone()
                .unwrap_or_else(|| DEFAULT_RUNTIME_PATH.to_string()),
            ..GenOptions::default()
        };
        run_gen(&base.join(&e.decls), &base.join(&e.out), &options, check)
            .with_context(|| format!("manifest entry[{idx}] {}", e.decls))?;
    }
    Ok(())
}

fn write_output(out_path: &Path, src: &str, check: bool) -> Result<()> {
    if check {
        let cur = std::fs::read_to_string(out_path)
            .with_context(|| format!("read existing output: {}", out_path.display()))?;
        if cur != src {
            anyhow::bail!("generated output differs: {}", out_path.display());
        }
        return Ok(());
    }

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(out_path, src.as_bytes())
        .with_context(|| format!("write output: {}", out_path.display()))?;
    Ok(())
}
