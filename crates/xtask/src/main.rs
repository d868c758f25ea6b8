use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// The pure rules crate.
const DOMAIN_PACKAGE: &str = "vagabond-domain";

/// Dependencies the domain crate may declare (normal kind only).
const DOMAIN_ALLOWED_DEPS: &[&str] = &["serde", "thiserror", "uuid"];

/// Paths the domain sources must never reach for.
/// A crate path only counts at the start of a path, not as `super::config::`.
const DOMAIN_FORBIDDEN_PATHS: &str =
    r"(?:^|[\s(<&,{;])(?:rand|tracing|config|dotenvy)::|std::(?:fs|env|net)::";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata output")?;
    let domain = metadata
        .packages
        .iter()
        .find(|p| p.name == DOMAIN_PACKAGE)
        .with_context(|| format!("package {DOMAIN_PACKAGE} not found in workspace"))?;

    let mut violations = dependency_violations(domain);

    let src = domain
        .manifest_path
        .parent()
        .map(|dir| dir.join("src"))
        .context("domain manifest has no parent directory")?;
    violations.extend(source_violations(&src)?);

    if violations.is_empty() {
        println!("arch-check: {DOMAIN_PACKAGE} is free of infrastructure dependencies");
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

fn dependency_violations(package: &Package) -> Vec<String> {
    package
        .dependencies
        .iter()
        .filter(|dep| dep.kind.is_none())
        .filter(|dep| !DOMAIN_ALLOWED_DEPS.contains(&dep.name.as_str()))
        .map(|dep| format!("{} depends on {}", package.name, dep.name))
        .collect()
}

fn source_violations(dir: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = regex_lite::Regex::new(DOMAIN_FORBIDDEN_PATHS).context("compiling pattern")?;
    let mut violations = Vec::new();
    for path in rust_files(dir)? {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        for (line_no, line) in text.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            if let Some(found) = pattern.find(line) {
                violations.push(format!(
                    "{}:{} uses {}",
                    path.display(),
                    line_no + 1,
                    found
                        .as_str()
                        .trim_start_matches(|c: char| !c.is_alphanumeric())
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
