use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use solguard::config::Config;
use solguard::detector::{AuditContext, DetectorRegistry};
use solguard::engine::AuditEngine;
use solguard::finding::Severity;
use solguard::report::AuditReport;
use solguard::source::{parser, validate_source, SourceText};

use crate::output;
use crate::{OutputFormat, SeverityFilter};

#[allow(clippy::too_many_arguments)]
pub fn run(
    path: &Path,
    bytecode: Option<String>,
    address: Option<String>,
    format: OutputFormat,
    severity: SeverityFilter,
    detectors: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    max_findings: Option<usize>,
    config_path: Option<PathBuf>,
    quiet: bool,
    no_color: bool,
) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from(".solguard.toml"));
    let config = Config::load(&config_path)?;

    // 1. Load source. A directory is treated as a flattened multi-file
    //    contract: every .sol file, concatenated in sorted path order.
    let raw_source = read_source(path)?;

    // 2. Precondition: the engine never starts on unrecognizable source.
    if let Err(e) = validate_source(&raw_source) {
        bail!("refusing to audit {}: {e}", path.display());
    }

    if !quiet {
        eprintln!("Auditing {}...", path.display());
    }

    // 3. Build detector set: config toggles first, then CLI filters.
    let mut all_dets = solguard_detectors::all_detectors();
    all_dets.retain(|d| config.is_detector_enabled(d.name()));
    if let Some(ref names) = detectors {
        all_dets.retain(|d| names.iter().any(|n| n == d.name()));
    }
    if let Some(ref names) = exclude {
        all_dets.retain(|d| !names.iter().any(|n| n == d.name()));
    }

    let mut registry = DetectorRegistry::new();
    registry.register_all(all_dets);
    let engine = AuditEngine::new(registry)
        .with_max_findings(max_findings.unwrap_or(config.global.max_findings));

    // 4. Parse (best effort; detectors degrade to text scans on None) and
    //    run the battery.
    let source = SourceText::new(raw_source);
    let tree = parser::parse_source(source.as_str());
    let ctx = AuditContext::new(
        &source,
        tree.as_ref(),
        bytecode.as_deref(),
        address.as_deref(),
    );
    let report = engine.audit(&ctx);

    // 5. Filter by severity threshold.
    let min_severity = match severity {
        SeverityFilter::Critical => Severity::Critical,
        SeverityFilter::High => Severity::High,
        SeverityFilter::Medium => Severity::Medium,
        SeverityFilter::Low => Severity::Low,
        SeverityFilter::Info => Severity::Informational,
    };
    let findings = DetectorRegistry::filter_by_severity(report.findings, &min_severity);
    let report = AuditReport::from_findings(findings);

    // 6. Output
    match format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Sarif => output::sarif::print(&report, &path.display().to_string())?,
        OutputFormat::Text => output::text::print(&report, quiet, no_color)?,
    }

    // 7. Exit code
    if report.total_findings > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path.is_dir() {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "sol"))
            .collect();
        if files.is_empty() {
            bail!("no .sol files found under {}", path.display());
        }
        files.sort();
        let mut combined = String::new();
        for file in &files {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            combined.push_str(&content);
            combined.push('\n');
        }
        Ok(combined)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }
}
