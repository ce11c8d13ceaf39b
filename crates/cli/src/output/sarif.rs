use anyhow::Result;
use solguard::finding::Severity;
use solguard::report::{AuditReport, FindingSummary};
use serde_json::json;

/// Print SARIF 2.1.0 output for code-scanning integration.
pub fn print(report: &AuditReport, artifact: &str) -> Result<()> {
    // Build stable rule descriptions from detector metadata (not per-finding titles)
    let all_dets = solguard_detectors::all_detectors();
    let rules: Vec<serde_json::Value> = report
        .findings
        .iter()
        .map(|f| &f.detector_name)
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .map(|name| {
            let det = all_dets.iter().find(|d| d.name() == name);
            let finding = report.findings.iter().find(|f| &f.detector_name == name);
            json!({
                "id": name,
                "shortDescription": {
                    "text": det.map_or_else(
                        || finding.map_or("", |f| &f.detector_name).to_string(),
                        |d| d.description().to_string()
                    )
                },
                "defaultConfiguration": {
                    "level": finding.map_or("warning", |f| severity_to_sarif_level(&f.severity))
                }
            })
        })
        .collect();

    let results: Vec<serde_json::Value> = report
        .findings
        .iter()
        .map(|f| {
            let summary = FindingSummary::from(f);
            // Findings carry no line coordinates; the snippet itself is the
            // region.
            let mut location = json!({
                "physicalLocation": {
                    "artifactLocation": {
                        "uri": artifact
                    }
                }
            });
            if !f.code_snippet.is_empty() {
                location["physicalLocation"]["region"] = json!({
                    "snippet": { "text": f.code_snippet }
                });
            }
            json!({
                "ruleId": f.detector_name,
                "level": severity_to_sarif_level(&f.severity),
                "message": {
                    "text": format!("{}: {}", summary.title, summary.description)
                },
                "locations": [location]
            })
        })
        .collect();

    let sarif = json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "solguard",
                    "informationUri": "https://github.com/safestackai/solguard",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules
                }
            },
            "results": results
        }]
    });

    println!("{}", serde_json::to_string_pretty(&sarif)?);
    Ok(())
}

fn severity_to_sarif_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium => "warning",
        Severity::Low | Severity::Informational => "note",
    }
}
