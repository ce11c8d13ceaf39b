use anyhow::Result;
use colored::Colorize;
use solguard::finding::Severity;
use solguard::report::AuditReport;

pub fn print(report: &AuditReport, quiet: bool, no_color: bool) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }

    if !quiet {
        println!();
        println!("{}", "  solguard - Token Contract Audit".bold());
        println!();
    }

    if report.findings.is_empty() {
        if !quiet {
            println!("  {} No issues found.", "✓".green().bold());
            println!();
        }
        return Ok(());
    }

    for finding in &report.findings {
        let severity_label = match finding.severity {
            Severity::Critical => "CRITICAL".red().bold().underline(),
            Severity::High => "HIGH".red().bold(),
            Severity::Medium => "MEDIUM".yellow().bold(),
            Severity::Low => "LOW".blue(),
            Severity::Informational => "INFO".dimmed(),
        };

        println!(
            "  [{}] {} ({})",
            severity_label, finding.name, finding.detector_name
        );
        println!("    {}", finding.explanation);
        println!("    {} {}", "Impact:".dimmed(), finding.impact);

        if !finding.code_snippet.is_empty() {
            for line in finding.code_snippet.lines() {
                println!("    {} {}", "|".dimmed(), line);
            }
        }

        println!("    {} {}", "Fix:".green(), finding.recommendation);
        println!();
    }

    if !quiet {
        println!("{}", "  Summary".bold().underline());
        println!("    Critical:      {}", report.findings_by_severity.critical);
        println!("    High:          {}", report.findings_by_severity.high);
        println!("    Medium:        {}", report.findings_by_severity.medium);
        println!("    Low:           {}", report.findings_by_severity.low);
        println!(
            "    Informational: {}",
            report.findings_by_severity.informational
        );
        println!("    Total:         {}", report.total_findings);
        println!();
    }

    Ok(())
}
