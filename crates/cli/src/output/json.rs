use anyhow::Result;
use solguard::report::AuditReport;

pub fn print(report: &AuditReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
