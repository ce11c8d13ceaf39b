use anyhow::Result;

pub fn run() -> Result<()> {
    let detectors = solguard_detectors::all_detectors();

    println!(
        "{:<24} {:<10} {:<12} Description",
        "Name", "Severity", "Confidence"
    );
    println!("{}", "-".repeat(96));

    for d in &detectors {
        println!(
            "{:<24} {:<10} {:<12} {}",
            d.name(),
            d.severity(),
            d.confidence(),
            d.description()
        );
    }

    println!("\nTotal: {} detectors", detectors.len());
    Ok(())
}
