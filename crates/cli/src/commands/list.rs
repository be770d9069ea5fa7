use anyhow::Result;

pub fn run() -> Result<()> {
    let detectors = darkux_guard_detectors::all_detectors();

    println!(
        "{:<16} {:<10} {:<8} {:<8} Description",
        "Key", "Severity", "Penalty", "Default"
    );
    println!("{}", "-".repeat(100));

    for d in &detectors {
        let default = if d.key().default_enabled() { "on" } else { "off" };
        println!(
            "{:<16} {:<10} {:<8} {:<8} {}",
            d.key().as_str(),
            d.severity().to_string(),
            d.score_delta(),
            default,
            d.description()
        );
    }

    println!("\nTotal: {} detectors", detectors.len());
    Ok(())
}
