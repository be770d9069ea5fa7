use anyhow::Result;
use colored::{ColoredString, Colorize};
use darkux_guard::finding::Severity;
use darkux_guard::report::DetectionReport;
use darkux_guard_monitor::ScanEvent;

pub fn print(reports: &[DetectionReport], quiet: bool, no_color: bool) -> Result<()> {
    if no_color {
        colored::control::set_override(false);
    }

    if !quiet {
        println!();
        println!("{}", "  darkux-guard - Dark Pattern Scan".bold());
        println!("  Pages scanned: {}", reports.len());
        println!();
    }

    for report in reports {
        print_report(report);
    }

    if !quiet && reports.len() > 1 {
        let critical: usize = reports.iter().map(|r| r.counts().critical).sum();
        let moderate: usize = reports.iter().map(|r| r.counts().moderate).sum();
        let lowest = reports.iter().map(|r| r.score()).min().unwrap_or(100);
        println!("{}", "  Summary".bold().underline());
        println!("    Critical:      {critical}");
        println!("    Moderate:      {moderate}");
        println!("    Lowest score:  {}", score_label(lowest));
        println!();
    }

    Ok(())
}

pub fn print_event(event: &ScanEvent) {
    let mut flags = Vec::new();
    if event.changed {
        flags.push("changed");
    }
    if event.after_stop {
        flags.push("after stop");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };

    println!(
        "{} {}{}",
        format!("#{}", event.sequence).bold(),
        event.report.timestamp().format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed(),
        flags
    );
    print_report(&event.report);
}

fn print_report(report: &DetectionReport) {
    let target = report.target().map(|t| t.as_str()).unwrap_or("<page>");
    println!("  {}  score {}/100", target.bold(), score_label(report.score()));

    let mut issues = report.issues().peekable();
    if issues.peek().is_none() {
        println!("    {} No issues detected.", "✓".green().bold());
    }
    for finding in issues {
        println!(
            "    [{}] {} ({})",
            severity_label(finding.severity),
            finding.title,
            finding.detector
        );
        if !finding.summary.is_empty() {
            println!("      {}", finding.summary);
        }
        if let Some(locator) = &finding.locator {
            println!("      {} {}", "-->".dimmed(), locator);
        }
    }

    for diagnostic in report.diagnostics() {
        println!(
            "    {} detector {} failed: {}",
            "!".yellow().bold(),
            diagnostic.detector,
            diagnostic.message
        );
    }
    println!();
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "CRITICAL".red().bold(),
        Severity::Moderate => "MODERATE".yellow().bold(),
        Severity::Safe => "SAFE".green(),
    }
}

fn score_label(score: u8) -> ColoredString {
    let text = score.to_string();
    match score {
        80..=100 => text.green().bold(),
        50..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}
