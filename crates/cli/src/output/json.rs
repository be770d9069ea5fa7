use anyhow::Result;
use darkux_guard::report::DetectionReport;
use darkux_guard_monitor::ScanEvent;
use serde_json::json;

/// One report prints as an object, several as an array.
pub fn print(reports: &[DetectionReport]) -> Result<()> {
    let json = match reports {
        [report] => serde_json::to_string_pretty(report)?,
        _ => serde_json::to_string_pretty(reports)?,
    };
    println!("{json}");
    Ok(())
}

/// One JSON object per line, so a monitor stream can be piped.
pub fn print_event(event: &ScanEvent) -> Result<()> {
    println!("{}", serde_json::to_string(&event_json(event))?);
    Ok(())
}

fn event_json(event: &ScanEvent) -> serde_json::Value {
    json!({
        "sequence": event.sequence,
        "afterStop": event.after_stop,
        "changed": event.changed,
        "report": event.report.as_ref(),
    })
}
