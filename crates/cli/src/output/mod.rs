pub mod json;
pub mod sarif;
pub mod text;

use anyhow::Result;
use darkux_guard_monitor::ScanEvent;

use crate::StreamFormat;

pub fn print_event(event: &ScanEvent, format: StreamFormat) -> Result<()> {
    match format {
        StreamFormat::Json => json::print_event(event),
        StreamFormat::Text => {
            text::print_event(event);
            Ok(())
        }
    }
}
