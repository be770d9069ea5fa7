use std::fmt;

use super::types::Finding;

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.severity, self.title, self.detector)?;
        if !self.summary.is_empty() {
            write!(f, ": {}", self.summary)?;
        }
        if let Some(locator) = &self.locator {
            write!(f, " at {locator}")?;
        }
        Ok(())
    }
}
