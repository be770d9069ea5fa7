use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of the page a scan or session is about: a URL or a snapshot path.
/// Not validated on construction; page sources reject identities they cannot load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the identity already carries an http(s) scheme.
    pub fn has_http_scheme(&self) -> bool {
        let lower = self.0.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }

    /// URL form of the target: bare hosts get `http://` prepended.
    pub fn to_url_string(&self) -> String {
        if self.has_http_scheme() {
            self.0.clone()
        } else {
            format!("http://{}", self.0)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Target {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_scheme() {
        assert_eq!(Target::new("example.com").to_url_string(), "http://example.com");
        assert_eq!(
            Target::new(" HTTPS://shop.test/cart ").to_url_string(),
            "HTTPS://shop.test/cart"
        );
    }

    #[test]
    fn test_empty_target() {
        assert!(Target::new("   ").is_empty());
    }
}
