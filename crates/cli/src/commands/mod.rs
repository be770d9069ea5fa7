pub mod init;
pub mod list;
pub mod monitor;
pub mod scan;

use std::path::{Path, PathBuf};

use darkux_guard::config::{Config, DetectorConfig};
use tracing::{debug, warn};

use crate::DetectorArgs;

pub const CONFIG_FILE: &str = ".darkux-guard.toml";

/// Config file plus command-line detector overrides.
pub struct Settings {
    pub config: Config,
    pub detectors: DetectorConfig,
}

impl Settings {
    pub fn load(args: &DetectorArgs) -> Self {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        if args.config.is_some() && !path.exists() {
            warn!(path = %path.display(), "config file not found; using defaults");
        }

        let config = Config::load_or_default(&path);
        let mut detectors = config.detector_config();
        apply_overrides(&mut detectors, &args.enable, true);
        apply_overrides(&mut detectors, &args.disable, false);
        debug!(enabled = ?detectors.enabled_keys(), "detectors resolved");

        Self { config, detectors }
    }
}

fn apply_overrides(detectors: &mut DetectorConfig, keys: &[String], enabled: bool) {
    for key in keys.iter().filter(|k| !k.trim().is_empty()) {
        if let Err(err) = detectors.set_raw(key, enabled) {
            warn!(error = %err, "ignoring detector override");
        }
    }
}

/// Local files and directories are scanned from disk; anything else is a URL.
pub fn is_local(target: &str) -> bool {
    Path::new(target).exists()
}
