use std::path::Path;

use anyhow::{Context, Result};
use darkux_guard::config::Config;

use super::CONFIG_FILE;

pub fn run() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        eprintln!("Config file already exists: {}", path.display());
        return Ok(());
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
