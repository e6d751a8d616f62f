//! Print the default session configuration.

use airsketch_common::config::SessionConfig;

pub fn run() -> anyhow::Result<()> {
    println!("{}", SessionConfig::default().to_json_pretty()?);
    Ok(())
}
