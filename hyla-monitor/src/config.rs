use anyhow::{Context, Result};
use shared::DashboardConfig;
use std::path::Path;

/// Load the dashboard configuration, falling back to defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = DashboardConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Command-line overrides win over the file.
pub fn apply_overrides(
    mut config: DashboardConfig,
    api_base_url: Option<String>,
) -> DashboardConfig {
    if let Some(base_url) = api_base_url {
        config.api.base_url = base_url;
    }
    config
}
