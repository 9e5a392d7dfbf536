use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSV file with pricing data. When unset, the default search paths are
    /// tried and the built-in sample catalog is the fallback.
    pub path: Option<PathBuf>,
    /// Currency assumed for the session; no conversion is performed.
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Default commitment term for lines that do not specify one (on-demand,
    /// 1yr, 3yr).
    pub default_term: String,
    /// Default reporting period (day, month, year).
    pub default_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for unit prices.
    pub unit_price_decimals: usize,
    /// Decimal places for line and total costs.
    pub cost_decimals: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: None,
                currency: "USD".to_string(),
            },
            simulation: SimulationConfig {
                default_term: "on-demand".to_string(),
                default_period: "month".to_string(),
            },
            display: DisplayConfig {
                unit_price_decimals: 4,
                cost_decimals: 2,
            },
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .cloudcost.toml in current dir, then ~/.config/cloudcost/config.toml
            let local = PathBuf::from(".cloudcost.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("cloudcost").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".cloudcost.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Incorrect value types");
                err.push_str("\n  Tip: Run 'cloudcost init' to create a new config file");
                err
            })?;
            Ok(config)
        } else {
            // Use defaults but warn if user explicitly provided a path
            if path.is_some() {
                eprintln!("WARNING: Config file not found: {}", config_path.display());
                eprintln!("   Using default configuration. Run 'cloudcost init' to create a config file.");
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}
