pub mod schema;

pub use schema::{Config, DashboardConfig, LogFormat, LoggingConfig};

use crate::scoring::{validate_scoring, ScoringConfig};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
pub const MAX_TREND_MONTHS: u32 = 60;
/// Upper bound for every dashboard day window (ten years).
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Get the config directory path (~/.config/retention-desk/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("retention-desk"))
}

/// Get the default config file path (~/.config/retention-desk/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/retention-desk/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

/// Validate the whole configuration, collecting every problem.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(scoring) = &config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if let Some(dashboard) = &config.dashboard {
        let windows = [
            ("dashboard.revenue_window_days", dashboard.revenue_window_days),
            ("dashboard.inactivity_risk_days", dashboard.inactivity_risk_days),
            ("dashboard.calendar_window_days", dashboard.calendar_window_days),
        ];
        for (name, value) in windows {
            if let Some(days) = value {
                if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                    errors.push(format!(
                        "{} must be between 1 and {}, got {}",
                        name, MAX_WINDOW_DAYS, days
                    ));
                }
            }
        }
        if dashboard.list_limit == Some(0) {
            errors.push("dashboard.list_limit must be greater than 0".to_string());
        }
        if let Some(months) = dashboard.trend_months {
            if let Err(e) = check_trend_months("dashboard.trend_months", months) {
                errors.push(e);
            }
        }
    }

    if let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                level
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reject a trend span outside `1..=MAX_TREND_MONTHS`.
pub fn check_trend_months(name: &str, months: u32) -> Result<(), String> {
    if (1..=MAX_TREND_MONTHS).contains(&months) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TREND_MONTHS, months
        ))
    }
}

/// Config with every section filled in, as written by `init`.
pub fn default_config() -> Config {
    Config {
        dataset: None,
        scoring: Some(ScoringConfig::default()),
        dashboard: Some(DashboardConfig::default()),
        logging: Some(LoggingConfig::default()),
    }
}

/// Write the default configuration atomically.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if writing fails.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(&default_config()).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
