use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::{NamespaceTargets, TargetCatalog};
use crate::error::{CwqError, Result};
use crate::pivot::Layout;
use crate::query::DEFAULT_PERIOD_SECS;
use crate::time::{Resolution, parse_period, validate_period};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub period: u32,
    pub layout: Layout,
    pub resolution: Resolution,
    pub targets: TargetCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD_SECS,
            layout: Layout::TimeRows,
            resolution: Resolution::Seconds,
            targets: TargetCatalog::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            tracing::debug!(path = %config_path.display(), "loaded config file");
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        let env_overrides = load_env_overrides();
        apply_overrides(&mut cfg, env_overrides, "environment")?;
        Ok(cfg)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    period: Option<PeriodValue>,
    layout: Option<String>,
    resolution: Option<String>,
    targets: Option<BTreeMap<String, NamespaceTargets>>,
}

/// `period = 3600` and `period = "1h"` are both accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PeriodValue {
    Seconds(u64),
    Text(String),
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("CWQ_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("cwq/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| CwqError::Config(format!("failed reading {}: {e}", path.display())))?;
    let parsed: ConfigOverrides = toml::from_str(&raw)
        .map_err(|e| CwqError::Config(format!("failed parsing {}: {e}", path.display())))?;
    Ok(Some(parsed))
}

fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        period: env::var("CWQ_PERIOD").ok().map(PeriodValue::Text),
        layout: env::var("CWQ_LAYOUT").ok(),
        resolution: env::var("CWQ_RESOLUTION").ok(),
        targets: None,
    }
}

fn apply_overrides(cfg: &mut Config, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.period {
        let parsed = match &v {
            PeriodValue::Seconds(secs) => validate_period(*secs),
            PeriodValue::Text(text) => parse_period(text),
        };
        cfg.period =
            parsed.map_err(|e| CwqError::Config(format!("bad period in {source}: {e}")))?;
    }
    if let Some(v) = overrides.layout {
        cfg.layout = v.parse().map_err(|e| {
            CwqError::Config(format!("bad layout in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.resolution {
        cfg.resolution = v.parse().map_err(|e| {
            CwqError::Config(format!("bad resolution in {source}: {e} (value={v})"))
        })?;
    }
    if let Some(v) = overrides.targets {
        cfg.targets = TargetCatalog::from_targets(v)
            .map_err(|e| CwqError::Config(format!("bad targets in {source}: {e}")))?;
    }
    Ok(())
}
