// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use curio_app::{
    ConversionRate, ControllerSettings, DEFAULT_BATCH_SIZE, DEFAULT_CONVERSION_RATE,
    DEFAULT_DISPLAY_SYMBOL, DEFAULT_PLACEHOLDER, DEFAULT_SOURCE_SYMBOL, RowFormat,
};
use curio_loader::DEFAULT_MANIFEST;
use curio_tui::DEFAULT_SCROLL_THRESHOLD_ROWS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "curio";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_DATA_ROOT: &str = "data";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_DEBOUNCE: &str = "500ms";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            view: View::default(),
            pricing: Pricing::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    pub root: Option<String>,
    pub manifest: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct View {
    pub batch_size: Option<i64>,
    pub debounce: Option<String>,
    pub scroll_threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pricing {
    pub rate: Option<f64>,
    pub source_symbol: Option<String>,
    pub display_symbol: Option<String>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("CURIO_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set CURIO_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and put values under [source], [view], [pricing], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(manifest) = &self.source.manifest
            && manifest.trim().is_empty()
        {
            bail!("source.manifest in {} must not be empty", path.display());
        }

        for (key, raw) in [
            ("source.timeout", self.source.timeout.as_deref()),
            ("view.debounce", self.view.debounce.as_deref()),
        ] {
            if let Some(raw) = raw
                && parse_duration(raw)? <= Duration::ZERO
            {
                bail!(
                    "{key} in {} must be positive, got {raw}",
                    path.display()
                );
            }
        }

        if let Some(batch_size) = self.view.batch_size
            && batch_size <= 0
        {
            bail!(
                "view.batch_size in {} must be positive, got {batch_size}",
                path.display()
            );
        }

        if let Some(threshold) = self.view.scroll_threshold
            && threshold < 0
        {
            bail!(
                "view.scroll_threshold in {} must be non-negative, got {threshold}",
                path.display()
            );
        }

        if let Some(rate) = self.pricing.rate {
            ConversionRate::new(rate)
                .with_context(|| format!("invalid pricing.rate in {}", path.display()))?;
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    /// `[source].root`, then `CURIO_DATA_ROOT`, then `data`.
    pub fn data_root(&self) -> String {
        if let Some(root) = &self.source.root {
            return root.clone();
        }
        env::var("CURIO_DATA_ROOT")
            .ok()
            .filter(|root| !root.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_ROOT.to_owned())
    }

    pub fn manifest(&self) -> &str {
        self.source.manifest.as_deref().unwrap_or(DEFAULT_MANIFEST)
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn row_format(&self) -> Result<RowFormat> {
        Ok(RowFormat {
            rate: ConversionRate::new(self.pricing.rate.unwrap_or(DEFAULT_CONVERSION_RATE))?,
            source_symbol: self
                .pricing
                .source_symbol
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE_SYMBOL.to_owned()),
            display_symbol: self
                .pricing
                .display_symbol
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY_SYMBOL.to_owned()),
            placeholder: self
                .pricing
                .placeholder
                .clone()
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_owned()),
        })
    }

    pub fn controller_settings(&self) -> Result<ControllerSettings> {
        Ok(ControllerSettings {
            batch_size: self
                .view
                .batch_size
                .map_or(DEFAULT_BATCH_SIZE, |size| size.max(1) as usize),
            debounce: parse_duration(self.view.debounce.as_deref().unwrap_or(DEFAULT_DEBOUNCE))?,
            scroll_threshold: self
                .view
                .scroll_threshold
                .map_or(DEFAULT_SCROLL_THRESHOLD_ROWS, |rows| rows.max(0) as usize),
            format: self.row_format()?,
        })
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log.path {
            return Ok(PathBuf::from(path));
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].path in the config")
        })?;
        Ok(data_root.join(APP_NAME).join("curio.log"))
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# curio config\n# Place this file at: {}\n\nversion = 1\n\n[source]\n# Directory or http(s) base URL holding the manifest. CURIO_DATA_ROOT is used when unset.\nroot = \"{DEFAULT_DATA_ROOT}\"\nmanifest = \"{DEFAULT_MANIFEST}\"\ntimeout = \"{DEFAULT_TIMEOUT}\"\n\n[view]\nbatch_size = {DEFAULT_BATCH_SIZE}\ndebounce = \"{DEFAULT_DEBOUNCE}\"\n# Rows from the end of the table that load the next batch.\nscroll_threshold = {DEFAULT_SCROLL_THRESHOLD_ROWS}\n\n[pricing]\nrate = {DEFAULT_CONVERSION_RATE}\nsource_symbol = \"{DEFAULT_SOURCE_SYMBOL}\"\ndisplay_symbol = \"{DEFAULT_DISPLAY_SYMBOL}\"\nplaceholder = \"{DEFAULT_PLACEHOLDER}\"\n\n[log]\n# Optional. Default is the platform data dir (for example ~/.local/share/curio/curio.log)\n# path = \"/absolute/path/to/curio.log\"\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
