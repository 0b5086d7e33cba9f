//! Configuration file support for rework
//!
//! Loads `.rework.toml` from the current directory or its parents, or
//! imports an upstream `rector.php` / `fractor.php` / `.php-cs-fixer.php`
//! given with `--config`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use rework_core::{
    Configuration, OverrideAction, RuleOptions, RuleOverride, RuleSetReference, Tool, ToolOptions,
};

pub const CONFIG_FILE_NAME: &str = ".rework.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target tool: "rector", "fractor" or "fixer"
    pub tool: Option<String>,
    /// Include paths, relative to the config file
    pub paths: Vec<String>,
    /// Skip paths
    pub skip: Vec<String>,
    pub sets: Vec<String>,
    pub rules: Vec<String>,
    pub options: ToolOptions,
    pub overrides: Vec<OverrideConfig>,
    pub engine: EngineConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct OverrideConfig {
    pub rule: String,
    /// "skip" or "configure"
    pub action: String,
    #[serde(default)]
    pub options: Option<RuleOptions>,
    /// Limit a skip to files under these paths
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Command run once per work item
    pub command: Option<String>,
    /// Arguments placed before the rule and file
    pub args: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// YAML files with extra sets and rules
    pub extra: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text" or "json"
    pub format: Option<String>,
}

/// Everything the commands need from a configuration source
#[derive(Debug)]
pub struct Loaded {
    pub configuration: Configuration,
    pub engine: EngineConfig,
    pub extra_catalogs: Vec<PathBuf>,
    pub format: Option<String>,
    /// Directory relative paths were resolved against
    pub base_dir: PathBuf,
    /// The file the configuration came from
    pub origin: Option<PathBuf>,
}

impl Config {
    /// Load config from `.rework.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Build the typed configuration, resolving relative paths against
    /// `base_dir`
    pub fn to_configuration(&self, base_dir: &Path) -> Result<Configuration> {
        let Some(tool_name) = &self.tool else {
            bail!("Missing 'tool' (expected rector, fractor or fixer)");
        };
        let Some(tool) = Tool::from_str(tool_name) else {
            bail!(
                "Unknown tool '{}'. Valid options: rector, fractor, fixer",
                tool_name
            );
        };

        let mut configuration = Configuration::new(tool);
        if !self.paths.is_empty() {
            configuration = configuration.include(self.paths.iter().map(|p| resolve(p, base_dir)));
        }
        if !self.skip.is_empty() {
            configuration = configuration.skip(self.skip.iter().map(|p| resolve(p, base_dir)));
        }
        configuration.sets = self.sets.iter().map(RuleSetReference::new).collect();
        configuration.rules = self.rules.iter().map(|r| r.as_str().into()).collect();

        for entry in &self.overrides {
            let paths = entry.paths.iter().map(|p| resolve(p, base_dir)).collect();
            let action = OverrideAction::from_parts(
                &entry.rule,
                &entry.action,
                entry.options.clone(),
                paths,
            )?;
            configuration.overrides.push(RuleOverride {
                rule: entry.rule.as_str().into(),
                action,
            });
        }

        let mut options = self.options.clone();
        options.phpstan_config = options.phpstan_config.map(|p| base_dir.join(p));
        configuration.options = options;

        Ok(configuration)
    }

    /// Turn the file into everything the commands need
    pub fn into_loaded(self, origin: &Path) -> Result<Loaded> {
        let base_dir = origin
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let configuration = self
            .to_configuration(&base_dir)
            .with_context(|| format!("Invalid configuration in {}", origin.display()))?;
        let extra_catalogs = self.catalog.extra.iter().map(|p| base_dir.join(p)).collect();

        Ok(Loaded {
            configuration,
            engine: self.engine,
            extra_catalogs,
            format: self.output.format,
            base_dir,
            origin: Some(origin.to_path_buf()),
        })
    }
}

impl Loaded {
    /// A configuration without a file: one tool over one directory
    pub fn bare(tool: Tool, dir: &Path) -> Self {
        Self {
            configuration: Configuration::new(tool).include([dir.to_string_lossy()]),
            engine: EngineConfig::default(),
            extra_catalogs: Vec::new(),
            format: None,
            base_dir: dir.to_path_buf(),
            origin: None,
        }
    }
}

/// Load an explicit `--config` file, importing PHP payloads
pub fn load_explicit(path: &Path) -> Result<Loaded> {
    if path.extension().is_some_and(|ext| ext == "php") {
        let configuration = rework_phpconfig::import_file(path)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(Loaded {
            configuration,
            engine: EngineConfig::default(),
            extra_catalogs: Vec::new(),
            format: None,
            base_dir,
            origin: Some(path.to_path_buf()),
        });
    }

    Config::load_path(path)?.into_loaded(path)
}

/// Relative patterns are anchored at the config directory, except bare
/// globs such as `*.generated.php` that match a path component anywhere
fn resolve(pattern: &str, base_dir: &Path) -> String {
    let is_component_glob =
        !pattern.contains('/') && pattern.contains(|c| matches!(c, '*' | '?' | '['));
    if Path::new(pattern).is_absolute() || is_component_glob {
        pattern.to_string()
    } else {
        base_dir
            .join(pattern.trim_start_matches("./"))
            .to_string_lossy()
            .into_owned()
    }
}
