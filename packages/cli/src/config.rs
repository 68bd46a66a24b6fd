use adork_playground_common::OutputMode;
use adork_playground_editor::TimestampPolicy;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_NAME: &str = "adork-playground.config.json";

/// Playground configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Maximum line width of the formatted HTML
    #[serde(default = "default_print_width")]
    pub print_width: usize,

    /// Quiet period before an edit is converted
    #[serde(default)]
    pub debounce_ms: u64,

    /// Timestamp handed to the engine
    #[serde(default)]
    pub timestamp: TimestampSetting,

    /// Conversion engine; without one the playground shows the initial content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    /// Replaces the built-in greeting shown before the first conversion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_content: Option<String>,
}

fn default_print_width() -> usize {
    60
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Program to run, looked up on PATH
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// How the program reports its result
    #[serde(default)]
    pub output: OutputMode,
}

/// `"now"`, `"none"`, or fixed seconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampSetting {
    Fixed(i64),
    Named(NamedTimestamp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedTimestamp {
    Now,
    None,
}

impl Default for TimestampSetting {
    fn default() -> Self {
        TimestampSetting::Named(NamedTimestamp::Now)
    }
}

impl From<TimestampSetting> for TimestampPolicy {
    fn from(setting: TimestampSetting) -> Self {
        match setting {
            TimestampSetting::Fixed(seconds) => TimestampPolicy::Fixed(seconds),
            TimestampSetting::Named(NamedTimestamp::Now) => TimestampPolicy::Now,
            TimestampSetting::Named(NamedTimestamp::None) => TimestampPolicy::None,
        }
    }
}

impl FromStr for TimestampSetting {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "now" => Ok(TimestampSetting::Named(NamedTimestamp::Now)),
            "none" => Ok(TimestampSetting::Named(NamedTimestamp::None)),
            other => other
                .parse()
                .map(TimestampSetting::Fixed)
                .map_err(|_| anyhow!("Invalid timestamp: {}. Use: now, none, or seconds", other)),
        }
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Load an explicitly named config file; it must exist
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `explicit` when given, otherwise the default file in `cwd`
    pub fn resolve(explicit: Option<&PathBuf>, cwd: &Path) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => Self::load(cwd),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            print_width: default_print_width(),
            debounce_ms: 0,
            timestamp: TimestampSetting::default(),
            engine: None,
            initial_content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "printWidth": 80,
            "debounceMs": 150,
            "timestamp": 1700000000,
            "engine": { "command": "asciidork", "args": ["--json"], "output": "json" },
            "initialContent": "<p>Loading</p>"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.print_width, 80);
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.timestamp, TimestampSetting::Fixed(1_700_000_000));
        assert_eq!(
            config.engine,
            Some(EngineConfig {
                command: "asciidork".to_string(),
                args: vec!["--json".to_string()],
                output: OutputMode::Json,
            })
        );
        assert_eq!(config.initial_content.as_deref(), Some("<p>Loading</p>"));
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.print_width, 60);
        assert_eq!(config.debounce_ms, 0);
        assert_eq!(config.timestamp, TimestampSetting::Named(NamedTimestamp::Now));
        assert!(config.engine.is_none());
    }

    #[test]
    fn test_named_timestamps() {
        let config: Config = serde_json::from_str(r#"{ "timestamp": "none" }"#).unwrap();
        assert_eq!(TimestampPolicy::from(config.timestamp), TimestampPolicy::None);

        assert_eq!(
            "now".parse::<TimestampSetting>().unwrap(),
            TimestampSetting::Named(NamedTimestamp::Now)
        );
        assert_eq!("42".parse::<TimestampSetting>().unwrap(), TimestampSetting::Fixed(42));
        assert!("yesterday".parse::<TimestampSetting>().is_err());
    }

    #[test]
    fn test_engine_output_defaults_to_json() {
        let engine: EngineConfig = serde_json::from_str(r#"{ "command": "cat" }"#).unwrap();
        assert_eq!(engine.output, OutputMode::Json);
        assert!(engine.args.is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().print_width, 60);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "printWidth": 40 }"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().print_width, 40);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(Config::resolve(Some(&missing), dir.path()).is_err());
    }
}
