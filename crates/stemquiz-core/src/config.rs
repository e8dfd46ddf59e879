//! Quiz configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::segment::DEFAULT_MATH_DELIMITER;

/// Which result files a session writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Html,
    All,
}

impl OutputFormat {
    pub fn includes_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::All)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }

    pub fn includes_html(self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::All)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "all" => Ok(OutputFormat::All),
            other => Err(format!(
                "unknown output format '{other}' (expected csv, json, html or all)"
            )),
        }
    }
}

/// Top-level stemquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemquizConfig {
    /// Directory result files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name of the CSV export inside `output_dir`.
    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,
    /// Character that opens and closes inline math.
    #[serde(default = "default_math_delimiter")]
    pub math_delimiter: char,
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./stemquiz-results")
}
fn default_csv_filename() -> String {
    "quiz_results.csv".to_string()
}
fn default_math_delimiter() -> char {
    DEFAULT_MATH_DELIMITER
}
fn default_chart_width() -> u32 {
    400
}
fn default_chart_height() -> u32 {
    300
}

impl Default for StemquizConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            csv_filename: default_csv_filename(),
            math_delimiter: default_math_delimiter(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            default_format: OutputFormat::default(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `stemquiz.toml` in the current directory
/// 2. `~/.config/stemquiz/config.toml`
///
/// Environment variable overrides: `STEMQUIZ_OUTPUT_DIR`, `STEMQUIZ_FORMAT`.
pub fn load_config_from(path: Option<&Path>) -> Result<StemquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("stemquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => StemquizConfig::default(),
    };

    Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
}

/// Parse a TOML config document.
pub fn parse_config(content: &str) -> Result<StemquizConfig> {
    Ok(toml::from_str(content)?)
}

/// Apply `STEMQUIZ_*` overrides read through `lookup`.
pub fn apply_env_overrides(
    mut config: StemquizConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> StemquizConfig {
    if let Some(dir) = lookup("STEMQUIZ_OUTPUT_DIR").filter(|d| !d.is_empty()) {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(format) = lookup("STEMQUIZ_FORMAT") {
        match format.parse::<OutputFormat>() {
            Ok(format) => config.default_format = format,
            Err(e) => tracing::warn!("ignoring STEMQUIZ_FORMAT: {e}"),
        }
    }
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("stemquiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_config() {
        let config = StemquizConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./stemquiz-results"));
        assert_eq!(config.csv_filename, "quiz_results.csv");
        assert_eq!(config.math_delimiter, '$');
        assert_eq!((config.chart_width, config.chart_height), (400, 300));
        assert_eq!(config.default_format, OutputFormat::Csv);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
output_dir = "results"
math_delimiter = "%"
default_format = "all"
"#,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.math_delimiter, '%');
        assert_eq!(config.default_format, OutputFormat::All);
        assert_eq!(config.chart_width, 400);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(parse_config(r#"default_format = "pdf""#).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let config = apply_env_overrides(StemquizConfig::default(), |name| match name {
            "STEMQUIZ_OUTPUT_DIR" => Some("/tmp/out".into()),
            "STEMQUIZ_FORMAT" => Some("HTML".into()),
            _ => None,
        });
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.default_format, OutputFormat::Html);
    }

    #[test]
    fn invalid_env_format_is_ignored() {
        let config = apply_env_overrides(StemquizConfig::default(), |name| {
            (name == "STEMQUIZ_FORMAT").then(|| "pdf".to_string())
        });
        assert_eq!(config.default_format, OutputFormat::Csv);
        assert_eq!(apply_env_overrides(config.clone(), no_env), config);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stemquiz.toml");
        std::fs::write(&path, "chart_width = 640\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.chart_width, 640);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/stemquiz.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn format_selection() {
        assert!(OutputFormat::All.includes_csv());
        assert!(OutputFormat::All.includes_html());
        assert!(!OutputFormat::Json.includes_csv());
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(OutputFormat::Html.to_string(), "html");
    }
}
