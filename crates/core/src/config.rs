use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DecoderConfig {
    /// Bech32 address stamped onto every decoded output.
    pub address: Option<String>,

    /// Hex-encoded script attached to every decoded output.
    pub reference_script: Option<String>,

    /// Decode lines on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Serialize, Deserialize, Default, PartialEq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            x => Err(format!("unknown output format {x:?}, expected json or table")),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Json => "json",
                Self::Table => "table",
            }
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub pretty: bool,
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LoggingConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub max_level: tracing::Level,

    #[serde(default)]
    pub include_pallas: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_level: tracing::Level::INFO,
            include_pallas: Default::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub decoder: DecoderConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_both_ways() {
        for format in [OutputFormat::Json, OutputFormat::Table] {
            assert_eq!(format.to_string().parse::<OutputFormat>(), Ok(format));
        }

        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn logging_level_from_text() {
        let config: LoggingConfig =
            serde_json::from_value(serde_json::json!({ "max_level": "debug" })).unwrap();

        assert_eq!(config.max_level, tracing::Level::DEBUG);
        assert!(!config.include_pallas);
    }

    #[test]
    fn empty_root_config_uses_defaults() {
        let config: RootConfig = serde_json::from_value(serde_json::json!({})).unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.decoder.parallel);
        assert_eq!(config.logging.max_level, tracing::Level::INFO);
    }
}
