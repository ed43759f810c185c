//! Load pipeline configurations from JSON, YAML or TOML.
//!
//! Every format is first parsed into a `serde_json::Value` document and then
//! checked for shape, so all three report the same errors for the same
//! mistakes.

use crate::config::{PipelineConfig, ValidationSpec};
use crate::core::error::{ConfigError, ConfigResult};
use crate::core::param::{ParamValue, Parameters};
use crate::core::types::Value;
use log::{debug, info};
use serde_json::Value as Document;
use std::fmt;
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
        })
    }
}

/// Load a configuration file, detecting the format from its extension.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<PipelineConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text, format)?;

    info!(
        "Loaded {} validation specifications from {}",
        config.len(),
        path.display()
    );
    Ok(config)
}

/// Parse configuration text in the given format.
pub fn parse_config(text: &str, format: ConfigFormat) -> ConfigResult<PipelineConfig> {
    let parse_error = |message: String| ConfigError::Parse {
        format: format.to_string(),
        message,
    };

    let document: Document = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        ConfigFormat::Toml => toml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
    };

    from_document(&document)
}

fn malformed(reason: impl Into<String>) -> ConfigError {
    ConfigError::Malformed {
        reason: reason.into(),
    }
}

/// Check the document shape and convert it.
fn from_document(document: &Document) -> ConfigResult<PipelineConfig> {
    let top = document
        .as_object()
        .ok_or_else(|| malformed("top level of the configuration must be a mapping"))?;

    let entries = top
        .get("validations")
        .ok_or_else(|| malformed("configuration must contain a 'validations' list"))?
        .as_array()
        .ok_or_else(|| malformed("'validations' must be a list"))?;

    let validations = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<ConfigResult<Vec<_>>>()?;

    debug!("Parsed {} validation entries", validations.len());
    Ok(PipelineConfig::new(validations))
}

fn parse_entry(index: usize, entry: &Document) -> ConfigResult<ValidationSpec> {
    let entry = entry
        .as_object()
        .ok_or_else(|| malformed(format!("validation entry {} must be a mapping", index)))?;

    let text_field = |key: &str| -> ConfigResult<String> {
        match entry.get(key) {
            Some(Document::String(s)) => Ok(s.clone()),
            Some(_) => Err(malformed(format!(
                "validation entry {}: '{}' must be a string",
                index, key
            ))),
            None => Err(malformed(format!(
                "validation entry {} must contain 'column' and 'validator' keys",
                index
            ))),
        }
    };
    let column = text_field("column")?;
    let validator = text_field("validator")?;

    let mut params = Parameters::new();
    match entry.get("params") {
        None | Some(Document::Null) => {}
        Some(Document::Object(map)) => {
            for (name, raw) in map {
                let value = scalar(raw).ok_or_else(|| {
                    malformed(format!(
                        "validation entry {}: parameter '{}' must be a scalar",
                        index, name
                    ))
                })?;
                params.insert(name.clone(), ParamValue::Value(value));
            }
        }
        Some(_) => {
            return Err(malformed(format!(
                "validation entry {}: 'params' must be a mapping",
                index
            )))
        }
    }

    Ok(ValidationSpec::new(column, validator, params))
}

fn scalar(raw: &Document) -> Option<Value> {
    match raw {
        Document::Null => Some(Value::Null),
        Document::Bool(b) => Some(Value::Boolean(*b)),
        Document::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Float)),
        Document::String(s) => Some(Value::String(s.clone())),
        Document::Array(_) | Document::Object(_) => None,
    }
}
