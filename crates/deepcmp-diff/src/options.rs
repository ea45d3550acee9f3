use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// How difference locations are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PathFormat {
    /// `["key"][0]["name"]`
    #[default]
    Structured,
    /// `key.0.name`
    Dot,
}

impl FromStr for PathFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "structured" | "bracket" => Ok(PathFormat::Structured),
            "dot" => Ok(PathFormat::Dot),
            other => Err(ConfigError::UnknownPathFormat(other.to_owned())),
        }
    }
}

impl TryFrom<String> for PathFormat {
    type Error = ConfigError;

    fn try_from(s: String) -> ConfigResult<Self> {
        s.parse()
    }
}

impl fmt::Display for PathFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathFormat::Structured => "structured",
            PathFormat::Dot => "dot",
        })
    }
}

/// Settings for one comparison. Read-only for the duration of the call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareOptions {
    /// When `false`, pairs that are equal after coercion count as equal.
    pub strict: bool,
    /// When `false`, the result carries no difference records; `equal` is
    /// still computed from every divergence.
    pub verbose: bool,
    /// Rendering of difference locations.
    pub path_format: PathFormat,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strict: true,
            verbose: true,
            path_format: PathFormat::Structured,
        }
    }
}

impl CompareOptions {
    /// Default settings with coercing equality.
    pub fn loose() -> Self {
        Self {
            strict: false,
            ..Default::default()
        }
    }

    /// Default settings without difference records.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            ..Default::default()
        }
    }

    pub fn with_path_format(mut self, path_format: PathFormat) -> Self {
        self.path_format = path_format;
        self
    }

    /// Parse settings from a TOML document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, unknown fields, or an
    /// unrecognized path format.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse settings from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, unknown fields, or an
    /// unrecognized path format.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
