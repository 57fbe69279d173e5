//! Type directory configuration via TOML
//!
//! Controls the naming convention used to derive target types from kind
//! names and the tag field read when ingesting untyped JSON. Defaults match
//! the conventional `ArrayOf<Type>` naming scheme, so most callers never
//! need a config file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default convention marker
pub const DEFAULT_MARKER: &str = "ArrayOf";

/// Default JSON field naming the concrete type of an ingested object
pub const DEFAULT_TYPE_TAG_FIELD: &str = "$type";

/// How the marker is removed from a kind's simple name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripMode {
    /// Remove exactly the leading marker: `ArrayOfArrayOfX` -> `ArrayOfX`
    #[default]
    Prefix,
    /// Remove every occurrence of the marker: `ArrayOfArrayOfX` -> `X`
    Blanket,
}

impl StripMode {
    /// Derive the candidate type name from a simple name that starts with `marker`
    pub fn strip<'a>(&self, simple: &'a str, marker: &str) -> std::borrow::Cow<'a, str> {
        match self {
            StripMode::Prefix => {
                std::borrow::Cow::Borrowed(simple.strip_prefix(marker).unwrap_or(simple))
            }
            StripMode::Blanket => std::borrow::Cow::Owned(simple.replace(marker, "")),
        }
    }
}

/// Configuration for a [`TypeDirectory`](crate::TypeDirectory)
///
/// # Example
///
/// ```toml
/// marker = "ArrayOf"
/// strip_mode = "prefix"
/// type_tag_field = "$type"
/// cache_resolutions = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedArrayConfig {
    /// Prefix every name-derived kind starts with
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Marker removal rule
    #[serde(default)]
    pub strip_mode: StripMode,
    /// JSON object field holding the concrete type name
    #[serde(default = "default_type_tag_field")]
    pub type_tag_field: String,
    /// Memoize resolution per kind
    #[serde(default = "default_cache_resolutions")]
    pub cache_resolutions: bool,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_type_tag_field() -> String {
    DEFAULT_TYPE_TAG_FIELD.to_string()
}

fn default_cache_resolutions() -> bool {
    true
}

impl Default for TypedArrayConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            strip_mode: StripMode::default(),
            type_tag_field: default_type_tag_field(),
            cache_resolutions: default_cache_resolutions(),
        }
    }
}

impl TypedArrayConfig {
    /// Default config with a different marker
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    /// Check field values
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the marker or tag field is empty, or the
    /// marker contains a path separator or generic bracket.
    pub fn validate(&self) -> Result<()> {
        if self.marker.is_empty() {
            return Err(Error::Config("marker cannot be empty".to_string()));
        }
        if self.marker.contains("::") || self.marker.contains('<') || self.marker.contains('>') {
            return Err(Error::Config(format!(
                "marker '{}' cannot contain '::', '<' or '>'",
                self.marker
            )));
        }
        if self.type_tag_field.is_empty() {
            return Err(Error::Config("type_tag_field cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Typed array configuration
#
# Kind names start with this marker; the rest of the name is the target type.
marker = "ArrayOf"

# "prefix" (default) strips only the leading marker.
# "blanket" strips every occurrence of the marker in the kind name.
strip_mode = "prefix"

# Field of an ingested JSON object naming its concrete type.
type_tag_field = "$type"

# Resolve each kind once and reuse the result.
cache_resolutions = true
"#
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TypedArrayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })?;
        info!(
            path = %path.display(),
            marker = %config.marker,
            strip_mode = ?config.strip_mode,
            "Loaded typed array config"
        );
        Ok(config)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
