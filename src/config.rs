//! Deployment-level plugin configuration with TOML support.
//!
//! Each third-party plugin gets a section naming where its installed
//! assets live. All sub-structs use `#[serde(default)]` so partial TOML
//! files (e.g. only configuring `[marvin]`) work correctly. Values are
//! opaque strings and flags; they are read once per widget construction
//! and not validated beyond presence.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ChembedError;

/// Top-level deployment configuration container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ChembedConfig {
    /// OpenChemLib JS settings.
    pub open_chem_lib: OpenChemLibSettings,
    /// MolPaint JS settings.
    pub mol_paint: MolPaintSettings,
    /// Marvin JS settings.
    pub marvin: MarvinSettings,
    /// Open Vector Editor settings.
    pub vector_editor: VectorEditorSettings,
}

/// Where the OpenChemLib JS bundle is served from.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct OpenChemLibSettings {
    /// External URL of `openchemlib-full.js`. When unset, the bundled
    /// copy from the embedded catalog is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

/// Where the MolPaint JS bundle is served from.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct MolPaintSettings {
    /// External URL of `molpaint.js`. When unset, the bundled copy from
    /// the embedded catalog is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

/// Marvin JS installation parameters. Marvin is never bundled; it always
/// loads from a deployment-provided install path.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct MarvinSettings {
    /// Base URL of the Marvin JS installation (no trailing slash).
    pub base_url: String,
    /// URL of the license file handed to the editor.
    pub license_url: String,
    /// Use the web-service-backed editor variant (`editorws.html` and
    /// `webservices.js`).
    pub web_services: bool,
}

/// Where the Open Vector Editor bundle is served from.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(default)]
pub struct VectorEditorSettings {
    /// External base URL containing `open-vector-editor.min.js` and
    /// `main.css`. When unset, bundled copies are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ChembedConfig {
    /// Load configuration from a TOML file. Missing sections and fields
    /// use defaults.
    pub fn load(path: &Path) -> Result<Self, ChembedError> {
        let content = std::fs::read_to_string(path).map_err(ChembedError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ChembedError> {
        toml::from_str(content)
            .map_err(|e| ChembedError::ConfigParse(e.to_string()))
    }

    /// Generate the JSON Schema describing the configuration surface.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Self)
    }
}
