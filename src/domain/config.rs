use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentType;

/// Flags controlling how strictly input is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Accept relationships the document type does not allow (logged as
    /// warnings).
    pub ignore_relationship_constraints: bool,

    /// Downgrade malformed or missing content item attributes to warnings and
    /// keep a best-effort node.
    pub ignore_content_item_errors: bool,

    /// Drop content items that cannot be read instead of keeping them.
    ///
    /// Only has an effect together with `ignore_content_item_errors`.
    pub skip_invalid_content_items: bool,
}

impl ReadOptions {
    /// Options accepting everything that can be read somehow.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            ignore_relationship_constraints: true,
            ignore_content_item_errors: true,
            skip_invalid_content_items: false,
        }
    }

    /// Whether any error downgrade is enabled.
    #[must_use]
    pub const fn is_lenient(&self) -> bool {
        self.ignore_relationship_constraints || self.ignore_content_item_errors
    }
}

/// Flags controlling the XML form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// Write the `<template>` element around the content item it identifies
    /// instead of inside it. Also selects how template elements are read.
    pub template_element_encloses_items: bool,

    /// Write elements for empty values.
    pub write_empty_values: bool,
}

/// Flags controlling the HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Render annotation texts as HTML comments.
    pub render_annotations: bool,

    /// Show code values next to code meanings.
    pub render_code_values: bool,

    /// URL of a CSS stylesheet to link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
}

/// Configuration for the `srdoc` tool.
///
/// This struct holds the defaults applied when documents are created, read,
/// converted and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Document type used when a new document is created.
    pub document_type: DocumentType,

    /// Whether value setters validate their input.
    pub check_values: bool,

    /// Read flags.
    pub read: ReadOptions,

    /// XML flags.
    pub xml: XmlOptions,

    /// Rendering flags.
    pub render: RenderOptions,
}

impl Config {
    /// Reads `srdoc.toml` style settings from `path`.
    ///
    /// # Errors
    ///
    /// Fails with a message if the file is unreadable or not a valid
    /// configuration, e.g. names an unknown document type.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Writes the settings to `path` in the current layout.
    ///
    /// # Errors
    ///
    /// Fails with a message if serializing or writing fails.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

/// On-disk layouts of `srdoc.toml`, selected by the `_version` key. Older
/// layouts keep loading after [`Config`] gains fields.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        document_type: DocumentType,

        #[serde(default)]
        check_values: bool,

        #[serde(default)]
        read: ReadOptions,

        #[serde(default)]
        xml: XmlOptions,

        #[serde(default)]
        render: RenderOptions,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                document_type,
                check_values,
                read,
                xml,
                render,
            } => Self {
                document_type,
                check_values,
                read,
                xml,
                render,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            document_type: config.document_type,
            check_values: config.check_values,
            read: config.read,
            xml: config.xml,
            render: config.render,
        }
    }
}
