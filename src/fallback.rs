//! Placeholder descriptors for when no flag image can be resolved.

use crate::normalize::normalize_code;
use serde::{Deserialize, Serialize};

/// Code text shown when the input has no usable code
const UNKNOWN_CODE: &str = "??";
const PLACEHOLDER_LABEL: &str = "Flag unavailable";

/// Placeholder size bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl From<String> for IconSize {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl IconSize {
    /// Unrecognized values map to the default
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "small" => IconSize::Small,
            "large" => IconSize::Large,
            _ => IconSize::Medium,
        }
    }

    /// (width, height, font size) in pixels
    pub fn dimensions(&self) -> (u32, u32, u32) {
        match self {
            IconSize::Small => (24, 16, 8),
            IconSize::Medium => (48, 32, 12),
            IconSize::Large => (96, 64, 20),
        }
    }
}

/// Placeholder color theme bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl Theme {
    /// Unrecognized values map to the default
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#f3f4f6",
                foreground: "#374151",
                border: "#d1d5db",
            },
            Theme::Dark => Palette {
                background: "#374151",
                foreground: "#f3f4f6",
                border: "#4b5563",
            },
        }
    }
}

struct Palette {
    background: &'static str,
    foreground: &'static str,
    border: &'static str,
}

fn default_true() -> bool {
    true
}

/// Options for [`generate_fallback`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackOptions {
    #[serde(default)]
    pub size: IconSize,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub show_code: bool,
    #[serde(default = "default_true")]
    pub show_text: bool,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            size: IconSize::default(),
            theme: Theme::default(),
            show_code: true,
            show_text: true,
        }
    }
}

/// Presentation parameters for a flag placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackDescriptor {
    pub size: IconSize,
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub theme: Theme,
    pub background: String,
    pub foreground: String,
    pub border: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Builds the placeholder descriptor for a code
pub fn generate_fallback(code: &str, options: &FallbackOptions) -> FallbackDescriptor {
    let (width, height, font_size) = options.size.dimensions();
    let palette = options.theme.palette();

    let code_text = options
        .show_code
        .then(|| normalize_code(code).unwrap_or_else(|| UNKNOWN_CODE.to_string()));
    let label = options.show_text.then(|| PLACEHOLDER_LABEL.to_string());

    FallbackDescriptor {
        size: options.size,
        width,
        height,
        font_size,
        theme: options.theme,
        background: palette.background.to_string(),
        foreground: palette.foreground.to_string(),
        border: palette.border.to_string(),
        code_text,
        label,
    }
}
