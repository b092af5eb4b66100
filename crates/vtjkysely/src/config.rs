//! Codec runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the [`crate::Codec`].
//! This crate never reads environment variables itself; binaries read them and hand the raw
//! values to [`CodecConfig::from_values`].

use crate::schema::Strictness;
use crate::xml::RenderOptions;
use crate::{VtjError, VtjResult};

/// Codec configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    strictness: Strictness,
    indent: Option<usize>,
    declaration: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lax,
            indent: None,
            declaration: true,
        }
    }
}

impl CodecConfig {
    pub fn new(strictness: Strictness, indent: Option<usize>, declaration: bool) -> Self {
        Self {
            strictness,
            indent: indent.filter(|width| *width > 0),
            declaration,
        }
    }

    /// Build a configuration from raw `VTJ_STRICT` and `VTJ_XML_INDENT` values.
    ///
    /// Absent values keep the defaults (lax decoding, compact output).
    ///
    /// # Errors
    ///
    /// Returns [`VtjError::InvalidInput`] if a value cannot be interpreted.
    pub fn from_values(strict: Option<&str>, indent: Option<&str>) -> VtjResult<Self> {
        let strictness = match strict.map(|v| v.trim().to_ascii_lowercase()) {
            None => Strictness::Lax,
            Some(value) => match value.as_str() {
                "" | "0" | "false" | "no" | "off" | "lax" => Strictness::Lax,
                "1" | "true" | "yes" | "on" | "strict" => Strictness::Strict,
                _ => {
                    return Err(VtjError::InvalidInput(format!(
                        "VTJ_STRICT must be a boolean, got '{value}'"
                    )))
                }
            },
        };

        let indent = match indent.map(str::trim).filter(|v| !v.is_empty()) {
            None => None,
            Some(value) => Some(value.parse::<usize>().map_err(|_| {
                VtjError::InvalidInput(format!(
                    "VTJ_XML_INDENT must be a non-negative integer, got '{value}'"
                ))
            })?),
        };

        Ok(Self::new(strictness, indent, true))
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    pub fn declaration(&self) -> bool {
        self.declaration
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.indent,
            declaration: self.declaration,
        }
    }
}
