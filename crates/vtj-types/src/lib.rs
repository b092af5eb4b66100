//! Validated primitive types shared by the VTJ crates.
//!
//! - [`NonEmptyText`]: trimmed text guaranteed to contain at least one non-whitespace character.
//! - [`PersonalIdentityCode`]: a Finnish personal identity code (henkilötunnus) with a verified
//!   checksum and birth date.

mod identity_code;

pub use identity_code::{IdentityCodeError, PersonalIdentityCode};

/// Errors returned when building a [`NonEmptyText`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    #[error("Text cannot be empty")]
    Empty,

    /// A character XML 1.0 cannot carry.
    #[error("Text contains control character U+{0:04X}")]
    ControlCharacter(u32),
}

/// Trimmed, non-empty text that can be written as XML character data.
///
/// Used for credentials and search keys of VTJ requests, where an empty element would be
/// rejected by the service rather than treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trim `input` and check that something is left and that it is valid XML text.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
        {
            return Err(TextError::ControlCharacter(u32::from(c)));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the trimmed text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned trimmed string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NonEmptyText::new(raw).map_err(serde::de::Error::custom)
    }
}
