//! Return codes (`Paluukoodi/@koodi`) reported by the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a registry query as reported in `Paluukoodi/@koodi`.
///
/// Known codes are matched by their exact wire value; anything else is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ReturnCode {
    /// `0000`: the query succeeded and a person record follows.
    Success,
    /// `0001`: the query succeeded but no person matched.
    NotFound,
    /// `-1500`: the service rejected the credentials.
    InvalidCredentials,
    Other(String),
}

impl ReturnCode {
    pub fn as_str(&self) -> &str {
        match self {
            ReturnCode::Success => "0000",
            ReturnCode::NotFound => "0001",
            ReturnCode::InvalidCredentials => "-1500",
            ReturnCode::Other(code) => code,
        }
    }

    pub fn from_wire(code: &str) -> Self {
        match code.trim() {
            "0000" => ReturnCode::Success,
            "0001" => ReturnCode::NotFound,
            "-1500" => ReturnCode::InvalidCredentials,
            other => ReturnCode::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReturnCode::Success)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ReturnCode {
    fn from(code: String) -> Self {
        ReturnCode::from_wire(&code)
    }
}

impl From<ReturnCode> for String {
    fn from(code: ReturnCode) -> Self {
        code.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_keep_their_wire_values() {
        for code in [
            ReturnCode::Success,
            ReturnCode::NotFound,
            ReturnCode::InvalidCredentials,
        ] {
            assert_eq!(ReturnCode::from_wire(code.as_str()), code);
        }
        assert_eq!(ReturnCode::from_wire("-1500"), ReturnCode::InvalidCredentials);
    }

    #[test]
    fn unknown_codes_are_kept_verbatim() {
        let code = ReturnCode::from_wire("0002");
        assert_eq!(code, ReturnCode::Other("0002".to_string()));
        assert_eq!(code.to_string(), "0002");
        assert!(!code.is_success());
    }

    #[test]
    fn serializes_as_wire_string() {
        let json = serde_json::to_string(&ReturnCode::NotFound).expect("serialize");
        assert_eq!(json, "\"0001\"");
        let back: ReturnCode = serde_json::from_str("\"0000\"").expect("deserialize");
        assert!(back.is_success());
    }
}
