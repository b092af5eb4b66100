//! Finnish personal identity code (henkilötunnus).
//!
//! Format: `DDMMYYCZZZQ` where `C` is the century sign, `ZZZ` the individual number and `Q`
//! the control character computed from `DDMMYYZZZ` modulo 31.

use chrono::NaiveDate;
use std::fmt;

const CONTROL_CHARACTERS: &[u8; 31] = b"0123456789ABCDEFHJKLMNPRSTUVWXY";

/// Errors returned when parsing a [`PersonalIdentityCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityCodeError {
    #[error("identity code must be 11 characters, got {0}")]
    InvalidLength(usize),

    #[error("identity code contains a non-digit where digits are expected")]
    NotNumeric,

    #[error("unknown century sign '{0}'")]
    InvalidCenturySign(char),

    #[error("identity code does not encode a valid birth date")]
    InvalidBirthDate,

    #[error("individual number {0:03} is outside the allowed range")]
    InvalidIndividualNumber(u32),

    #[error("control character mismatch: expected '{expected}', got '{found}'")]
    ChecksumMismatch { expected: char, found: char },
}

/// A validated Finnish personal identity code.
///
/// The value is stored in its canonical upper-case form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonalIdentityCode {
    value: String,
    birth_date: NaiveDate,
    individual_number: u32,
}

impl PersonalIdentityCode {
    /// Parse and validate an identity code.
    ///
    /// Accepts every century sign in use: `+` (1800s), `-`/`Y`/`X`/`W`/`V`/`U` (1900s) and
    /// `A`..`F` (2000s). Individual numbers 002–999 are accepted, which includes the
    /// temporary identifiers (900–999).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityCodeError`] if the length, digits, century sign, birth date,
    /// individual number or control character is invalid.
    pub fn parse(input: &str) -> Result<Self, IdentityCodeError> {
        let value = input.trim().to_ascii_uppercase();
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != 11 {
            return Err(IdentityCodeError::InvalidLength(chars.len()));
        }

        let date_digits: String = chars[0..6].iter().collect();
        let individual_digits: String = chars[7..10].iter().collect();
        if !date_digits.chars().chain(individual_digits.chars()).all(|c| c.is_ascii_digit()) {
            return Err(IdentityCodeError::NotNumeric);
        }

        let century = match chars[6] {
            '+' => 1800,
            '-' | 'Y' | 'X' | 'W' | 'V' | 'U' => 1900,
            'A' | 'B' | 'C' | 'D' | 'E' | 'F' => 2000,
            other => return Err(IdentityCodeError::InvalidCenturySign(other)),
        };

        let day: u32 = parse_digits(&date_digits[0..2])?;
        let month: u32 = parse_digits(&date_digits[2..4])?;
        let year: i32 = parse_digits::<i32>(&date_digits[4..6])? + century;
        let birth_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(IdentityCodeError::InvalidBirthDate)?;

        let individual_number: u32 = parse_digits(&individual_digits)?;
        if individual_number < 2 {
            return Err(IdentityCodeError::InvalidIndividualNumber(individual_number));
        }

        let checked: u64 = parse_digits(&format!("{date_digits}{individual_digits}"))?;
        let expected = char::from(CONTROL_CHARACTERS[(checked % 31) as usize]);
        let found = chars[10];
        if expected != found {
            return Err(IdentityCodeError::ChecksumMismatch { expected, found });
        }

        Ok(Self {
            value,
            birth_date,
            individual_number,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Temporary identifiers use individual numbers 900–999.
    pub fn is_temporary(&self) -> bool {
        self.individual_number >= 900
    }

    /// Odd individual numbers are assigned to men, even ones to women.
    pub fn is_odd_individual_number(&self) -> bool {
        self.individual_number % 2 == 1
    }
}

fn parse_digits<T: std::str::FromStr>(digits: &str) -> Result<T, IdentityCodeError> {
    digits.parse().map_err(|_| IdentityCodeError::NotNumeric)
}

impl fmt::Display for PersonalIdentityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for PersonalIdentityCode {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl std::str::FromStr for PersonalIdentityCode {
    type Err = IdentityCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for PersonalIdentityCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> serde::Deserialize<'de> for PersonalIdentityCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PersonalIdentityCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twentieth_century_code() {
        let code = PersonalIdentityCode::parse("131052-308T").expect("valid code");
        assert_eq!(code.as_str(), "131052-308T");
        assert_eq!(
            code.birth_date(),
            NaiveDate::from_ymd_opt(1952, 10, 13).expect("date")
        );
        assert!(!code.is_odd_individual_number());
        assert!(!code.is_temporary());
    }

    #[test]
    fn parses_new_century_signs_and_normalises_case() {
        let code = PersonalIdentityCode::parse(" 010101a123n ").expect("valid code");
        assert_eq!(code.as_str(), "010101A123N");
        assert_eq!(code.birth_date(), NaiveDate::from_ymd_opt(2001, 1, 1).expect("date"));
        assert!(code.is_odd_individual_number());

        let temporary = PersonalIdentityCode::parse("010594Y9021").expect("valid code");
        assert_eq!(
            temporary.birth_date(),
            NaiveDate::from_ymd_opt(1994, 5, 1).expect("date")
        );
        assert!(temporary.is_temporary());
    }

    #[test]
    fn accepts_leap_day() {
        let code = PersonalIdentityCode::parse("290200A002C").expect("leap day");
        assert_eq!(code.birth_date(), NaiveDate::from_ymd_opt(2000, 2, 29).expect("date"));
    }

    #[test]
    fn rejects_wrong_control_character() {
        let err = PersonalIdentityCode::parse("131052-308A").expect_err("bad checksum");
        assert_eq!(
            err,
            IdentityCodeError::ChecksumMismatch {
                expected: 'T',
                found: 'A'
            }
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            PersonalIdentityCode::parse("131052-308"),
            Err(IdentityCodeError::InvalidLength(10))
        );
        assert_eq!(
            PersonalIdentityCode::parse("131052G308T"),
            Err(IdentityCodeError::InvalidCenturySign('G'))
        );
        assert_eq!(
            PersonalIdentityCode::parse("1310x2-308T"),
            Err(IdentityCodeError::NotNumeric)
        );
        assert_eq!(
            PersonalIdentityCode::parse("310252-308T"),
            Err(IdentityCodeError::InvalidBirthDate)
        );
        assert_eq!(
            PersonalIdentityCode::parse("131052-001T"),
            Err(IdentityCodeError::InvalidIndividualNumber(1))
        );
    }

    #[test]
    fn parses_through_from_str() {
        let code: PersonalIdentityCode = "131052-308T".parse().expect("valid code");
        assert_eq!(code.to_string(), "131052-308T");
    }
}
