//! Postal code input.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing a CEP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CepError {
    #[error("CEP is empty")]
    Empty,

    #[error("CEP '{0}' must have exactly 8 digits")]
    Length(String),

    #[error("CEP '{0}' contains invalid characters")]
    InvalidChar(String),
}

/// Eight-digit Brazilian postal code, stored without the hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cep {
    type Err = CepError;

    /// Accepts `NNNNNNNN` or `NNNNN-NNN`, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(CepError::Empty);
        }

        let digits: String = match raw.split_once('-') {
            Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
            Some(_) => return Err(CepError::InvalidChar(raw.to_string())),
            None => raw.to_string(),
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CepError::InvalidChar(raw.to_string()));
        }
        if digits.len() != 8 {
            return Err(CepError::Length(raw.to_string()));
        }
        Ok(Self(digits))
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_hyphenated() {
        assert_eq!("79021210".parse::<Cep>().unwrap().as_str(), "79021210");
        assert_eq!(" 79021-210 ".parse::<Cep>().unwrap().as_str(), "79021210");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<Cep>(), Err(CepError::Empty));
        assert_eq!("7902121".parse::<Cep>(), Err(CepError::Length("7902121".into())));
        assert_eq!("7902-1210".parse::<Cep>(), Err(CepError::InvalidChar("7902-1210".into())));
        assert_eq!("79O21210".parse::<Cep>(), Err(CepError::InvalidChar("79O21210".into())));
    }
}
