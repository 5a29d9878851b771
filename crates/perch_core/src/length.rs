//! Style lengths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A CSS-style length: a pixel amount or `auto`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    Px(f32),
    #[default]
    Auto,
}

impl Length {
    /// Pixel amount, `None` for `auto`
    pub fn px(self) -> Option<f32> {
        match self {
            Length::Px(v) => Some(v),
            Length::Auto => None,
        }
    }
}

impl From<f32> for Length {
    fn from(v: f32) -> Self {
        Length::Px(v)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for Length {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Length::Auto);
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
        match number.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(Length::Px(v)),
            _ => Err(Error::InvalidLength(s.to_string())),
        }
    }
}

/// Wire form: a bare number or a string
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = Error;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Number(v) if v.is_finite() => Ok(Length::Px(v)),
            LengthRepr::Number(_) => Err(Error::NonFinite("length")),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(length: Length) -> Self {
        LengthRepr::Text(length.to_string())
    }
}
