//! Fixed color-group palette.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color value that is not one of the five palette entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// Neither a palette id (1-5) nor a palette name.
    #[error("unknown color '{0}' (expected 1-5 or a palette name)")]
    UnknownColor(String),
}

/// Palette entry id, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(u8);

impl ColorId {
    /// Lowest valid id.
    pub const MIN: u8 = 1;
    /// Highest valid id.
    pub const MAX: u8 = 5;

    /// Id for `value` if it is a palette entry.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Numeric id.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The palette swatch for this id.
    pub fn swatch(self) -> &'static Swatch {
        &PALETTE[(self.0 - Self::MIN) as usize]
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColorId {
    type Err = ColorError;

    /// Accepts the numeric id or the display name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(id) = trimmed.parse::<u8>().ok().and_then(ColorId::new) {
            return Ok(id);
        }
        PALETTE
            .iter()
            .find(|swatch| swatch.display_name.eq_ignore_ascii_case(trimmed))
            .map(|swatch| swatch.id)
            .ok_or_else(|| ColorError::UnknownColor(s.to_string()))
    }
}

// Persisted as strings ("2") so the stored maps read the same as the
// browser's storage entries.
impl Serialize for ColorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => ColorId::new(n).ok_or_else(|| {
                serde::de::Error::custom(ColorError::UnknownColor(n.to_string()))
            }),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// Palette id.
    pub id: ColorId,
    /// Name shown in the color menu.
    pub display_name: &'static str,
    /// `#rrggbb` color value.
    pub color_value: &'static str,
}

/// The five color groups.
pub const PALETTE: [Swatch; 5] = [
    Swatch {
        id: ColorId(1),
        display_name: "Red",
        color_value: "#EE4B2B",
    },
    Swatch {
        id: ColorId(2),
        display_name: "Green",
        color_value: "#cca300",
    },
    Swatch {
        id: ColorId(3),
        display_name: "Blue",
        color_value: "#f2ccff",
    },
    Swatch {
        id: ColorId(4),
        display_name: "Yellow",
        color_value: "#FFFF00",
    },
    Swatch {
        id: ColorId(5),
        display_name: "Purple",
        color_value: "#ff33cc",
    },
];
