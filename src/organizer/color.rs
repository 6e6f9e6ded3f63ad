//! Display colors of organizers

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

/// The color palette the server knows about. Colors travel as their number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Color {
    None = 0,
    Blue = 1,
    Cyan = 2,
    Green = 3,
    Purple = 4,
    Red = 5,
    Yellow = 6,
    Pink = 7,
    Gray = 8,
    Orange = 9,
}

impl Default for Color {
    fn default() -> Self {
        Color::Orange
    }
}

impl Color {
    /// The CSS color a UI should paint this organizer with
    pub fn css(&self) -> Option<csscolorparser::Color> {
        let hex = match self {
            Color::None => "#ffffff",
            Color::Blue => "#5b9bf2",
            Color::Cyan => "#43eded",
            Color::Green => "#6acb9e",
            Color::Purple => "#ba86e5",
            Color::Red => "#f66666",
            Color::Yellow => "#f8fa33",
            Color::Pink => "#fe98d3",
            Color::Gray => "#bfbfbf",
            Color::Orange => "#fdbc55",
        };
        csscolorparser::parse(hex).ok()
    }
}

impl TryFrom<u8> for Color {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Color::None),
            1 => Ok(Color::Blue),
            2 => Ok(Color::Cyan),
            3 => Ok(Color::Green),
            4 => Ok(Color::Purple),
            5 => Ok(Color::Red),
            6 => Ok(Color::Yellow),
            7 => Ok(Color::Pink),
            8 => Ok(Color::Gray),
            9 => Ok(Color::Orange),
            other => Err(format!("Unknown color number {}", other)),
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color as u8
    }
}
