//! Canonical directions and spoken-word polarity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four tumbling-E training targets.
///
/// The declaration order is the canonical order used when balancing a
/// grid; it carries no other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in canonical order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// English name, also used as the similarity-stage reference word
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Mandarin name as spoken by the user
    pub fn chinese(&self) -> &'static str {
        match self {
            Direction::Up => "上",
            Direction::Down => "下",
            Direction::Left => "左",
            Direction::Right => "右",
        }
    }

    /// Horizontal mirror: LEFT and RIGHT swap, UP and DOWN stay
    pub fn mirrored(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            other => other,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Accepts full names and single-letter shortcuts (u/d/l/r)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            other => Err(format!("unknown direction: '{}'", other)),
        }
    }
}

/// How a spoken direction word maps onto the glyph's canonical direction.
///
/// `Literal`: saying "left" means the E points/opens toward the left.
/// `Mirrored`: saying "left" means the opposite horizontal target.
/// UP and DOWN are never affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Literal,
    Mirrored,
}

/// The product convention for spoken words. Change here, nowhere else.
pub const DEFAULT_POLARITY: Polarity = Polarity::Literal;

impl Default for Polarity {
    fn default() -> Self {
        DEFAULT_POLARITY
    }
}

impl Polarity {
    /// Convert a direction named by the speaker into the canonical target
    pub fn apply(self, spoken: Direction) -> Direction {
        match self {
            Polarity::Literal => spoken,
            Polarity::Mirrored => spoken.mirrored(),
        }
    }
}
