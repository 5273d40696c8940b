use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Display colour carried by a particle. The engine never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Cyan,
    Red,
    Yellow,
    Green,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Cyan, Color::Red, Color::Yellow, Color::Green];

    /// Linear RGB in [0, 1], for renderers that want a concrete value.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Color::Cyan => [0.0, 1.0, 1.0],
            Color::Red => [1.0, 0.0, 0.0],
            Color::Yellow => [1.0, 1.0, 0.0],
            Color::Green => [0.0, 1.0, 0.0],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidParam(format!("unknown color '{s}'")))
    }
}
