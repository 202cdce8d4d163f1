use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn profile(self) -> DifficultyProfile {
        DifficultyProfile::for_difficulty(self)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}` (expected easy, normal or hard)")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(DifficultyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Lane traversal rate. Scales the position-domain judgment distance.
    pub fall_speed: f64,
    /// Probability in [0, 1] that a beat slot produces notes.
    pub note_frequency: f64,
    /// Step density and pattern selection.
    pub complexity: f64,
    pub level: u8,
    pub label: String,
    pub color: String,
}

impl DifficultyProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                fall_speed: 2.5,
                note_frequency: 0.25,
                complexity: 0.8,
                level: 1,
                label: "Easy".to_string(),
                color: "#4CAF50".to_string(),
            },
            Difficulty::Normal => Self {
                fall_speed: 3.5,
                note_frequency: 0.4,
                complexity: 1.3,
                level: 2,
                label: "Normal".to_string(),
                color: "#FF9800".to_string(),
            },
            Difficulty::Hard => Self {
                fall_speed: 5.0,
                note_frequency: 0.6,
                complexity: 2.2,
                level: 3,
                label: "Hard".to_string(),
                color: "#F44336".to_string(),
            },
        }
    }
}
