use serde::{Deserialize, Serialize};

pub const LANE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Left,
    Down,
    Up,
    Right,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::Left, Lane::Down, Lane::Up, Lane::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Arrow glyph used by text previews.
    pub fn arrow(self) -> char {
        match self {
            Lane::Left => '←',
            Lane::Down => '↓',
            Lane::Up => '↑',
            Lane::Right => '→',
        }
    }
}

/// How a note was produced by the generator. Judgment ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Single,
    Simultaneous,
    Double,
    Triple,
    Stream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Seconds from session start at which the note should be hit.
    pub time: f64,
    pub lane: Lane,
    pub kind: NoteKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    /// Track length the map was generated for.
    pub duration: f64,
    pub seed: Option<u64>,
    /// Generated from the fallback duration because the real one was unknown.
    #[serde(default)]
    pub placeholder: bool,
    pub notes: Vec<Note>,
}

impl Beatmap {
    pub fn empty(duration: f64) -> Self {
        Self {
            duration,
            seed: None,
            placeholder: false,
            notes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.notes.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// Time of the last scheduled note, if any.
    pub fn last_note_time(&self) -> Option<f64> {
        self.notes.last().map(|n| n.time)
    }
}
