use std::fmt;

use serde::{Deserialize, Serialize};

/// Accuracy bucket, tightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Perfect,
    Great,
    Good,
    Nice,
    Bad,
}

impl Tier {
    pub const ALL: [Tier; 5] = [Tier::Perfect, Tier::Great, Tier::Good, Tier::Nice, Tier::Bad];

    /// Upper-case name shown on the judgment readout.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Perfect => "PERFECT",
            Tier::Great => "GREAT",
            Tier::Good => "GOOD",
            Tier::Nice => "NICE",
            Tier::Bad => "BAD",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub nice: u32,
    pub bad: u32,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Perfect => self.perfect,
            Tier::Great => self.great,
            Tier::Good => self.good,
            Tier::Nice => self.nice,
            Tier::Bad => self.bad,
        }
    }

    pub fn increment(&mut self, tier: Tier) {
        match tier {
            Tier::Perfect => self.perfect += 1,
            Tier::Great => self.great += 1,
            Tier::Good => self.good += 1,
            Tier::Nice => self.nice += 1,
            Tier::Bad => self.bad += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.perfect + self.great + self.good + self.nice + self.bad
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    SSS,
    SS,
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Rank {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Rank::SSS
        } else if accuracy >= 90.0 {
            Rank::SS
        } else if accuracy >= 85.0 {
            Rank::S
        } else if accuracy >= 80.0 {
            Rank::A
        } else if accuracy >= 70.0 {
            Rank::B
        } else if accuracy >= 60.0 {
            Rank::C
        } else if accuracy >= 50.0 {
            Rank::D
        } else {
            Rank::F
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::SSS => "SSS",
            Rank::SS => "SS",
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
            Rank::F => "F",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    /// The track played to the end.
    Completed,
    /// Health reached zero.
    Depleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub outcome: SessionOutcome,
    pub score: u64,
    pub max_combo: u32,
    /// Weighted hits over every note in the beatmap, in percent.
    pub accuracy: f64,
    pub rank: Rank,
    pub counts: TierCounts,
    pub miss_count: u32,
    pub empty_poor_count: u32,
    pub total_notes: u32,
}
