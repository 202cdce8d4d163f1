use beat_data::{Rank, Tier, TierCounts};
use log::warn;

use crate::config::{ScoreConfig, TierTable};

/// What the score engine is asked to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Hit(Tier),
    /// Expired note, or a press that had to count as one.
    Miss,
    /// Press with nothing to judge; costs health but keeps the combo.
    EmptyPoor,
}

impl Judgment {
    pub fn breaks_combo(self) -> bool {
        matches!(self, Judgment::Miss)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub score: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub hit_notes: u32,
    pub counts: TierCounts,
    pub miss_count: u32,
    pub empty_poor_count: u32,
    pub health: f64,
    pub max_health: f64,
    /// Sum of tier weights over all hits.
    pub weighted_hits: f64,
}

impl SessionStats {
    pub fn new(max_health: f64) -> Self {
        Self {
            score: 0.0,
            combo: 0,
            max_combo: 0,
            hit_notes: 0,
            counts: TierCounts::default(),
            miss_count: 0,
            empty_poor_count: 0,
            health: max_health,
            max_health,
            weighted_hits: 0.0,
        }
    }

    /// Notes judged so far, hits and misses alike.
    pub fn judged(&self) -> u32 {
        self.hit_notes + self.miss_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDelta {
    pub points: f64,
    /// Health change after clamping.
    pub health: f64,
    /// Health reached zero on this update.
    pub depleted: bool,
}

pub struct ScoreEngine {
    config: ScoreConfig,
    tiers: TierTable,
    stats: SessionStats,
}

impl ScoreEngine {
    pub fn new(config: ScoreConfig, tiers: TierTable) -> Self {
        let stats = SessionStats::new(config.max_health);
        Self { config, tiers, stats }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn apply(&mut self, judgment: Judgment) -> ScoreDelta {
        let was_alive = self.stats.health > 0.0;
        let (points, health_change) = match judgment {
            Judgment::Hit(tier) => self.record_hit(tier),
            Judgment::Miss => {
                self.stats.miss_count += 1;
                self.stats.combo = 0;
                (0.0, -self.config.miss_penalty)
            }
            Judgment::EmptyPoor => {
                self.stats.empty_poor_count += 1;
                (0.0, -self.config.empty_poor_penalty)
            }
        };

        let before = self.stats.health;
        self.stats.health = (before + health_change).clamp(0.0, self.stats.max_health);

        ScoreDelta {
            points,
            health: self.stats.health - before,
            depleted: was_alive && self.stats.health <= 0.0,
        }
    }

    fn record_hit(&mut self, tier: Tier) -> (f64, f64) {
        let stats = &mut self.stats;
        stats.hit_notes += 1;
        stats.counts.increment(tier);
        stats.combo += 1;
        stats.max_combo = stats.max_combo.max(stats.combo);

        let Some(spec) = self.tiers.spec(tier) else {
            warn!("{tier:?} is not in the tier table; scoring it as zero");
            return (0.0, 0.0);
        };
        let points = spec.points * self.config.combo_multiplier.at(stats.combo);
        stats.score += points;
        stats.weighted_hits += spec.weight;
        (points, spec.health)
    }

    pub fn is_depleted(&self) -> bool {
        self.stats.health <= 0.0
    }

    /// Weighted hits over notes judged so far; 100 before anything is judged.
    pub fn live_accuracy(&self) -> f64 {
        let judged = self.stats.judged();
        if judged == 0 {
            return 100.0;
        }
        (self.stats.weighted_hits / judged as f64 * 100.0).min(100.0)
    }

    /// Weighted hits over every note in the beatmap; 0 for an empty beatmap.
    pub fn final_accuracy(&self, total_notes: u32) -> f64 {
        if total_notes == 0 {
            return 0.0;
        }
        (self.stats.weighted_hits / total_notes as f64 * 100.0).min(100.0)
    }

    pub fn rank(&self, total_notes: u32) -> Rank {
        Rank::from_accuracy(self.final_accuracy(total_notes))
    }

    pub fn reset(&mut self) {
        self.stats = SessionStats::new(self.config.max_health);
    }
}
