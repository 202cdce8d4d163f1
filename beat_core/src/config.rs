use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use beat_data::Tier;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Widest time-domain window accepted, in seconds.
pub const MAX_TIME_WINDOW: f64 = 1.0;

/// Unit in which judgment distances, tier thresholds and tolerances are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeDomain {
    /// Seconds between the press and the scheduled time.
    Time,
    /// Lane distance units: seconds scaled by fall speed and `position_scale`.
    #[default]
    Position,
}

/// What a keypress with nothing to judge does to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Counts as a miss: breaks combo and costs `miss_penalty`.
    #[default]
    ForcedMiss,
    /// Costs `empty_poor_penalty` but keeps the combo.
    EmptyPoor,
    /// Silently dropped.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    pub tier: Tier,
    /// Inclusive upper bound on the absolute distance.
    pub threshold: f64,
    pub points: f64,
    pub health: f64,
    /// Contribution to accuracy, 1.0 for a flawless hit.
    pub weight: f64,
}

impl TierSpec {
    pub fn new(tier: Tier, threshold: f64, points: f64, health: f64, weight: f64) -> Self {
        Self {
            tier,
            threshold,
            points,
            health,
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable(Vec<TierSpec>);

impl TierTable {
    pub fn new(specs: Vec<TierSpec>) -> Result<Self, ConfigError> {
        let table = Self(specs);
        table.validate()?;
        Ok(table)
    }

    /// perfect <= 15, good <= 30, nice <= 50 distance units.
    pub fn distance() -> Self {
        Self(vec![
            TierSpec::new(Tier::Perfect, 15.0, 1000.0, 2.0, 1.0),
            TierSpec::new(Tier::Good, 30.0, 600.0, 1.0, 0.8),
            TierSpec::new(Tier::Nice, 50.0, 300.0, 0.0, 0.5),
        ])
    }

    /// Five tiers measured in seconds.
    pub fn time() -> Self {
        Self(vec![
            TierSpec::new(Tier::Perfect, 0.03, 1000.0, 2.0, 1.0),
            TierSpec::new(Tier::Great, 0.06, 800.0, 1.0, 0.9),
            TierSpec::new(Tier::Good, 0.09, 600.0, 1.0, 0.8),
            TierSpec::new(Tier::Nice, 0.12, 300.0, 0.0, 0.5),
            TierSpec::new(Tier::Bad, 0.18, 100.0, 0.0, 0.2),
        ])
    }

    /// First tier whose threshold the distance satisfies, scanning tightest first.
    pub fn classify(&self, distance: f64) -> Option<Tier> {
        let distance = distance.abs();
        self.0
            .iter()
            .find(|spec| distance <= spec.threshold)
            .map(|spec| spec.tier)
    }

    pub fn spec(&self, tier: Tier) -> Option<&TierSpec> {
        self.0.iter().find(|spec| spec.tier == tier)
    }

    pub fn widest(&self) -> f64 {
        self.0.last().map_or(0.0, |spec| spec.threshold)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierSpec> {
        self.0.iter()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::new("judge.tiers", "at least one tier is required"));
        }
        let mut previous = 0.0;
        for (i, spec) in self.0.iter().enumerate() {
            if !(spec.threshold > 0.0) || !spec.threshold.is_finite() {
                return Err(ConfigError::new(
                    "judge.tiers",
                    format!("{:?} threshold must be a positive number", spec.tier),
                ));
            }
            if spec.threshold <= previous {
                return Err(ConfigError::new(
                    "judge.tiers",
                    format!("thresholds must strictly increase ({:?} at position {i})", spec.tier),
                ));
            }
            if spec.points < 0.0 || !(0.0..=1.0).contains(&spec.weight) {
                return Err(ConfigError::new(
                    "judge.tiers",
                    format!("{:?} needs non-negative points and a weight in [0, 1]", spec.tier),
                ));
            }
            if self.0[..i].iter().any(|other| other.tier == spec.tier) {
                return Err(ConfigError::new(
                    "judge.tiers",
                    format!("{:?} appears more than once", spec.tier),
                ));
            }
            previous = spec.threshold;
        }
        Ok(())
    }
}

/// Fields left out of the JSON come from the preset of the chosen domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JudgeConfigFields")]
pub struct JudgeConfig {
    pub domain: JudgeDomain,
    pub tiers: TierTable,
    /// Notes farther than this from the zone cannot be judged at all.
    pub proximity_window: f64,
    /// How far past the zone an active note may travel before it expires.
    pub expiry_tolerance: f64,
    pub no_match_policy: NoMatchPolicy,
    /// Resolve the nearest candidate as a miss when it lies outside every tier.
    pub consume_on_no_match: bool,
}

impl JudgeConfig {
    pub fn distance() -> Self {
        Self {
            domain: JudgeDomain::Position,
            tiers: TierTable::distance(),
            proximity_window: 150.0,
            expiry_tolerance: 100.0,
            no_match_policy: NoMatchPolicy::ForcedMiss,
            consume_on_no_match: true,
        }
    }

    pub fn time() -> Self {
        Self {
            domain: JudgeDomain::Time,
            tiers: TierTable::time(),
            proximity_window: 0.25,
            expiry_tolerance: 0.18,
            no_match_policy: NoMatchPolicy::ForcedMiss,
            consume_on_no_match: true,
        }
    }

    pub fn for_domain(domain: JudgeDomain) -> Self {
        match domain {
            JudgeDomain::Position => Self::distance(),
            JudgeDomain::Time => Self::time(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tiers.validate()?;
        if self.domain == JudgeDomain::Time {
            let limit = format!("time-domain windows are seconds, at most {MAX_TIME_WINDOW}");
            if self.proximity_window > MAX_TIME_WINDOW {
                return Err(ConfigError::new("judge.proximity_window", limit));
            }
            if self.expiry_tolerance > MAX_TIME_WINDOW {
                return Err(ConfigError::new("judge.expiry_tolerance", limit));
            }
        }
        if self.proximity_window < self.tiers.widest() {
            return Err(ConfigError::new(
                "judge.proximity_window",
                "must be at least as wide as the loosest tier",
            ));
        }
        if !(self.expiry_tolerance >= 0.0) {
            return Err(ConfigError::new("judge.expiry_tolerance", "must be >= 0"));
        }
        Ok(())
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self::distance()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JudgeConfigFields {
    domain: JudgeDomain,
    tiers: Option<TierTable>,
    proximity_window: Option<f64>,
    expiry_tolerance: Option<f64>,
    no_match_policy: Option<NoMatchPolicy>,
    consume_on_no_match: Option<bool>,
}

impl From<JudgeConfigFields> for JudgeConfig {
    fn from(fields: JudgeConfigFields) -> Self {
        let preset = JudgeConfig::for_domain(fields.domain);
        Self {
            domain: fields.domain,
            tiers: fields.tiers.unwrap_or(preset.tiers),
            proximity_window: fields.proximity_window.unwrap_or(preset.proximity_window),
            expiry_tolerance: fields.expiry_tolerance.unwrap_or(preset.expiry_tolerance),
            no_match_policy: fields.no_match_policy.unwrap_or(preset.no_match_policy),
            consume_on_no_match: fields.consume_on_no_match.unwrap_or(preset.consume_on_no_match),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboStep {
    pub min_combo: u32,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComboMultiplier {
    /// Highest step whose `min_combo` the combo has reached; 1.0 below the first.
    Steps { steps: Vec<ComboStep> },
    /// `1 + combo * per_combo`.
    Linear { per_combo: f64 },
}

impl ComboMultiplier {
    pub fn at(&self, combo: u32) -> f64 {
        match self {
            ComboMultiplier::Steps { steps } => steps
                .iter()
                .take_while(|step| combo >= step.min_combo)
                .last()
                .map_or(1.0, |step| step.multiplier),
            ComboMultiplier::Linear { per_combo } => 1.0 + combo as f64 * per_combo,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ComboMultiplier::Steps { steps } => {
                let mut last = (0, 1.0);
                for step in steps {
                    if step.min_combo < last.0 || step.multiplier < last.1 {
                        return Err(ConfigError::new(
                            "scoring.combo_multiplier",
                            "steps must be sorted by min_combo with non-decreasing \
                             multipliers >= 1.0",
                        ));
                    }
                    last = (step.min_combo, step.multiplier);
                }
                Ok(())
            }
            ComboMultiplier::Linear { per_combo } => {
                if !(*per_combo >= 0.0) {
                    return Err(ConfigError::new(
                        "scoring.combo_multiplier",
                        "per_combo must be >= 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl Default for ComboMultiplier {
    fn default() -> Self {
        let step = |min_combo, multiplier| ComboStep { min_combo, multiplier };
        ComboMultiplier::Steps {
            steps: vec![step(5, 1.1), step(10, 1.2), step(25, 1.5), step(50, 2.0)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub max_health: f64,
    pub miss_penalty: f64,
    pub empty_poor_penalty: f64,
    pub combo_multiplier: ComboMultiplier,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            miss_penalty: 20.0,
            empty_poor_penalty: 2.0,
            combo_multiplier: ComboMultiplier::default(),
        }
    }
}

impl ScoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_health > 0.0) || !self.max_health.is_finite() {
            return Err(ConfigError::new("scoring.max_health", "must be a positive number"));
        }
        if !(self.miss_penalty >= 0.0) {
            return Err(ConfigError::new("scoring.miss_penalty", "must be >= 0"));
        }
        if !(self.empty_poor_penalty >= 0.0) {
            return Err(ConfigError::new("scoring.empty_poor_penalty", "must be >= 0"));
        }
        self.combo_multiplier.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub start_offset: f64,
    /// No step is placed within this many seconds of the track end.
    pub tail_guard: f64,
    /// Step length at complexity 1.0; divided by the profile complexity.
    pub base_step: f64,
    /// Track length assumed until the real duration is known.
    pub placeholder_duration: f64,

    pub simultaneous_threshold: f64,
    pub simultaneous_chance: f64,
    pub double_threshold: f64,
    pub double_chance: f64,
    pub master_threshold: f64,
    pub stream_chance: f64,
    pub triple_chance: f64,
    pub stream_length: usize,
    pub stream_interval: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_offset: 2.0,
            tail_guard: 2.0,
            base_step: 0.3,
            placeholder_duration: 180.0,
            simultaneous_threshold: 1.5,
            simultaneous_chance: 0.2,
            double_threshold: 2.0,
            double_chance: 0.25,
            master_threshold: 2.5,
            stream_chance: 0.3,
            triple_chance: 0.4,
            stream_length: 4,
            stream_interval: 0.1,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_step > 0.0) {
            return Err(ConfigError::new("generator.base_step", "must be > 0"));
        }
        if !(self.start_offset >= 0.0) || !(self.tail_guard >= 0.0) {
            return Err(ConfigError::new("generator.start_offset", "offsets must be >= 0"));
        }
        if !(self.placeholder_duration > 0.0) {
            return Err(ConfigError::new("generator.placeholder_duration", "must be > 0"));
        }
        let chances = [
            self.simultaneous_chance,
            self.double_chance,
            self.stream_chance,
            self.triple_chance,
        ];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::new("generator", "pattern chances must lie in [0, 1]"));
        }
        if !(1..=beat_data::LANE_COUNT).contains(&self.stream_length) {
            return Err(ConfigError::new("generator.stream_length", "must be between 1 and 4"));
        }
        if !(self.stream_interval > 0.0) {
            return Err(ConfigError::new("generator.stream_interval", "must be > 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds before its scheduled time at which a note becomes active.
    pub lead_time: f64,
    /// Distance units per second at fall speed 1.0.
    pub position_scale: f64,
    /// Longest wait for the track duration before falling back to the placeholder map.
    pub duration_timeout_ms: u64,
    pub judge: JudgeConfig,
    pub scoring: ScoreConfig,
    pub generator: GeneratorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lead_time: 3.0,
            position_scale: 200.0,
            duration_timeout_ms: 3000,
            judge: JudgeConfig::default(),
            scoring: ScoreConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn duration_timeout(&self) -> Duration {
        Duration::from_millis(self.duration_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lead_time > 0.0) {
            return Err(ConfigError::new("lead_time", "must be > 0"));
        }
        if !(self.position_scale > 0.0) {
            return Err(ConfigError::new("position_scale", "must be > 0"));
        }
        self.judge.validate()?;
        self.scoring.validate()?;
        self.generator.validate()
    }
}

pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<GameConfig> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read config: {}", path.display()))?;
    load_from_slice(&bytes).with_context(|| format!("invalid config: {}", path.display()))
}

pub fn load_from_str(json: &str) -> anyhow::Result<GameConfig> {
    load_from_slice(json.as_bytes())
}

fn load_from_slice(bytes: &[u8]) -> anyhow::Result<GameConfig> {
    let config: GameConfig = serde_json::from_slice(bytes).context("failed to parse config json")?;
    config.validate()?;
    Ok(config)
}
