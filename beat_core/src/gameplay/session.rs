use beat_data::{Beatmap, Difficulty, DifficultyProfile, Lane, ResultSummary, SessionOutcome};
use log::{debug, info, warn};
use serde::Serialize;

use crate::beatmap;
use crate::config::{GameConfig, NoMatchPolicy};
use crate::error::SessionError;
use crate::gameplay::judge::{button_to_lane, HitJudge, JudgeOutcome, JudgmentZone};
use crate::gameplay::lifecycle::{NoteTracker, NoteView};
use crate::gameplay::score::{Judgment, ScoreEngine, SessionStats};
use crate::input::events::InputEvent;
use crate::input::InputQueue;
use crate::time::duration::{DurationOutcome, DurationRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NotStarted,
    Playing,
    Completed,
    Depleted,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Depleted)
    }
}

/// One judgment, for feedback effects and sounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentEvent {
    pub lane: Lane,
    pub judgment: Judgment,
    /// The note that was resolved, if any.
    pub note: Option<usize>,
    /// Signed distance to the zone when judged; positive means early.
    pub offset: Option<f64>,
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub spawned: Vec<usize>,
    pub judgments: Vec<JudgmentEvent>,
    pub state: SessionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub combo: u32,
    pub accuracy: f64,
    pub health: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    Judged(JudgmentEvent),
    Ignored,
    /// The player left the session.
    Cancelled,
}

/// One play of one beatmap. Owns every note and all running totals; the
/// caller drives it with `tick` once per frame and `press` per lane input.
pub struct Session {
    config: GameConfig,
    seed: Option<u64>,
    state: SessionState,
    difficulty: Option<Difficulty>,
    beatmap: Beatmap,
    tracker: NoteTracker,
    judge: HitJudge,
    score: ScoreEngine,
    results: Option<ResultSummary>,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let zone = JudgmentZone::for_domain(config.judge.domain, 1.0, config.position_scale);
        Ok(Self {
            judge: HitJudge::new(&config.judge),
            score: ScoreEngine::new(config.scoring.clone(), config.judge.tiers.clone()),
            tracker: NoteTracker::empty(zone),
            beatmap: Beatmap::empty(0.0),
            seed: None,
            state: SessionState::NotStarted,
            difficulty: None,
            results: None,
            config,
        })
    }

    /// Fixes the generator seed so every start produces the same beatmap.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn beatmap(&self) -> &Beatmap {
        &self.beatmap
    }

    pub fn tracker(&self) -> &NoteTracker {
        &self.tracker
    }

    pub fn stats(&self) -> &SessionStats {
        self.score.stats()
    }

    pub fn results(&self) -> Option<&ResultSummary> {
        self.results.as_ref()
    }

    /// Generates a beatmap and starts playing.
    ///
    /// A placeholder-length beatmap is built first. If the track duration
    /// arrives within `duration_timeout_ms` the beatmap is regenerated for the
    /// real length; otherwise play continues on the placeholder.
    pub fn start(
        &mut self,
        difficulty: Option<Difficulty>,
        duration: DurationRequest,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Playing {
            return Err(SessionError::AlreadyRunning);
        }
        let difficulty = difficulty.ok_or(SessionError::NoDifficulty)?;
        let profile = difficulty.profile();
        let generator = &self.config.generator;

        let placeholder = beatmap::generate_placeholder(&profile, self.seed, generator);
        let beatmap = match duration.wait(self.config.duration_timeout()) {
            DurationOutcome::Known(seconds) => {
                debug!("track duration {seconds:.2}s; regenerating beatmap");
                beatmap::generate(seconds, &profile, self.seed, generator)
            }
            outcome => {
                warn!(
                    "track duration unavailable ({outcome:?}); playing the {:.0}s placeholder",
                    generator.placeholder_duration
                );
                placeholder
            }
        };

        self.begin(difficulty, &profile, beatmap);
        Ok(())
    }

    /// Starts playing a beatmap built elsewhere.
    pub fn start_with_beatmap(
        &mut self,
        difficulty: Option<Difficulty>,
        beatmap: Beatmap,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Playing {
            return Err(SessionError::AlreadyRunning);
        }
        let difficulty = difficulty.ok_or(SessionError::NoDifficulty)?;
        self.begin(difficulty, &difficulty.profile(), beatmap);
        Ok(())
    }

    fn begin(&mut self, difficulty: Difficulty, profile: &DifficultyProfile, beatmap: Beatmap) {
        let zone = JudgmentZone::for_domain(
            self.config.judge.domain,
            profile.fall_speed,
            self.config.position_scale,
        );
        self.tracker = NoteTracker::new(
            beatmap.notes.clone(),
            self.config.lead_time,
            self.config.judge.expiry_tolerance,
            zone,
        );
        self.score.reset();
        self.results = None;
        self.difficulty = Some(difficulty);
        self.state = SessionState::Playing;

        info!(
            "session started: {} ({} notes, {:.1}s{})",
            profile.label,
            beatmap.len(),
            beatmap.duration,
            if beatmap.placeholder { ", placeholder" } else { "" }
        );
        self.beatmap = beatmap;
    }

    /// Per-frame advance: spawn, expire, apply misses, detect the end of play.
    pub fn tick(&mut self, current_time: f64) -> TickReport {
        if self.state != SessionState::Playing {
            return TickReport {
                state: self.state,
                ..TickReport::default()
            };
        }

        let advance = self.tracker.advance(current_time);
        let mut judgments = Vec::with_capacity(advance.expired.len());

        for id in advance.expired {
            let Some(tracked) = self.tracker.get(id) else {
                continue;
            };
            let event = JudgmentEvent {
                lane: tracked.note.lane,
                judgment: Judgment::Miss,
                note: Some(id),
                offset: Some(self.tracker.zone().signed_distance(tracked.note.time, current_time)),
                time: current_time,
            };
            let delta = self.score.apply(Judgment::Miss);
            judgments.push(event);
            if delta.depleted {
                self.finish(SessionOutcome::Depleted);
                break;
            }
        }

        if self.state == SessionState::Playing
            && current_time >= self.beatmap.duration
            && self.tracker.is_exhausted()
        {
            self.finish(SessionOutcome::Completed);
        }

        TickReport {
            spawned: advance.spawned,
            judgments,
            state: self.state,
        }
    }

    /// Judges a press in `lane`. None when not playing or when the press is
    /// dropped by `NoMatchPolicy::Ignore`.
    pub fn press(&mut self, lane: Lane, current_time: f64) -> Option<JudgmentEvent> {
        if self.state != SessionState::Playing {
            return None;
        }

        let outcome = self.judge.judge(&mut self.tracker, lane, current_time);
        let (judgment, note, offset) = match outcome {
            JudgeOutcome::Tier { note, tier, offset } => {
                (Judgment::Hit(tier), Some(note), Some(offset))
            }
            JudgeOutcome::NoMatch {
                consumed: Some(note),
                offset,
            } => (Judgment::Miss, Some(note), offset),
            JudgeOutcome::NoMatch {
                consumed: None,
                offset,
            } => match self.config.judge.no_match_policy {
                NoMatchPolicy::ForcedMiss => (Judgment::Miss, None, offset),
                NoMatchPolicy::EmptyPoor => (Judgment::EmptyPoor, None, offset),
                NoMatchPolicy::Ignore => return None,
            },
        };

        let delta = self.score.apply(judgment);
        if delta.depleted {
            self.finish(SessionOutcome::Depleted);
        }

        Some(JudgmentEvent {
            lane,
            judgment,
            note,
            offset,
            time: current_time,
        })
    }

    /// Routes a raw input event. Releases are ignored; `Back` cancels the session.
    pub fn handle_input(&mut self, event: InputEvent) -> InputOutcome {
        if !event.pressed {
            return InputOutcome::Ignored;
        }
        match button_to_lane(event.button) {
            Some(lane) => self
                .press(lane, event.timestamp)
                .map_or(InputOutcome::Ignored, InputOutcome::Judged),
            None => {
                self.cancel();
                InputOutcome::Cancelled
            }
        }
    }

    /// Handles everything waiting in `queue` and returns the judgments made.
    pub fn drain_input(&mut self, queue: &InputQueue) -> Vec<JudgmentEvent> {
        queue
            .drain()
            .filter_map(|event| match self.handle_input(event) {
                InputOutcome::Judged(judgment) => Some(judgment),
                InputOutcome::Ignored | InputOutcome::Cancelled => None,
            })
            .collect()
    }

    /// The track ended. Unplayed notes are dropped without judging them.
    pub fn end(&mut self) -> Option<ResultSummary> {
        if self.state == SessionState::Playing {
            self.finish(SessionOutcome::Completed);
        }
        self.results.clone()
    }

    /// Leaves the session mid-play: nothing else is judged and all totals are discarded.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Playing {
            info!("session cancelled");
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.tracker.clear();
        self.score.reset();
        self.beatmap = Beatmap::empty(0.0);
        self.results = None;
        self.difficulty = None;
        self.state = SessionState::NotStarted;
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        let total_notes = u32::try_from(self.tracker.len()).unwrap_or(u32::MAX);
        let stats = self.score.stats();
        let accuracy = self.score.final_accuracy(total_notes);
        let summary = ResultSummary {
            outcome,
            score: stats.score.floor() as u64,
            max_combo: stats.max_combo,
            accuracy,
            rank: self.score.rank(total_notes),
            counts: stats.counts,
            miss_count: stats.miss_count,
            empty_poor_count: stats.empty_poor_count,
            total_notes,
        };
        info!(
            "session {:?}: score {} accuracy {:.1}% rank {}",
            outcome, summary.score, summary.accuracy, summary.rank
        );

        self.tracker.clear();
        self.results = Some(summary);
        self.state = match outcome {
            SessionOutcome::Completed => SessionState::Completed,
            SessionOutcome::Depleted => SessionState::Depleted,
        };
    }

    pub fn hud(&self) -> HudSnapshot {
        let stats = self.score.stats();
        HudSnapshot {
            score: stats.score.floor() as u64,
            combo: stats.combo,
            accuracy: self.score.live_accuracy(),
            health: stats.health,
            max_health: stats.max_health,
        }
    }

    pub fn render_feed(&self, current_time: f64) -> Vec<NoteView> {
        self.tracker.render_feed(current_time)
    }
}
