use beat_data::{Lane, Tier};

use crate::config::{JudgeConfig, JudgeDomain, TierTable};
use crate::gameplay::lifecycle::{NoteTracker, Resolution};
use crate::input::events::Button;

/// Where the judgment line sits relative to a falling note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentZone {
    pub domain: JudgeDomain,
    /// Distance units covered per second of playback (1.0 in the time domain).
    pub units_per_second: f64,
}

impl JudgmentZone {
    pub fn time() -> Self {
        Self {
            domain: JudgeDomain::Time,
            units_per_second: 1.0,
        }
    }

    pub fn position(fall_speed: f64, position_scale: f64) -> Self {
        Self {
            domain: JudgeDomain::Position,
            units_per_second: fall_speed * position_scale,
        }
    }

    pub fn for_domain(domain: JudgeDomain, fall_speed: f64, position_scale: f64) -> Self {
        match domain {
            JudgeDomain::Time => Self::time(),
            JudgeDomain::Position => Self::position(fall_speed, position_scale),
        }
    }

    /// Positive while the note is still approaching, negative once it has passed.
    pub fn signed_distance(&self, scheduled_time: f64, current_time: f64) -> f64 {
        (scheduled_time - current_time) * self.units_per_second
    }
}

/// Lane distance between a note and the judgment line, independent of any renderer.
pub fn distance_to_zone(
    scheduled_time: f64,
    current_time: f64,
    fall_speed: f64,
    position_scale: f64,
) -> f64 {
    JudgmentZone::position(fall_speed, position_scale).signed_distance(scheduled_time, current_time)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JudgeOutcome {
    Tier {
        note: usize,
        tier: Tier,
        /// Signed distance at the moment of the press; positive means early.
        offset: f64,
    },
    /// Nothing classifiable. `consumed` names the candidate that was resolved
    /// as a miss, if the press was close enough to one to use it up.
    NoMatch {
        consumed: Option<usize>,
        offset: Option<f64>,
    },
}

pub struct HitJudge {
    tiers: TierTable,
    proximity_window: f64,
    consume_on_no_match: bool,
}

impl HitJudge {
    pub fn new(config: &JudgeConfig) -> Self {
        Self {
            tiers: config.tiers.clone(),
            proximity_window: config.proximity_window,
            consume_on_no_match: config.consume_on_no_match,
        }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Nearest active note in `lane` within the proximity window, with its signed
    /// distance. Equal distances go to the earlier note.
    pub fn candidate(
        &self,
        tracker: &NoteTracker,
        lane: Lane,
        current_time: f64,
    ) -> Option<(usize, f64)> {
        let zone = tracker.zone();
        let mut best: Option<(usize, f64)> = None;

        for tracked in tracker.active_in_lane(lane) {
            let distance = zone.signed_distance(tracked.note.time, current_time);
            if distance.abs() > self.proximity_window {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance.abs() >= best_distance.abs() => {}
                _ => best = Some((tracked.id, distance)),
            }
        }
        best
    }

    pub fn judge(&self, tracker: &mut NoteTracker, lane: Lane, current_time: f64) -> JudgeOutcome {
        let Some((id, offset)) = self.candidate(tracker, lane, current_time) else {
            return JudgeOutcome::NoMatch {
                consumed: None,
                offset: None,
            };
        };

        match self.tiers.classify(offset) {
            Some(tier) => {
                let resolved = tracker.resolve(id, Resolution::Hit(tier));
                debug_assert!(resolved, "candidate {id} was not active");
                JudgeOutcome::Tier {
                    note: id,
                    tier,
                    offset,
                }
            }
            None if self.consume_on_no_match => {
                let resolved = tracker.resolve(id, Resolution::Missed);
                debug_assert!(resolved, "candidate {id} was not active");
                JudgeOutcome::NoMatch {
                    consumed: Some(id),
                    offset: Some(offset),
                }
            }
            None => JudgeOutcome::NoMatch {
                consumed: None,
                offset: Some(offset),
            },
        }
    }
}

pub fn button_to_lane(button: Button) -> Option<Lane> {
    match button {
        Button::Left => Some(Lane::Left),
        Button::Down => Some(Lane::Down),
        Button::Up => Some(Lane::Up),
        Button::Right => Some(Lane::Right),
        Button::Back => None,
    }
}
