use beat_data::{Lane, Note, Tier};

use crate::gameplay::judge::JudgmentZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Hit(Tier),
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Pending,
    Active,
    Resolved(Resolution),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedNote {
    /// Position in the sorted beatmap.
    pub id: usize,
    pub note: Note,
    pub state: NoteState,
}

/// Notes that changed state during one `advance` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advance {
    pub spawned: Vec<usize>,
    pub expired: Vec<usize>,
}

/// Where the renderer should draw an active note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteView {
    pub id: usize,
    pub lane: Lane,
    pub time_to_hit: f64,
    /// Signed distance to the judgment zone in the judge's domain.
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteCounts {
    pub pending: usize,
    pub active: usize,
    pub resolved: usize,
}

/// Owns the session's notes and moves them Pending -> Active -> Resolved.
pub struct NoteTracker {
    notes: Vec<TrackedNote>,
    /// Index of the first note that has not spawned yet.
    next_pending: usize,
    /// Ids of active notes, ascending.
    active: Vec<usize>,
    lead_time: f64,
    expiry_tolerance: f64,
    zone: JudgmentZone,
}

impl NoteTracker {
    pub fn new(
        mut notes: Vec<Note>,
        lead_time: f64,
        expiry_tolerance: f64,
        zone: JudgmentZone,
    ) -> Self {
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        let notes = notes
            .into_iter()
            .enumerate()
            .map(|(id, note)| TrackedNote {
                id,
                note,
                state: NoteState::Pending,
            })
            .collect();

        Self {
            notes,
            next_pending: 0,
            active: Vec::new(),
            lead_time,
            expiry_tolerance,
            zone,
        }
    }

    pub fn empty(zone: JudgmentZone) -> Self {
        Self::new(Vec::new(), 0.0, 0.0, zone)
    }

    /// Spawns every note inside the lead time, then expires every active note
    /// that has moved past the zone by more than the tolerance.
    pub fn advance(&mut self, current_time: f64) -> Advance {
        let mut result = Advance::default();

        while let Some(tracked) = self.notes.get_mut(self.next_pending) {
            if tracked.note.time - current_time > self.lead_time {
                break;
            }
            tracked.state = NoteState::Active;
            self.active.push(tracked.id);
            result.spawned.push(tracked.id);
            self.next_pending += 1;
        }

        let zone = self.zone;
        let tolerance = self.expiry_tolerance;
        let notes = &mut self.notes;
        self.active.retain(|&id| {
            let tracked = &mut notes[id];
            let lateness = -zone.signed_distance(tracked.note.time, current_time);
            if lateness > tolerance {
                tracked.state = NoteState::Resolved(Resolution::Missed);
                result.expired.push(id);
                false
            } else {
                true
            }
        });

        result
    }

    /// Resolves an active note. Returns false, and changes nothing, for a note
    /// that is pending, already resolved, or unknown.
    pub fn resolve(&mut self, id: usize, resolution: Resolution) -> bool {
        let Some(position) = self.active.iter().position(|&active| active == id) else {
            return false;
        };
        self.active.remove(position);
        self.notes[id].state = NoteState::Resolved(resolution);
        true
    }

    pub fn active_in_lane(&self, lane: Lane) -> impl Iterator<Item = &TrackedNote> + '_ {
        self.active
            .iter()
            .map(move |&id| &self.notes[id])
            .filter(move |tracked| tracked.note.lane == lane)
    }

    pub fn active(&self) -> impl Iterator<Item = &TrackedNote> + '_ {
        self.active.iter().map(move |&id| &self.notes[id])
    }

    pub fn get(&self, id: usize) -> Option<&TrackedNote> {
        self.notes.get(id)
    }

    pub fn notes(&self) -> &[TrackedNote] {
        &self.notes
    }

    pub fn zone(&self) -> JudgmentZone {
        self.zone
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn counts(&self) -> NoteCounts {
        let pending = self.notes.len() - self.next_pending;
        let active = self.active.len();
        NoteCounts {
            pending,
            active,
            resolved: self.notes.len() - pending - active,
        }
    }

    /// Nothing left to spawn or judge.
    pub fn is_exhausted(&self) -> bool {
        self.next_pending >= self.notes.len() && self.active.is_empty()
    }

    pub fn render_feed(&self, current_time: f64) -> Vec<NoteView> {
        self.active()
            .map(|tracked| NoteView {
                id: tracked.id,
                lane: tracked.note.lane,
                time_to_hit: tracked.note.time - current_time,
                distance: self.zone.signed_distance(tracked.note.time, current_time),
            })
            .collect()
    }

    /// Drops every note without judging it.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.active.clear();
        self.next_pending = 0;
    }
}
