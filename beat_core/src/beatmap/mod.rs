use beat_data::{Beatmap, DifficultyProfile, Lane, Note, NoteKind, LANE_COUNT};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;

/// Builds a random beatmap for a track of `duration` seconds.
///
/// The same seed, profile and config always produce the same map. Without a
/// seed the generator draws from entropy.
pub fn generate(
    duration: f64,
    profile: &DifficultyProfile,
    seed: Option<u64>,
    config: &GeneratorConfig,
) -> Beatmap {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut beatmap = generate_with_rng(duration, profile, config, &mut rng);
    beatmap.seed = seed;
    beatmap
}

/// Beatmap for `config.placeholder_duration`, used while the real track length is unknown.
pub fn generate_placeholder(
    profile: &DifficultyProfile,
    seed: Option<u64>,
    config: &GeneratorConfig,
) -> Beatmap {
    let mut beatmap = generate(config.placeholder_duration, profile, seed, config);
    beatmap.placeholder = true;
    beatmap
}

pub fn generate_with_rng<R: Rng>(
    duration: f64,
    profile: &DifficultyProfile,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Beatmap {
    let mut beatmap = Beatmap::empty(duration);
    let end = duration - config.tail_guard;
    let step = config.base_step / profile.complexity;
    // The step loop only terminates on a finite end and a positive finite step.
    let playable = end.is_finite() && end > config.start_offset && step.is_finite() && step > 0.0;
    if !playable {
        debug!(
            "no room for notes (duration {duration}, complexity {})",
            profile.complexity
        );
        return beatmap;
    }

    let mut notes = Vec::new();
    // Times are computed from the step index so long tracks do not drift.
    for k in 0u64.. {
        let time = config.start_offset + k as f64 * step;
        if time >= end {
            break;
        }
        if rng.gen::<f64>() < profile.note_frequency {
            emit_step(time, profile.complexity, config, rng, &mut notes);
        }
    }

    notes.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.lane.cmp(&b.lane)));
    notes.dedup_by(|later, earlier| later.time == earlier.time && later.lane == earlier.lane);

    debug!("generated {} notes over {duration:.1}s", notes.len());
    beatmap.notes = notes;
    beatmap
}

fn emit_step<R: Rng>(
    time: f64,
    complexity: f64,
    config: &GeneratorConfig,
    rng: &mut R,
    notes: &mut Vec<Note>,
) {
    let before = notes.len();

    if complexity >= config.master_threshold {
        if rng.gen::<f64>() < config.stream_chance {
            push_stream(time, config, rng, notes);
        } else if rng.gen::<f64>() < config.triple_chance {
            push_chord(time, 3, NoteKind::Triple, rng, notes);
        }
    } else if complexity >= config.double_threshold {
        if rng.gen::<f64>() < config.double_chance {
            push_chord(time, 2, NoteKind::Double, rng, notes);
        }
    } else if complexity > config.simultaneous_threshold
        && rng.gen::<f64>() < config.simultaneous_chance
    {
        let count = rng.gen_range(2..=3);
        push_chord(time, count, NoteKind::Simultaneous, rng, notes);
    }

    if notes.len() == before {
        notes.push(Note {
            time,
            lane: random_lane(rng),
            kind: NoteKind::Single,
        });
    }
}

/// `count` notes on distinct lanes at the same time.
fn push_chord<R: Rng>(
    time: f64,
    count: usize,
    kind: NoteKind,
    rng: &mut R,
    notes: &mut Vec<Note>,
) {
    for i in index::sample(rng, LANE_COUNT, count.min(LANE_COUNT)) {
        if let Some(lane) = Lane::from_index(i) {
            notes.push(Note { time, lane, kind });
        }
    }
}

/// Consecutive lanes, one note every `stream_interval` seconds.
fn push_stream<R: Rng>(time: f64, config: &GeneratorConfig, rng: &mut R, notes: &mut Vec<Note>) {
    let start = rng.gen_range(0..LANE_COUNT);
    for i in 0..config.stream_length.min(LANE_COUNT) {
        if let Some(lane) = Lane::from_index((start + i) % LANE_COUNT) {
            notes.push(Note {
                time: time + i as f64 * config.stream_interval,
                lane,
                kind: NoteKind::Stream,
            });
        }
    }
}

fn random_lane<R: Rng>(rng: &mut R) -> Lane {
    Lane::ALL[rng.gen_range(0..LANE_COUNT)]
}
