use anyhow::{ensure, Context};
use beat_core::input::events::{Button, InputEvent};
use beat_core::input::InputQueue;
use beat_core::time::conductor::PlaybackClock;
use beat_core::time::duration::DurationRequest;
use beat_core::{GameConfig, Session};
use beat_data::{Beatmap, Difficulty, Lane, ResultSummary};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME_SECONDS: f64 = 1.0 / 60.0;
/// Frames allowed past the track end before the session is ended by hand.
const GRACE_FRAMES: u64 = 120;

#[derive(Debug, Clone, Copy)]
pub struct BotOptions {
    jitter: f64,
    miss_rate: f64,
}

impl BotOptions {
    pub fn new(jitter: f64, miss_rate: f64) -> anyhow::Result<Self> {
        ensure!(jitter >= 0.0 && jitter.is_finite(), "jitter must be >= 0 (got {jitter})");
        ensure!(
            (0.0..=1.0).contains(&miss_rate),
            "miss-rate must lie in [0, 1] (got {miss_rate})"
        );
        Ok(Self { jitter, miss_rate })
    }
}

#[derive(Debug, Clone, Copy)]
struct PlannedPress {
    time: f64,
    lane: Lane,
}

/// Plays one generated beatmap at 60 frames per second of simulated time.
pub fn run(
    config: GameConfig,
    difficulty: Difficulty,
    duration: f64,
    seed: Option<u64>,
    options: &BotOptions,
) -> anyhow::Result<ResultSummary> {
    let mut session = Session::new(config).context("invalid game config")?;
    if let Some(seed) = seed {
        session = session.with_seed(seed);
    }
    session
        .start(Some(difficulty), DurationRequest::ready(duration))
        .context("failed to start session")?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let presses = plan_presses(session.beatmap(), options, &mut rng);
    info!("autoplay: {} notes, {} planned presses", session.beatmap().len(), presses.len());

    let queue = InputQueue::new();
    let clock = PlaybackClock::elapsed(0.0);
    let end_frame = (duration / FRAME_SECONDS).ceil() as u64 + GRACE_FRAMES;
    let mut next_press = 0;

    for frame in 0..=end_frame {
        let now = clock.get_time(frame as f64 * FRAME_SECONDS);

        while let Some(press) = presses.get(next_press) {
            if press.time > now {
                break;
            }
            queue.push(InputEvent::press(lane_button(press.lane), press.time));
            next_press += 1;
        }

        for event in session.drain_input(&queue) {
            debug!("{:?} {:?} at {:.3}s", event.lane, event.judgment, event.time);
        }
        let report = session.tick(now);
        for event in &report.judgments {
            debug!("{:?} {:?} at {:.3}s", event.lane, event.judgment, event.time);
        }
        if report.state.is_terminal() {
            break;
        }
    }

    session
        .end()
        .context("session ended without results")
}

/// One press per note the bot decides to play, sorted by press time.
fn plan_presses(beatmap: &Beatmap, options: &BotOptions, rng: &mut StdRng) -> Vec<PlannedPress> {
    let mut presses: Vec<PlannedPress> = beatmap
        .notes
        .iter()
        .filter_map(|note| {
            if rng.gen::<f64>() < options.miss_rate {
                return None;
            }
            let offset = if options.jitter > 0.0 {
                rng.gen_range(-options.jitter..=options.jitter)
            } else {
                0.0
            };
            Some(PlannedPress {
                time: note.time + offset,
                lane: note.lane,
            })
        })
        .collect();
    presses.sort_by(|a, b| a.time.total_cmp(&b.time));
    presses
}

fn lane_button(lane: Lane) -> Button {
    match lane {
        Lane::Left => Button::Left,
        Lane::Down => Button::Down,
        Lane::Up => Button::Up,
        Lane::Right => Button::Right,
    }
}
