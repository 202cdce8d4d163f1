use std::sync::atomic::Ordering;
use std::sync::Arc;

use atomic_float::AtomicF64;

enum ClockSource {
    /// Playback position published by the audio thread.
    Audio(Arc<AtomicF64>),
    /// No audio position available; time is measured from `origin`.
    Elapsed { origin: f64 },
}

/// Answers "where is playback now" from either the audio position or the wall clock.
pub struct PlaybackClock {
    source: ClockSource,
    last_audio_time: f64,
    last_update_time: f64,
}

impl PlaybackClock {
    pub fn audio(audio_time_source: Arc<AtomicF64>) -> Self {
        Self {
            source: ClockSource::Audio(audio_time_source),
            last_audio_time: 0.0,
            last_update_time: 0.0,
        }
    }

    /// Clock that counts seconds since `start_system_time`.
    pub fn elapsed(start_system_time: f64) -> Self {
        Self {
            source: ClockSource::Elapsed {
                origin: start_system_time,
            },
            last_audio_time: 0.0,
            last_update_time: start_system_time,
        }
    }

    pub fn is_audio_driven(&self) -> bool {
        matches!(self.source, ClockSource::Audio(_))
    }

    /// Samples the audio position. Non-finite samples are skipped and the
    /// previous sample keeps being extrapolated.
    pub fn update(&mut self, current_system_time: f64) {
        if let ClockSource::Audio(source) = &self.source {
            let sample = source.load(Ordering::Acquire);
            if !sample.is_finite() {
                return;
            }
            self.last_audio_time = sample;
            self.last_update_time = current_system_time;
        }
    }

    pub fn get_time(&self, current_system_time: f64) -> f64 {
        match &self.source {
            ClockSource::Audio(_) => {
                let elapsed = current_system_time - self.last_update_time;
                self.last_audio_time + elapsed
            }
            ClockSource::Elapsed { origin } => current_system_time - origin,
        }
    }
}
