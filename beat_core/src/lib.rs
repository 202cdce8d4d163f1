//! Timing judgment and scoring for a four-lane rhythm game.
//!
//! Rendering, audio playback and raw input capture live outside this crate.
//! A [`Session`] is fed playback times through [`Session::tick`] and lane
//! presses through [`Session::press`]; everything it reports back is plain data.

pub mod beatmap;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod time;

pub use config::GameConfig;
pub use error::{ConfigError, SessionError};
pub use gameplay::session::{HudSnapshot, JudgmentEvent, Session, SessionState, TickReport};
