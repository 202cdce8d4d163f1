pub mod model;
pub mod result;
pub mod profile;

pub use model::{Beatmap, Lane, Note, NoteKind, LANE_COUNT};
pub use profile::{Difficulty, DifficultyParseError, DifficultyProfile};
pub use result::{Rank, ResultSummary, SessionOutcome, Tier, TierCounts};
