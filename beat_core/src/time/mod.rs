pub mod conductor;
pub mod duration;
