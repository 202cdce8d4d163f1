pub mod judge;
pub mod lifecycle;
pub mod score;
pub mod session;
