// Library surface for the drill engine and its collaborators.
// Kept lean so integration tests can drive full drills without a terminal.
pub mod display;
pub mod drill;
pub mod error;
pub mod input;
pub mod passage;
pub mod stats;
pub mod text;
