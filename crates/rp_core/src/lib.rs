//! Engine-side plumbing shared by the game crate: keyboard state tracking and
//! fixed-rate frame pacing. Nothing in here knows about levels or players.

pub mod input;
pub mod time;
