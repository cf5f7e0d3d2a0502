//! Comet Tour - comet orbit and tail simulator
//!
//! A library crate providing the orbital kinematics, particle tails and
//! Bevy plugins for testing and integration purposes.

pub mod camera;
pub mod input;
pub mod orbit;
pub mod render;
pub mod simulation;
pub mod tail;
pub mod time;
pub mod types;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
