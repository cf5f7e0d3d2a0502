//! Rendering systems for the comet tour.
//!
//! Provides the comet nucleus, the sun, the star skybox and both tails.

mod background;
pub mod bodies;
pub mod tails;

use bevy::prelude::*;

use self::background::BackgroundPlugin;
use self::bodies::CometBodyPlugin;
use self::tails::TailRenderPlugin;

pub use self::background::{Skybox, star_direction};
pub use self::bodies::{Comet, CometModel, Sun, comet_rotation};
pub use self::tails::{TailParticle, instance_transform, tail_color};

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((CometBodyPlugin, BackgroundPlugin, TailRenderPlugin));
    }
}
