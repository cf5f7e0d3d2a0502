//! Comet Tour - comet orbit and tail simulator
//!
//! A desktop application following a comet around its orbit while its dust
//! and ion tails stream away from the sun.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use comet_tour::camera::CameraPlugin;
use comet_tour::input::InputPlugin;
use comet_tour::render::RenderPlugin;
use comet_tour::simulation::SimulationPlugin;
use comet_tour::time::TimePlugin;
use comet_tour::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Comet Tour".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins((SimulationPlugin, TimePlugin, InputPlugin, CameraPlugin))
        .add_plugins((RenderPlugin, UiPlugin))
        .run();
}
