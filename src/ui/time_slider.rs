//! Time acceleration slider at the bottom of the screen.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::simulation::CometReadiness;
use crate::types::{SLIDER_MAX, TimeAcceleration};

/// Slider position for the current acceleration, pinned to the slider range.
pub fn displayed_position(acceleration: TimeAcceleration) -> f64 {
    acceleration.slider_position().clamp(0.0, SLIDER_MAX)
}

/// System that renders the time acceleration panel.
///
/// The slider stays disabled until the comet is ready.
pub fn time_slider_panel(
    mut contexts: EguiContexts,
    mut acceleration: ResMut<TimeAcceleration>,
    readiness: Res<CometReadiness>,
) {
    let Some(ctx) = contexts.ctx_mut().ok() else {
        return;
    };

    egui::TopBottomPanel::bottom("time_slider")
        .frame(
            egui::Frame::NONE
                .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 220))
                .inner_margin(egui::Margin::symmetric(16, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(egui::RichText::new("Time Acceleration").strong());
                ui.separator();

                let mut position = displayed_position(*acceleration);
                let response = ui.add_enabled(
                    readiness.loaded,
                    egui::Slider::new(&mut position, 0.0..=SLIDER_MAX).show_value(false),
                );
                if response.changed() {
                    *acceleration = TimeAcceleration::from_slider(position);
                }

                ui.separator();

                if !readiness.loaded {
                    ui.label("Comet model loading...");
                } else if acceleration.is_frozen() {
                    ui.label(egui::RichText::new("Frozen (Space)").monospace());
                } else {
                    ui.label(
                        egui::RichText::new(format!("{:.0}x", acceleration.value())).monospace(),
                    );
                }
            });
        });
}
