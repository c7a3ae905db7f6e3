use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};

use crate::systems::city::{CityConfig, ClearCityEvent, GenerateCityEvent, Seed};
use crate::systems::grid::GridConfig;
use crate::systems::pattern::SpikePatternEvent;
use crate::systems::rig::{ClearRigEvent, GenerateRigEvent, ResetRigEvent, RigState};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app.add_systems(EguiPrimaryContextPass, (ui_main, fps));
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    current_seed: Res<Seed>,
    mut config: ResMut<CityConfig>,
    mut grid_config: ResMut<GridConfig>,
    rig_state: Res<RigState>,
    mut city_events: EventWriter<GenerateCityEvent>,
    mut city_clear_events: EventWriter<ClearCityEvent>,
    mut spike_events: EventWriter<SpikePatternEvent>,
    mut rig_events: EventWriter<GenerateRigEvent>,
    mut rig_reset_events: EventWriter<ResetRigEvent>,
    mut rig_clear_events: EventWriter<ClearRigEvent>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::SidePanel::left("config_panel")
        .default_width(220.0)
        .min_width(250.0)
        .max_width(400.0)
        .resizable(true)
        .show(ctx, |ui| {
            // camera
            ui.label("Camera: ");
            ui.label("WASD - Move");
            ui.label("Scroll - Zoom");
            ui.label("MMB - Rotate");

            ui.separator();

            ui.checkbox(&mut grid_config.enabled, "Floor Grid");

            ui.separator();

            ui.label("City Block:");
            egui::CollapsingHeader::new("Lattice Parameters")
                .default_open(true)
                .show(ui, |ui| {
                    let params = &mut config.0;
                    ui.add(
                        egui::Slider::new(&mut params.city_size, 1..=40).text("City Size (cells)"),
                    )
                    .on_hover_text("Buildings per side, the block is size squared.");
                    ui.add(
                        egui::Slider::new(&mut params.footprint_max, params.footprint_min..=10)
                            .text("Max Footprint"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.footprint_min, 1..=params.footprint_max)
                            .text("Min Footprint"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.height_max, params.height_min..=40)
                            .text("Max Height"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.height_min, 1..=params.height_max)
                            .text("Min Height"),
                    );
                    ui.add(
                        egui::Slider::new(&mut params.street_width, 0.5..=5.0)
                            .text("Street Width")
                            .suffix(" m"),
                    );
                });

            ui.label(format!("Current seed: {}", current_seed.0));
            ui.horizontal(|ui| {
                if ui.button("Generate City").clicked() {
                    city_events.write(GenerateCityEvent {
                        seed: rand::random(),
                    });
                }
                if ui.button("Clear City").clicked() {
                    city_clear_events.write(ClearCityEvent);
                }
            });

            ui.separator();

            ui.label("Subject:");
            if ui
                .button("Make Spike Pattern")
                .on_hover_text("Grow a spike out of every face of the subject mesh.")
                .clicked()
            {
                spike_events.write(SpikePatternEvent);
            }

            ui.separator();

            ui.label("Render Setup:");
            let rig_present = rig_state.handles.is_some();
            ui.label(if rig_present {
                "Rig: present"
            } else {
                "Rig: absent"
            });

            if ui
                .add_enabled(!rig_present, egui::Button::new("Generate Render Setup"))
                .on_hover_text("Frame the subject with a camera, backdrop and 3-key lighting.")
                .clicked()
            {
                rig_events.write(GenerateRigEvent);
            }
            if ui
                .add_enabled(
                    rig_present,
                    egui::Button::new("Reset Light Rig Transformations"),
                )
                .on_hover_text("Put every controller back to its computed placement.")
                .clicked()
            {
                rig_reset_events.write(ResetRigEvent);
            }
            if ui
                .add_enabled(rig_present, egui::Button::new("Clear Render Setup"))
                .clicked()
            {
                rig_clear_events.write(ClearRigEvent);
            }

            if let Some(rig) = &rig_state.placement {
                ui.separator();
                egui::CollapsingHeader::new("Rig Values")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.label(format!("edge: {:.2}", rig.edge));
                        ui.label(format!("camera distance: {:.2}", rig.cam_dist));
                        ui.label(format!("key energy: {:.0}", rig.key.energy.unwrap_or(0.0)));
                        ui.label(format!("fill energy: {:.0}", rig.fill.energy.unwrap_or(0.0)));
                        ui.label(format!("back distance: {:.2}", rig.back.distance));
                    });
            }
        });
}

fn fps(mut contexts: EguiContexts, diagnostics: Res<DiagnosticsStore>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Area::new(egui::Id::new("fps_overlay"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("{fps:.0} fps")).color(egui::Color32::WHITE));
        });
}
