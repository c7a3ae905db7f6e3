use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::math::bounding::Aabb2d;
use bevy::window::{PrimaryWindow, WindowPlugin};
use bevy_egui::EguiPlugin;
use bevy_rts_camera::*;

pub mod config;
pub mod systems;


use bevy::prelude::*;

use systems::city::CityPlugin;
use systems::city::layout::{Antenna, BuildingVolume, RoofTier};
use systems::grid::GridPlugin;
use systems::pattern::PatternPlugin;
use systems::rig::{RigPlugin, Subject};
use systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(1920.0, 1080.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RtsCameraPlugin)
        // my custom plugins
        .add_plugins(GridPlugin)
        .add_plugins(CityPlugin)
        .add_plugins(PatternPlugin)
        .add_plugins(RigPlugin)
        .add_plugins(UIPlugin)
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.03)))
        .add_systems(Startup, (start, maximize_window))
        .add_systems(Update, handle_exit)
        .run()
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in windows.iter_mut() {
        window.set_maximized(true);
    }
}

// application entry point here
fn start(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // viewport camera, separate from the generated rig camera
    commands.spawn((
        RtsCamera {
            bounds: Aabb2d::new(Vec2::ZERO, Vec2::new(250.0, 250.0)),
            min_angle: 0.5,
            height_max: 250.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            pan_speed: 40.0,
            zoom_sensitivity: 0.15,
            edge_pan_width: 0.0,
            ..default()
        },
    ));

    // working light so the scene is visible before a rig exists
    commands.spawn((
        DirectionalLight {
            illuminance: 2_000.,
            ..default()
        },
        Transform::from_xyz(40_000.0, 60_000.0, 40_000.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // demo subject for the render setup, off to the side of the city block
    let subject_volume = BuildingVolume {
        footprint: 4.0,
        height: 10.0,
        tier: Some(RoofTier {
            shrink: 0.75,
            height: 0.75,
            antenna: Some(Antenna {
                shrink: 1.0 / 40.0,
                height: 10.0 / 7.0,
            }),
        }),
    };
    commands.spawn((
        Subject,
        Mesh3d(meshes.add(systems::city::mesh_gen::building_mesh(&subject_volume))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.75, 0.68, 0.55),
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::from_xyz(-30.0, 0.0, -30.0),
        Visibility::Visible,
    ));
}

// application exit
fn handle_exit(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
