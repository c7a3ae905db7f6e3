use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

// fixed floor grid around the origin, for bearings and a sense of scale
pub struct GridPlugin;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct FloorGridGroup;

#[derive(Resource)]
pub struct GridConfig {
    pub spacing: f32,
    pub half_extent: f32,
    pub color: Color,
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: 5.0,
            half_extent: 150.0,
            color: Color::srgba(0.5, 0.5, 0.5, 0.12),
            enabled: true,
        }
    }
}

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GridConfig::default())
            .init_gizmo_group::<FloorGridGroup>()
            .add_systems(Startup, setup_gizmos)
            .add_systems(Update, draw_grid);
    }
}

fn setup_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<FloorGridGroup>();
    config.depth_bias = 0.1;
}

fn draw_grid(mut gizmos: Gizmos<FloorGridGroup>, params: Res<GridConfig>) {
    if !params.enabled {
        return;
    }

    let extent = params.half_extent;
    let steps = (2.0 * extent / params.spacing) as i32;

    for i in 0..=steps {
        let offset = -extent + i as f32 * params.spacing;
        gizmos.line(
            Vec3::new(offset, -0.01, -extent),
            Vec3::new(offset, -0.01, extent),
            params.color,
        );
        gizmos.line(
            Vec3::new(-extent, -0.01, offset),
            Vec3::new(extent, -0.01, offset),
            params.color,
        );
    }

    // world axes, slightly brighter
    gizmos.line(
        Vec3::new(-extent, 0.0, 0.0),
        Vec3::new(extent, 0.0, 0.0),
        Color::srgba(0.7, 0.3, 0.3, 0.4),
    );
    gizmos.line(
        Vec3::new(0.0, 0.0, -extent),
        Vec3::new(0.0, 0.0, extent),
        Color::srgba(0.3, 0.3, 0.7, 0.4),
    );
}
