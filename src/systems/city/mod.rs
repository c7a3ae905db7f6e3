// city block generation plugin
// the pure lattice lives in layout.rs, this file owns the scene side

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::INITIAL_SEED;

pub mod layout;
pub mod mesh_gen;

use layout::CityParams;

#[derive(Resource)]
pub struct Seed(pub u64);

// wraps the pure params so the UI can edit them as a resource
#[derive(Resource, Default)]
pub struct CityConfig(pub CityParams);

// entity hierarchy components
#[derive(Component)]
pub struct City {
    pub seed: u64,
}

#[derive(Component)]
pub struct Building {
    pub row: u32,
    pub col: u32,
}

#[derive(Event)]
pub struct GenerateCityEvent {
    pub seed: u64,
}

#[derive(Event)]
pub struct ClearCityEvent;

pub struct CityPlugin;

impl Plugin for CityPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Seed(INITIAL_SEED))
            .insert_resource(CityConfig::default())
            .add_event::<GenerateCityEvent>()
            .add_event::<ClearCityEvent>()
            .add_systems(
                Startup,
                |mut commands: Commands,
                 mut meshes: ResMut<Assets<Mesh>>,
                 mut materials: ResMut<Assets<StandardMaterial>>,
                 seed: Res<Seed>,
                 config: Res<CityConfig>| {
                    spawn_city(&mut commands, &mut meshes, &mut materials, seed.0, &config.0);
                },
            )
            .add_systems(Update, (handle_generate, handle_clear));
    }
}

// build the whole block: one root entity, one child per lattice cell
// the lattice plane (x, y) maps onto the ground plane (x, z)
fn spawn_city(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    seed: u64,
    params: &CityParams,
) {
    let cells = match layout::layout(params, StdRng::seed_from_u64(seed)) {
        Ok(cells) => cells,
        Err(err) => {
            warn!("city generation skipped: {err}");
            return;
        }
    };

    let city_entity = commands.spawn((City { seed }, Transform::default(), Visibility::Visible)).id();

    let mut tint_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut children = Vec::new();

    for cell in cells {
        let mesh_handle = meshes.add(mesh_gen::building_mesh(&cell.volume));

        // mild per-building tint variation
        let base = 0.55 + tint_rng.random_range(-0.08_f32..0.08_f32);
        let material = materials.add(StandardMaterial {
            base_color: Color::srgb(base, base, (base + 0.1).clamp(0.0, 1.0)),
            perceptual_roughness: 0.9,
            ..default()
        });

        let building = commands
            .spawn((
                Building {
                    row: cell.row,
                    col: cell.col,
                },
                Mesh3d(mesh_handle),
                MeshMaterial3d(material),
                Transform::from_xyz(cell.position.x, 0.0, cell.position.y),
                Visibility::Visible,
            ))
            .id();
        children.push(building);
    }

    commands.entity(city_entity).add_children(&children);
    info!("generated {} buildings (seed {seed})", children.len());
}

fn handle_generate(
    mut commands: Commands,
    mut events: EventReader<GenerateCityEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    config: Res<CityConfig>,
    query: Query<Entity, With<City>>,
) {
    for event in events.read() {
        // regenerate by replacement, children go with the root
        for entity in query.iter() {
            commands.entity(entity).try_despawn();
        }
        seed.0 = event.seed;
        spawn_city(&mut commands, &mut meshes, &mut materials, event.seed, &config.0);
    }
}

fn handle_clear(
    mut commands: Commands,
    mut events: EventReader<ClearCityEvent>,
    query: Query<Entity, With<City>>,
) {
    for _event in events.read() {
        for entity in query.iter() {
            commands.entity(entity).try_despawn();
        }
    }
}
