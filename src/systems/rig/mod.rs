// render setup generation plugin
// the pure math lives in bounds/placement, the transform structure in
// scene_graph/hierarchy; this file owns the bevy side: reading the subject
// mesh, driving the three operations, and mirroring the graph as entities

use std::f32::consts::FRAC_PI_2;

use bevy::math::Affine3A;
use bevy::math::primitives::Torus;
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use crate::config;

pub mod bounds;
pub mod hierarchy;
pub mod mesh_gen;
pub mod placement;
pub mod scene_graph;

use bounds::BoundingBox;
use hierarchy::RigHandles;
use placement::RigPlacement;
use scene_graph::{NodeId, NodeKind, SceneGraph};

// the mesh the rig is framed around
#[derive(Component)]
pub struct Subject;

// marker for the spawned entity mirror of the rig
#[derive(Component)]
struct RigAnchor;

#[derive(Event)]
pub struct GenerateRigEvent;

#[derive(Event)]
pub struct ResetRigEvent;

#[derive(Event)]
pub struct ClearRigEvent;

// the authoritative rig model; entities are rebuilt from it after every
// mutation, the way the city rebuilds from its layout
#[derive(Resource, Default)]
pub struct RigState {
    pub graph: SceneGraph,
    pub handles: Option<RigHandles>,
    pub placement: Option<RigPlacement>,
}

pub struct RigPlugin;

impl Plugin for RigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RigState>()
            .add_event::<GenerateRigEvent>()
            .add_event::<ResetRigEvent>()
            .add_event::<ClearRigEvent>()
            .add_systems(
                Update,
                (
                    (handle_generate, handle_reset, handle_clear),
                    sync_rig_entities,
                )
                    .chain(),
            );
    }
}

// the rig math runs in the Z-up space the placement formulas were written
// in; this basis change maps host (Y-up) coordinates into it, and the rig
// anchor entity carries the inverse rotation
fn host_to_rig() -> Affine3A {
    Affine3A::from_quat(Quat::from_rotation_x(FRAC_PI_2))
}

fn handle_generate(
    mut events: EventReader<GenerateRigEvent>,
    mut state: ResMut<RigState>,
    meshes: Res<Assets<Mesh>>,
    subject: Query<(&Mesh3d, &GlobalTransform), With<Subject>>,
) {
    for _event in events.read() {
        let Ok((mesh3d, transform)) = subject.single() else {
            warn!("render setup needs exactly one subject mesh");
            continue;
        };
        let Some(mesh) = meshes.get(&mesh3d.0) else {
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            warn!("subject mesh has no vertex positions");
            continue;
        };

        let world = host_to_rig() * transform.affine();
        let bbox =
            BoundingBox::from_vertices(positions.iter().map(|p| Vec3::from_array(*p)), &world);
        let subject_pos = host_to_rig().transform_point3(transform.translation());

        let state = &mut *state;
        let rig = match placement::solve(&bbox) {
            Ok(rig) => rig,
            Err(err) => {
                warn!("render setup not generated: {err}");
                continue;
            }
        };
        match hierarchy::build(&mut state.graph, &rig, subject_pos) {
            Ok(handles) => {
                info!(
                    "render setup generated: edge {}, camera distance {}",
                    rig.edge, rig.cam_dist
                );
                state.handles = Some(handles);
                state.placement = Some(rig);
            }
            Err(err) => warn!("render setup not generated: {err}"),
        }
    }
}

fn handle_reset(mut events: EventReader<ResetRigEvent>, mut state: ResMut<RigState>) {
    for _event in events.read() {
        let state = &mut *state;
        match &state.handles {
            Some(handles) => match hierarchy::reset(&mut state.graph, handles) {
                Ok(()) => info!("light rig transformations reset"),
                Err(err) => warn!("reset failed: {err}"),
            },
            None => warn!(
                "reset failed: {}",
                crate::systems::GenError::MissingController(config::RIG_ROOT_NAME.into())
            ),
        }
    }
}

fn handle_clear(mut events: EventReader<ClearRigEvent>, mut state: ResMut<RigState>) {
    for _event in events.read() {
        let state = &mut *state;
        match state.handles.take() {
            Some(handles) => match hierarchy::clear(&mut state.graph, &handles) {
                Ok(count) => {
                    state.placement = None;
                    info!("render setup cleared, {count} objects removed");
                }
                Err(err) => {
                    warn!("clear failed: {err}");
                    state.handles = Some(handles);
                }
            },
            None => warn!(
                "clear failed: {}",
                crate::systems::GenError::MissingController(config::RIG_ROOT_NAME.into())
            ),
        }
    }
}

// rebuild the entity mirror whenever the rig model changed
fn sync_rig_entities(
    mut commands: Commands,
    state: Res<RigState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    anchors: Query<Entity, With<RigAnchor>>,
) {
    if !state.is_changed() {
        return;
    }
    for anchor in anchors.iter() {
        commands.entity(anchor).try_despawn();
    }
    let (Some(handles), Some(rig)) = (&state.handles, &state.placement) else {
        return;
    };
    if !state.graph.contains(handles.root) {
        return;
    }

    let anchor = commands
        .spawn((
            RigAnchor,
            Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            Visibility::Visible,
        ))
        .id();
    spawn_node(
        &mut commands,
        &mut meshes,
        &mut materials,
        &state.graph,
        rig,
        handles.root,
        anchor,
    );
}

fn spawn_node(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    graph: &SceneGraph,
    rig: &RigPlacement,
    id: NodeId,
    parent: Entity,
) {
    let Some(node) = graph.get(id) else { return };

    let mut entity = commands.spawn((node.local(), Visibility::Visible));
    match node.kind {
        NodeKind::Empty => {}
        NodeKind::Camera => {
            // the rig camera is an inspectable object, the viewport camera
            // stays in charge of the window
            entity.insert((
                Camera3d::default(),
                Camera {
                    is_active: false,
                    order: -1,
                    ..default()
                },
            ));
        }
        NodeKind::AreaLight => {
            let energy = match node.name.as_str() {
                config::KEY_LIGHT_NAME => rig.key.energy,
                config::FILL_LIGHT_NAME => rig.fill.energy,
                config::BACK_LIGHT_NAME => rig.back.energy,
                _ => None,
            };
            entity.insert(PointLight {
                intensity: energy.unwrap_or(PointLight::default().intensity),
                range: 10.0 * rig.cam_dist,
                shadows_enabled: false,
                ..default()
            });
        }
        NodeKind::CurveProxy => {
            // circle the user can grab, unit size so the node scale shows
            // the controller's effective distance
            let mesh = meshes.add(Torus {
                minor_radius: 0.02,
                major_radius: 1.0,
            });
            let material = materials.add(StandardMaterial {
                base_color: Color::srgba(0.9, 0.6, 0.1, 0.6),
                unlit: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            });
            entity.insert((Mesh3d(mesh), MeshMaterial3d(material)));
        }
        NodeKind::Backdrop => {
            let mesh = meshes.add(mesh_gen::backdrop_mesh(&rig.backdrop));
            let material = materials.add(StandardMaterial {
                base_color: Color::srgb(0.92, 0.92, 0.92),
                perceptual_roughness: 1.0,
                ..default()
            });
            entity.insert((Mesh3d(mesh), MeshMaterial3d(material)));
        }
    }

    let spawned = entity.id();
    commands.entity(parent).add_children(&[spawned]);
    for &child in node.children() {
        spawn_node(commands, meshes, materials, graph, rig, child, spawned);
    }
}
