// spike pattern generator
// every face of the subject mesh is pushed out along its own normal and
// collapsed to a single apex, turning the surface into a field of spikes

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;

use crate::config;
use crate::systems::rig::Subject;

#[derive(Event)]
pub struct SpikePatternEvent;

pub struct PatternPlugin;

impl Plugin for PatternPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SpikePatternEvent>()
            .add_systems(Update, handle_spike);
    }
}

// triangles of an indexed TriangleList mesh, resolved to corner positions
pub fn mesh_triangles(mesh: &Mesh) -> Option<Vec<[Vec3; 3]>> {
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };
    let indices: Vec<usize> = mesh.indices()?.iter().collect();
    Some(
        indices
            .chunks_exact(3)
            .map(|tri| {
                [
                    Vec3::from_array(positions[tri[0]]),
                    Vec3::from_array(positions[tri[1]]),
                    Vec3::from_array(positions[tri[2]]),
                ]
            })
            .collect(),
    )
}

// each face grows into a pyramid: the apex sits at the face centroid pushed
// out by `length` along the face normal, and the face itself is replaced by
// its three side walls
pub fn spike_mesh(faces: &[[Vec3; 3]], length: f32) -> Mesh {
    let mut positions = Vec::with_capacity(faces.len() * 9);
    let mut normals = Vec::with_capacity(faces.len() * 9);
    let mut uvs = Vec::with_capacity(faces.len() * 9);
    let mut indices = Vec::with_capacity(faces.len() * 9);

    for face in faces {
        let face_normal = (face[1] - face[0])
            .cross(face[2] - face[0])
            .normalize_or_zero();
        let apex = (face[0] + face[1] + face[2]) / 3.0 + face_normal * length;

        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let normal = (b - a).cross(apex - a).normalize_or_zero();
            let base = positions.len() as u32;
            for corner in [a, b, apex] {
                positions.push([corner.x, corner.y, corner.z]);
                normals.push([normal.x, normal.y, normal.z]);
            }
            uvs.extend([[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]);
            indices.extend([base, base + 1, base + 2]);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

// swap the subject's mesh for its spiked version; running it again spikes
// the spikes, exactly like re-running the tool on the active object
fn handle_spike(
    mut events: EventReader<SpikePatternEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut subject: Query<&mut Mesh3d, With<Subject>>,
) {
    for _event in events.read() {
        let Ok(mut mesh3d) = subject.single_mut() else {
            warn!("spike pattern needs exactly one subject mesh");
            continue;
        };
        let Some(faces) = meshes.get(&mesh3d.0).and_then(mesh_triangles) else {
            warn!("subject mesh has no triangles to spike");
            continue;
        };
        let spiked = spike_mesh(&faces, config::SPIKE_LENGTH);
        info!("spike pattern applied, {} faces grew spikes", faces.len());
        mesh3d.0 = meshes.add(spiked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::layout::BuildingVolume;
    use crate::systems::city::mesh_gen::building_mesh;

    fn positions(mesh: &Mesh) -> Vec<Vec3> {
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        positions.iter().map(|p| Vec3::from_array(*p)).collect()
    }

    // counter-clockwise in the XY plane, normal +Z
    fn flat_triangle() -> [Vec3; 3] {
        [Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)]
    }

    #[test]
    fn one_face_becomes_a_three_sided_pyramid() {
        let mesh = spike_mesh(&[flat_triangle()], 0.5);
        assert_eq!(mesh.count_vertices(), 9);

        // apex at the centroid, pushed along the face normal
        let apex = Vec3::new(1.0, 1.0, 0.5);
        let positions = positions(&mesh);
        assert_eq!(
            positions.iter().filter(|p| (**p - apex).length() < 1e-6).count(),
            3
        );
        // every other vertex stays on the original rim
        assert!(
            positions
                .iter()
                .filter(|p| p.z.abs() < 1e-6)
                .all(|p| flat_triangle().contains(p))
        );
    }

    #[test]
    fn every_building_face_grows_a_spike() {
        let mesh = building_mesh(&BuildingVolume {
            footprint: 4.0,
            height: 10.0,
            tier: None,
        });
        let faces = mesh_triangles(&mesh).unwrap();
        assert_eq!(faces.len(), 12);

        let spiked = spike_mesh(&faces, 0.1);
        assert_eq!(spiked.count_vertices(), 12 * 9);

        // roof spikes poke past the roof plane
        let max_y = positions(&spiked)
            .iter()
            .map(|p| p.y)
            .fold(f32::MIN, f32::max);
        assert!((max_y - 10.1).abs() < 1e-4);
    }

    #[test]
    fn respiking_multiplies_the_faces_again() {
        let spiked = spike_mesh(&[flat_triangle()], 0.5);
        let faces = mesh_triangles(&spiked).unwrap();
        assert_eq!(faces.len(), 3);
        assert_eq!(spike_mesh(&faces, 0.5).count_vertices(), 27);
    }
}
