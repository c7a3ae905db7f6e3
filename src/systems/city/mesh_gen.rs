use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::layout::BuildingVolume;

// scratch buffers for one mesh
#[derive(Default)]
struct MeshData {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshData {
    // axis-aligned box between min and max, one quad per face
    fn push_box(&mut self, min: Vec3, max: Vec3) {
        // (normal, four corners counter-clockwise seen from outside)
        let faces = [
            // +X
            (
                Vec3::X,
                [
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(max.x, max.y, min.z),
                    Vec3::new(max.x, max.y, max.z),
                ],
            ),
            // -X
            (
                Vec3::NEG_X,
                [
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(min.x, min.y, max.z),
                    Vec3::new(min.x, max.y, max.z),
                    Vec3::new(min.x, max.y, min.z),
                ],
            ),
            // +Y (top)
            (
                Vec3::Y,
                [
                    Vec3::new(min.x, max.y, max.z),
                    Vec3::new(max.x, max.y, max.z),
                    Vec3::new(max.x, max.y, min.z),
                    Vec3::new(min.x, max.y, min.z),
                ],
            ),
            // -Y (bottom)
            (
                Vec3::NEG_Y,
                [
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(min.x, min.y, max.z),
                ],
            ),
            // +Z
            (
                Vec3::Z,
                [
                    Vec3::new(min.x, min.y, max.z),
                    Vec3::new(max.x, min.y, max.z),
                    Vec3::new(max.x, max.y, max.z),
                    Vec3::new(min.x, max.y, max.z),
                ],
            ),
            // -Z
            (
                Vec3::NEG_Z,
                [
                    Vec3::new(max.x, min.y, min.z),
                    Vec3::new(min.x, min.y, min.z),
                    Vec3::new(min.x, max.y, min.z),
                    Vec3::new(max.x, max.y, min.z),
                ],
            ),
        ];

        for (normal, corners) in faces {
            let base = self.positions.len() as u32;
            for corner in corners {
                self.positions.push([corner.x, corner.y, corner.z]);
                self.normals.push([normal.x, normal.y, normal.z]);
            }
            self.uvs
                .extend([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
            self.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

// realize one building volume: extruded footprint, then the optional
// shrunken roof tier, then the optional antenna spike on top of the tier
// footprint is centered on the local origin, height rises along +Y
pub fn building_mesh(volume: &BuildingVolume) -> Mesh {
    let mut data = MeshData::default();

    let half = volume.footprint / 2.0;
    data.push_box(
        Vec3::new(-half, 0.0, -half),
        Vec3::new(half, volume.height, half),
    );

    if let Some(tier) = volume.tier {
        let tier_half = half * tier.shrink;
        let tier_top = volume.height + tier.height;
        data.push_box(
            Vec3::new(-tier_half, volume.height, -tier_half),
            Vec3::new(tier_half, tier_top, tier_half),
        );

        if let Some(antenna) = tier.antenna {
            let radius = tier_half * antenna.shrink;
            data.push_box(
                Vec3::new(-radius, tier_top, -radius),
                Vec3::new(radius, tier_top + antenna.height, radius),
            );
        }
    }

    data.into_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::layout::{Antenna, RoofTier};
    use bevy::render::mesh::VertexAttributeValues;

    fn max_y(mesh: &Mesh) -> f32 {
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max)
    }

    #[test]
    fn plain_building_is_one_box() {
        let mesh = building_mesh(&BuildingVolume {
            footprint: 4.0,
            height: 10.0,
            tier: None,
        });
        assert_eq!(mesh.count_vertices(), 24);
        assert_eq!(max_y(&mesh), 10.0);
    }

    #[test]
    fn tier_and_antenna_stack_on_top() {
        let mesh = building_mesh(&BuildingVolume {
            footprint: 4.0,
            height: 14.0,
            tier: Some(RoofTier {
                shrink: 0.75,
                height: 0.75,
                antenna: Some(Antenna {
                    shrink: 1.0 / 40.0,
                    height: 2.0,
                }),
            }),
        });
        assert_eq!(mesh.count_vertices(), 72);
        assert_eq!(max_y(&mesh), 14.0 + 0.75 + 2.0);
    }
}
