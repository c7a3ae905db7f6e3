// backdrop mesh: a floor plane whose far edge sweeps up into a back wall,
// joined by a filleted corner so the horizon line disappears in renders
// modeled in rig space (Z up), the rig anchor reorients it for the host

use std::f32::consts::FRAC_PI_2;

use bevy::math::Vec2;
use bevy::prelude::Mesh;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use super::placement::BackdropPlacement;

// cross-section in the XZ plane, swept along Y
// runs from the front floor edge, through the fillet, up the wall
fn profile(backdrop: &BackdropPlacement) -> Vec<(Vec2, Vec2)> {
    let half_w = backdrop.width / 2.0;
    let radius = backdrop.width * backdrop.fillet_pct / 100.0;
    let center = Vec2::new(-half_w + radius, radius);

    let mut points = Vec::with_capacity(backdrop.fillet_segments as usize + 3);
    points.push((Vec2::new(half_w, 0.0), Vec2::new(0.0, 1.0)));

    for segment in 0..=backdrop.fillet_segments {
        let theta = FRAC_PI_2 * segment as f32 / backdrop.fillet_segments as f32;
        let normal = Vec2::new(theta.sin(), theta.cos());
        points.push((center - normal * radius, normal));
    }

    points.push((Vec2::new(-half_w, backdrop.wall_height), Vec2::new(1.0, 0.0)));
    points
}

pub fn backdrop_mesh(backdrop: &BackdropPlacement) -> Mesh {
    let profile = profile(backdrop);
    let half_d = backdrop.depth / 2.0;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for (i, (point, normal)) in profile.iter().enumerate() {
        // the smooth hint keeps the shared fillet normals, otherwise snap
        // them to the nearest face direction
        let normal = if backdrop.smooth {
            *normal
        } else if normal.y >= normal.x {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::new(1.0, 0.0)
        };

        let u = i as f32 / (profile.len() - 1) as f32;
        for (v, y) in [(0.0, -half_d), (1.0, half_d)] {
            positions.push([point.x, y, point.y]);
            normals.push([normal.x, 0.0, normal.y]);
            uvs.push([u, v]);
        }
    }

    for quad in 0..profile.len() as u32 - 1 {
        let a = quad * 2; // near side
        let b = a + 1; // far side
        indices.extend([a, b, b + 2, a, b + 2, a + 2]);
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

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn test_backdrop() -> BackdropPlacement {
        BackdropPlacement {
            width: 20.0,
            depth: 30.0,
            drop: 6.0,
            wall_height: 20.0,
            fillet_pct: 20.0,
            fillet_segments: 10,
            smooth: true,
        }
    }

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        positions.clone()
    }

    #[test]
    fn spans_the_requested_extents() {
        let mesh = backdrop_mesh(&test_backdrop());
        let positions = positions(&mesh);
        let max_x = positions.iter().map(|p| p[0]).fold(f32::MIN, f32::max);
        let min_x = positions.iter().map(|p| p[0]).fold(f32::MAX, f32::min);
        let max_z = positions.iter().map(|p| p[2]).fold(f32::MIN, f32::max);

        assert_eq!(max_x, 10.0);
        assert_eq!(min_x, -10.0);
        assert_eq!(max_z, 20.0); // wall height
    }

    #[test]
    fn two_vertices_per_profile_point() {
        let mesh = backdrop_mesh(&test_backdrop());
        // front edge + 11 fillet points + wall top, near and far side each
        assert_eq!(mesh.count_vertices(), 2 * (1 + 11 + 1));
    }

    #[test]
    fn fillet_joins_floor_and_wall_tangentially() {
        let backdrop = test_backdrop();
        let profile = profile(&backdrop);
        let (first_arc, n0) = profile[1];
        let (last_arc, n1) = profile[profile.len() - 2];
        // radius = 20% of width = 4
        assert!((first_arc - Vec2::new(-6.0, 0.0)).length() < 1e-4);
        assert!((last_arc - Vec2::new(-10.0, 4.0)).length() < 1e-4);
        assert!((n0 - Vec2::new(0.0, 1.0)).length() < 1e-4);
        assert!((n1 - Vec2::new(1.0, 0.0)).length() < 1e-4);
    }
}
