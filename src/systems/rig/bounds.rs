// world-space axis-aligned bounding box of a mesh
// the rig math runs in Z-up modeling space: width spans Y, length spans X,
// height spans Z

use bevy::math::{Affine3A, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    // min/max are seeded at zero rather than at the first vertex and only
    // ever widened. A mesh sitting entirely on one side of its origin still
    // reports extents that include the origin. The placement constants were
    // tuned against this rule, do not "fix" it.
    pub fn from_vertices<I>(vertices: I, world: &Affine3A) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        for vertex in vertices {
            let world_pos = world.transform_point3(vertex);
            min = min.min(world_pos);
            max = max.max(world_pos);
        }
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn length(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.z - self.min.z
    }

    // the single scalar driving every rig distance
    pub fn edge(&self) -> f32 {
        self.width().max(self.length()).max(self.height())
    }
}
