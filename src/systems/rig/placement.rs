// rig placement solver
// turns one bounding box into camera, backdrop and 3-key light placements,
// every quantity derived from the box's largest extent

use std::f32::consts::FRAC_PI_2;

use crate::config;
use crate::systems::GenError;

use super::bounds::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPlacement {
    pub distance: f32, // along world X
    pub lift: f32,     // along world Z
    pub tilt: f32,     // compensation keeping the subject framed, radians
    pub pitch: f32,    // final pitch = 90 deg - tilt
    pub scale: f32,    // display size of the camera object
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightPlacement {
    pub scale: f32,
    pub distance: f32,
    pub yaw: f32,   // global controller rotation about Z, radians
    pub pitch: f32, // global controller rotation about Y, radians
    // None leaves the host's default light energy untouched
    pub energy: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackdropPlacement {
    pub width: f32,
    pub depth: f32,
    pub drop: f32,        // downward offset from the subject
    pub wall_height: f32, // the far edge sweeps up into a back wall
    pub fillet_pct: f32,  // floor-to-wall fillet, percent of width
    pub fillet_segments: u32,
    pub smooth: bool, // shading hint for the mesh collaborator
}

// the full bundle, immutable once computed
// Reset writes these values back, it never recomputes from geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigPlacement {
    pub edge: f32,
    pub cam_dist: f32,
    pub camera: CameraPlacement,
    pub backdrop: BackdropPlacement,
    pub key: LightPlacement,
    pub fill: LightPlacement,
    pub back: LightPlacement,
}

// a zero-size rig is meaningless, reject before any object creation
pub fn solve(bounds: &BoundingBox) -> Result<RigPlacement, GenError> {
    let edge = bounds.edge();
    if edge <= 0.0 {
        return Err(GenError::DegenerateGeometry);
    }

    let height = bounds.height();
    let cam_dist = config::CAM_DIST_FACTOR * edge;

    // the camera rides up with the subject height, the tilt leans it back
    // down so the subject stays centered in frame at any size
    let lift = height / config::CAM_LIFT_DIVISOR;
    let hypotenuse = (cam_dist * cam_dist + lift * lift).sqrt();
    let tilt = FRAC_PI_2 - (cam_dist / hypotenuse).asin();
    let camera = CameraPlacement {
        distance: cam_dist,
        lift,
        tilt,
        pitch: FRAC_PI_2 - tilt,
        scale: edge / config::CAM_SCALE_DIVISOR,
    };

    let width = config::BACKDROP_WIDTH_FACTOR * edge;
    let backdrop = BackdropPlacement {
        width,
        depth: config::BACKDROP_DEPTH_FACTOR * edge,
        drop: height / 2.0 + height / 10.0,
        wall_height: config::BACKDROP_WALL_FACTOR * edge,
        fillet_pct: config::BACKDROP_FILLET_PCT,
        fillet_segments: config::BACKDROP_FILLET_SEGMENTS,
        smooth: true,
    };

    let key_energy = edge * (config::CAM_DIST_FACTOR * edge).powi(2);
    let key = LightPlacement {
        scale: edge,
        distance: cam_dist,
        yaw: config::KEY_YAW_DEG.to_radians(),
        pitch: 0.0,
        energy: Some(key_energy),
    };

    let fill = LightPlacement {
        scale: config::FILL_SCALE_FACTOR * edge,
        distance: config::FILL_DIST_FACTOR * cam_dist,
        yaw: config::FILL_YAW_DEG.to_radians(),
        pitch: 0.0,
        energy: Some(config::FILL_ENERGY_FACTOR * key_energy),
    };

    // the back light keeps the host default energy
    let back = LightPlacement {
        scale: edge,
        distance: config::BACK_DIST_FACTOR * cam_dist,
        yaw: config::BACK_YAW_DEG.to_radians(),
        pitch: config::BACK_PITCH_DEG.to_radians(),
        energy: None,
    };

    Ok(RigPlacement {
        edge,
        cam_dist,
        camera,
        backdrop,
        key,
        fill,
        back,
    })
}
