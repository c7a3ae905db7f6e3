// Configuration file. All measurements in host scene units (1 unit = 1 meter)
// This controls the initial generation parameter settings

pub const INITIAL_SEED: u64 = 7405651782035867013;

// City lattice parameters
pub const CITY_SIZE: u32 = 20;           // cells per side, city is CITY_SIZE^2 buildings
pub const FOOTPRINT_MIN: i32 = 3;        // building base size range (integer units)
pub const FOOTPRINT_MAX: i32 = 4;
pub const BUILDING_HEIGHT_MIN: i32 = 5;  // extrusion height range
pub const BUILDING_HEIGHT_MAX: i32 = 15;
pub const STREET_WIDTH: f32 = 1.0;       // gap between lattice cells

// Roof embellishment parameters
pub const TIER_SHRINK: f32 = 0.75;       // roof tier footprint factor
pub const ANTENNA_HEIGHT_DIVISOR: f32 = 7.0;
pub const ANTENNA_SHRINK_DIVISOR: f32 = 10.0;

// Spike pattern parameters
pub const SPIKE_LENGTH: f32 = 0.1;       // face extrusion along the normal

// Rig placement parameters
// edge = largest bounding box extent; every distance below scales from it
pub const CAM_DIST_FACTOR: f32 = 3.0;    // camera distance = factor * edge
pub const CAM_LIFT_DIVISOR: f32 = 3.0;   // camera z offset = height / divisor
pub const CAM_SCALE_DIVISOR: f32 = 2.0;  // camera display scale = edge / divisor

pub const KEY_YAW_DEG: f32 = -45.0;
pub const FILL_YAW_DEG: f32 = 45.0;
pub const BACK_YAW_DEG: f32 = 180.0;
pub const BACK_PITCH_DEG: f32 = -80.0;
pub const FILL_DIST_FACTOR: f32 = 1.5;   // fill distance = factor * cam_dist
pub const BACK_DIST_FACTOR: f32 = 0.75;  // back distance = factor * cam_dist
pub const FILL_ENERGY_FACTOR: f32 = 1.5; // fill energy = factor * key energy
pub const FILL_SCALE_FACTOR: f32 = 3.0;  // fill light scale = factor * edge

// Backdrop parameters
pub const BACKDROP_WIDTH_FACTOR: f32 = 2.0;  // width = factor * edge
pub const BACKDROP_DEPTH_FACTOR: f32 = 3.0;  // depth = factor * edge
pub const BACKDROP_WALL_FACTOR: f32 = 2.0;   // back wall height = factor * edge
pub const BACKDROP_FILLET_PCT: f32 = 20.0;   // fillet radius as % of width
pub const BACKDROP_FILLET_SEGMENTS: u32 = 10;

// Reserved scene names. Rig construction refuses to run while the root exists.
pub const RIG_ROOT_NAME: &str = "Render Rig Root";
pub const CAMERA_NAME: &str = "Main Camera";
pub const BACKDROP_NAME: &str = "Backdrop";
pub const KEY_LIGHT_NAME: &str = "Key Light";
pub const FILL_LIGHT_NAME: &str = "Fill Light";
pub const BACK_LIGHT_NAME: &str = "Back Light";
pub const LOCAL_CTRL_SUFFIX: &str = " Local Controller";
pub const GLOBAL_CTRL_SUFFIX: &str = " Global Controller";
