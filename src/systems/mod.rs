use thiserror::Error;

pub mod city;
pub mod grid;
pub mod pattern;
pub mod rig;
pub mod ui;

// shared error type for both generation pipelines
// every variant is surfaced synchronously to the caller, nothing is retried
#[derive(Debug, Error, PartialEq)]
pub enum GenError {
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("a render rig named \"{0}\" already exists in the scene")]
    DuplicateRig(String),

    #[error("subject bounding box has zero extent, nothing to frame")]
    DegenerateGeometry,

    #[error("rig node \"{0}\" is missing from the scene")]
    MissingController(String),

    #[error("transform channels on \"{0}\" are locked")]
    LockedChannels(String),

    #[error("cannot parent \"{0}\" under its own subtree")]
    CyclicParent(String),
}
