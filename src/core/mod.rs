pub mod constants;
pub mod vector;

pub use constants::{
    AU_DISTANCE, CELL_SIZE, DOUBLE3_TOLERANCE, FLOAT3_TOLERANCE, HYSTERESIS_THRESHOLD,
    KEY_VERSION, MAX_CELL_SEPARATION, MAX_COORDINATE, MAX_RELATIVE_OFFSET, MIN_COORDINATE,
    MIN_PRECISION, POSITION_TOLERANCE, TYPICAL_PRECISION,
};
pub use vector::{Axis, Double3, Float3, Int3};
