//! # largepos-rs
//!
//! Millimetre-scale positions across tens of astronomical units, with single-precision
//! math everywhere except the rare absolute conversion.
//!
//! A [`LargePosition`] is an integer cell index ([`Int3`]) plus an `f32` offset
//! ([`Float3`]) from the center of a 2048-unit cell. There are currently three main
//! entry points.
//!
//! ### 1. `LargePosition` - Single Position Operations
//!
//! ```
//! use largepos_rs::{AU_DISTANCE, Double3, LargePosition};
//!
//! let pos = LargePosition::from_double3(Double3::new(29.0 * AU_DISTANCE, 0.0, -512.25));
//! println!("{} -> {}", pos, pos.to_double3());
//!
//! // Offset from another cell, ready for f32 physics or rendering
//! let camera = pos.global;
//! let relative = pos.to_float3(camera);
//! assert_eq!(relative, pos.local);
//! ```
//!
//! ### 2. Relative Movement with Hysteresis
//!
//! ```
//! use largepos_rs::{Float3, Int3, LargePosition};
//!
//! let mut pos = LargePosition::default();
//!
//! // Within 0.75 * CELL_SIZE the cell is kept
//! pos.set_from_float3(pos.global, Float3::new(1500.0, 0.0, 0.0));
//! assert_eq!(pos.global, Int3::ZERO);
//!
//! // Past it the position is re-homed to the nearest cell
//! pos.set_from_float3(pos.global, Float3::new(1600.0, 0.0, 0.0));
//! assert_eq!(pos.global, Int3::new(1, 0, 0));
//!
//! // Moves beyond 3 * CELL_SIZE must go through absolute coordinates
//! assert!(pos.try_set_from_float3(pos.global, Float3::new(10_000.0, 0.0, 0.0)).is_err());
//! ```
//!
//! ### 3. `CsvToPositions` - CSV File Conversion
//!
//! Convert CSV files with absolute x/y/z columns to position-indexed CSVs:
//!
//! ```no_run
//! use largepos_rs::{CsvPositionConfig, CsvToPositions, PositionFormat};
//!
//! let config = CsvPositionConfig::from_world("x", "y", "z")
//!     .exclude(vec!["notes".into()])
//!     .output(PositionFormat::Key);
//!
//! // Using trait method
//! "bodies.csv".to_position_csv("positions.csv", &config).unwrap();
//! ```
//!
//! Positions also convert to Arrow record batches and Parquet files through
//! [`PositionsToArrow`] and [`PositionsToParquet`].
//!

pub mod coord;
pub mod core;
pub mod error;
pub mod index;
pub mod io;
pub mod position;

pub use coord::Coordinate3;
pub use core::{
    AU_DISTANCE, Axis, CELL_SIZE, DOUBLE3_TOLERANCE, Double3, FLOAT3_TOLERANCE, Float3,
    HYSTERESIS_THRESHOLD, Int3, KEY_VERSION, MAX_CELL_SEPARATION, MAX_COORDINATE,
    MAX_RELATIVE_OFFSET, MIN_COORDINATE, MIN_PRECISION, POSITION_TOLERANCE, TYPICAL_PRECISION,
};
pub use error::LargePosError;
pub use index::{
    cell_separation, cell_to_world, decode_position_key, encode_position_key, world_to_cell,
};
pub use io::{
    CsvPositionConfig, CsvToPositions, PositionFormat, PositionSource, PositionsToArrow,
    PositionsToParquet, csv_to_position_csv, parse_position, parse_position_json,
    parse_world_value, positions_from_record_batch, read_parquet, write_parquet,
};
pub use position::{LargePosition, positions_from_world, positions_to_world};

pub use arrow_array;
pub use parquet;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_workflow() -> Result<(), LargePosError> {
        let far = 29.0 * AU_DISTANCE;
        let ship = LargePosition::from_world(&(far, -far / 2.0, 1.0e9))?;

        // Fly 1 km per step along x in the ship's frame
        let mut current = ship;
        for _ in 0..50 {
            let next = current.to_float3(current.global) + Float3::new(1000.0, 0.0, 0.0);
            current.try_set_from_float3(current.global, next)?;
            assert!(current.local.within(HYSTERESIS_THRESHOLD));
        }

        let flown = current.to_double3().x - ship.to_double3().x;
        assert!((flown - 50_000.0).abs() < 0.05);

        let key = current.to_key();
        let restored = parse_position(&key)?;
        assert_eq!(restored, current);

        let batch = vec![ship, current].to_record_batch()?;
        let back = positions_from_record_batch(&batch)?;
        assert_eq!(back[1].global, current.global);
        Ok(())
    }

    #[test]
    fn test_camera_relative_rendering() -> Result<(), LargePosError> {
        let camera = LargePosition::from_double3(Double3::new(12.0 * AU_DISTANCE, 0.0, 0.0));
        let bodies = positions_from_world(&[
            Double3::new(12.0 * AU_DISTANCE + 150.0, 20.0, -3.5),
            Double3::new(12.0 * AU_DISTANCE - 4000.0, 0.0, 0.0),
            Double3::new(-12.0 * AU_DISTANCE, 0.0, 0.0),
        ])?;

        let visible: Vec<Float3> = bodies
            .iter()
            .filter_map(|b| b.try_to_float3(camera.global).ok())
            .collect();
        assert_eq!(visible.len(), 2);

        // Offsets are taken from the camera's cell center, not the camera itself
        let expected = Double3::new(150.0 + camera.local.x as f64, 20.0, -3.5);
        assert!((visible[0].x as f64 - expected.x).abs() < 1e-3);
        assert!((visible[0].y as f64 - expected.y).abs() < 1e-3);
        Ok(())
    }

    #[test]
    fn test_world_to_cell_agrees_with_constructor() -> Result<(), LargePosError> {
        let world = [123_456_789.5, -987_654.25, 0.0];
        let pos = LargePosition::from_world(&world)?;
        assert_eq!(world_to_cell(&world)?, pos.global);

        let center = cell_to_world(pos.global);
        assert_eq!(center, pos.cell_center());
        Ok(())
    }
}
