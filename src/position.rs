use crate::coord::Coordinate3;
use crate::core::constants::{
    HYSTERESIS_THRESHOLD, MAX_CELL_SEPARATION, MAX_RELATIVE_OFFSET, POSITION_TOLERANCE,
};
use crate::core::{Double3, Float3, Int3};
use crate::error::LargePosError;
use crate::index::{
    cell_separation, cell_to_world, check_offset, decode_position_key, encode_position_key,
    rebase_offset, world_to_cell,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// A point in a vast 3D space, stored as an integer cell plus a single-precision offset.
///
/// Each cell is a cube of `CELL_SIZE` (2048 units) centered on `global * CELL_SIZE`.
/// The authoritative absolute location is `global * CELL_SIZE + local`, evaluated in
/// double precision. A point has many valid `(global, local)` pairs: relative updates keep
/// their reference cell until an offset passes `0.75 * CELL_SIZE`, so `local` may grow to
/// `CELL_SIZE` before the position is re-homed.
///
/// Precision stays at the FP32 ULP of the local offset (0.000244 typical, 0.000488 worst
/// case) anywhere in the supported +/-29.3 AU range.
///
/// # Example
///
/// ```
/// use largepos_rs::{AU_DISTANCE, Double3, Float3, LargePosition};
///
/// let ship = LargePosition::from_double3(Double3::new(29.0 * AU_DISTANCE, 0.0, 0.0));
///
/// // Move 10 units along x relative to the ship's own cell.
/// let mut moved = ship;
/// moved.set_from_float3(ship.global, ship.local + Float3::new(10.0, 0.0, 0.0));
///
/// let delta = moved.to_double3().x - ship.to_double3().x;
/// assert!((delta - 10.0).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LargePosition {
    /// Index of the owning cell
    pub global: Int3,
    /// Offset from the owning cell's center
    pub local: Float3,
}

impl LargePosition {
    /// Stores `(global, local)` verbatim, with no hysteresis and no validation.
    pub const fn from_raw_parts(global: Int3, local: Float3) -> Self {
        Self { global, local }
    }

    /// Stores `(global, local)` verbatim after checking `local` is finite and within
    /// `3 * CELL_SIZE` on every axis.
    pub fn try_from_raw_parts(global: Int3, local: Float3) -> Result<Self, LargePosError> {
        check_offset(local, MAX_RELATIVE_OFFSET, large_movement)?;
        Ok(Self::from_raw_parts(global, local))
    }

    /// Creates a position from a cell index and an offset relative to that cell.
    ///
    /// The hysteresis rule of [`set_from_float3`](Self::set_from_float3) applies, so an
    /// offset beyond `0.75 * CELL_SIZE` is re-homed to the nearest cell.
    ///
    /// # Panics
    ///
    /// If any axis of `local` exceeds `3 * CELL_SIZE`, or the re-homed point falls outside
    /// the supported range.
    ///
    /// # Example
    /// ```
    /// use largepos_rs::{Float3, Int3, LargePosition};
    ///
    /// let kept = LargePosition::new(Int3::new(1, 2, 3), Float3::new(100.0, 200.0, 300.0));
    /// assert_eq!(kept.global, Int3::new(1, 2, 3));
    ///
    /// let rehomed = LargePosition::new(Int3::ZERO, Float3::new(2100.0, 0.0, 0.0));
    /// assert_eq!(rehomed.global, Int3::new(1, 0, 0));
    /// assert_eq!(rehomed.local, Float3::new(52.0, 0.0, 0.0));
    /// ```
    #[track_caller]
    pub fn new(global: Int3, local: Float3) -> Self {
        fail_fast(Self::try_new(global, local))
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(global: Int3, local: Float3) -> Result<Self, LargePosError> {
        let mut position = Self::default();
        position.try_set_from_float3(global, local)?;
        Ok(position)
    }

    /// Creates a position from absolute world coordinates.
    ///
    /// Picks the nearest cell center per axis (ties round away from zero), so the
    /// resulting local offset is at most `CELL_SIZE / 2` on every axis.
    ///
    /// # Panics
    ///
    /// If any axis lies outside `[MIN_COORDINATE, MAX_COORDINATE]` or is NaN.
    #[track_caller]
    pub fn from_double3(world: Double3) -> Self {
        fail_fast(Self::try_from_double3(world))
    }

    /// Fallible form of [`from_double3`](Self::from_double3).
    pub fn try_from_double3(world: Double3) -> Result<Self, LargePosError> {
        Self::from_world(&world)
    }

    /// Creates a position from any absolute coordinate type.
    ///
    /// # Example
    /// ```
    /// use largepos_rs::{Int3, LargePosition};
    ///
    /// # fn main() -> Result<(), largepos_rs::LargePosError> {
    /// let from_tuple = LargePosition::from_world(&(2500.0, 0.0, 0.0))?;
    /// let from_array = LargePosition::from_world(&[2500.0, 0.0, 0.0])?;
    /// assert_eq!(from_tuple.global, Int3::new(1, 0, 0));
    /// assert_eq!(from_tuple, from_array);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_world(coord: &impl Coordinate3) -> Result<Self, LargePosError> {
        let global = world_to_cell(coord)?;
        let center = cell_to_world(global);

        // Subtract in double precision, narrow only for the store
        let local = Float3::new(
            (coord.x() - center.x) as f32,
            (coord.y() - center.y) as f32,
            (coord.z() - center.z) as f32,
        );

        Ok(Self { global, local })
    }

    /// Absolute world coordinates, `global * CELL_SIZE + local` in double precision.
    pub fn to_double3(&self) -> Double3 {
        let center = cell_to_world(self.global);
        Double3::new(
            center.x + self.local.x as f64,
            center.y + self.local.y as f64,
            center.z + self.local.z as f64,
        )
    }

    /// Absolute coordinates of the owning cell's center.
    pub fn cell_center(&self) -> Double3 {
        cell_to_world(self.global)
    }

    /// This position as an offset from the center of cell `origin`, in single precision.
    ///
    /// # Panics
    ///
    /// If the result exceeds `3 * CELL_SIZE` on any axis: `origin` is too far away to
    /// hold this position with single-precision fidelity.
    #[track_caller]
    pub fn to_float3(&self, origin: Int3) -> Float3 {
        fail_fast(self.try_to_float3(origin))
    }

    /// Fallible form of [`to_float3`](Self::to_float3).
    pub fn try_to_float3(&self, origin: Int3) -> Result<Float3, LargePosError> {
        let relative = rebase_offset(self.local, self.global, origin);
        check_offset(relative, MAX_RELATIVE_OFFSET, |axis, value| {
            LargePosError::Unrepresentable { axis, value }
        })?;
        Ok(relative)
    }

    /// Updates this position from an offset relative to the center of cell `origin`.
    ///
    /// If every axis of `local` is within `0.75 * CELL_SIZE` (inclusive), `origin`
    /// becomes the owning cell and `local` is stored as given. Otherwise the absolute
    /// point `origin * CELL_SIZE + local` is rebuilt in double precision and snapped to
    /// its nearest cell, which leaves it well inside the new cell's retention zone.
    ///
    /// # Panics
    ///
    /// If any axis of `local` exceeds `3 * CELL_SIZE`. Larger moves must go through
    /// [`to_double3`](Self::to_double3) and [`from_double3`](Self::from_double3).
    #[track_caller]
    pub fn set_from_float3(&mut self, origin: Int3, local: Float3) {
        fail_fast(self.try_set_from_float3(origin, local))
    }

    /// Fallible form of [`set_from_float3`](Self::set_from_float3).
    ///
    /// On error the position is left unchanged.
    pub fn try_set_from_float3(&mut self, origin: Int3, local: Float3) -> Result<(), LargePosError> {
        check_offset(local, MAX_RELATIVE_OFFSET, large_movement)?;

        if local.within(HYSTERESIS_THRESHOLD) {
            self.global = origin;
            self.local = local;
            return Ok(());
        }

        let center = cell_to_world(origin);
        let world = Double3::new(
            center.x + local.x as f64,
            center.y + local.y as f64,
            center.z + local.z as f64,
        );
        let rehomed = Self::from_world(&world)?;

        trace!(from = %origin, to = %rehomed.global, "cell reassigned");
        *self = rehomed;
        Ok(())
    }

    /// Encodes the exact representation as a URL-safe key (see [`encode_position_key`]).
    pub fn to_key(&self) -> String {
        encode_position_key(self)
    }

    /// Decodes a key produced by [`to_key`](Self::to_key).
    pub fn from_key(key: &str) -> Result<Self, LargePosError> {
        decode_position_key(key)
    }
}

/// Positions are equal when they denote the same absolute point within
/// `POSITION_TOLERANCE`, whatever their representation.
///
/// Cells more than 3 apart on any axis are unequal without further work. Otherwise `other`
/// is expressed relative to `self.global` and the offsets are compared. Not transitive near
/// the tolerance boundary.
impl PartialEq for LargePosition {
    fn eq(&self, other: &Self) -> bool {
        let separation = cell_separation(self.global, other.global);
        if separation.iter().any(|d| d.abs() > MAX_CELL_SEPARATION) {
            return false;
        }

        let other_local = rebase_offset(other.local, other.global, self.global);
        self.local.approx_eq(&other_local, POSITION_TOLERANCE)
    }
}

impl fmt::Display for LargePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {} + {}", self.global, self.local)
    }
}

/// Converts absolute coordinates to positions in parallel.
///
/// Fails with the first out-of-range coordinate encountered.
pub fn positions_from_world(world: &[Double3]) -> Result<Vec<LargePosition>, LargePosError> {
    world.par_iter().map(LargePosition::from_world).collect()
}

/// Converts positions to absolute coordinates in parallel.
pub fn positions_to_world(positions: &[LargePosition]) -> Vec<Double3> {
    positions.par_iter().map(LargePosition::to_double3).collect()
}

fn large_movement(axis: crate::core::Axis, value: f32) -> LargePosError {
    LargePosError::LargeMovement { axis, value }
}

#[track_caller]
fn fail_fast<T>(result: Result<T, LargePosError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
