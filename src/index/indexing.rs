use crate::coord::Coordinate3;
use crate::core::constants::{CELL_SIZE, CELL_SIZE_F64, MAX_COORDINATE, MIN_COORDINATE};
use crate::core::{Axis, Double3, Float3, Int3};
use crate::error::LargePosError;

/// Converts an absolute coordinate to the index of the nearest cell.
///
/// Each axis is rounded half away from zero, so a point exactly on a half-cell
/// boundary belongs to the cell further from the origin (`1024.0` -> cell `1`,
/// `-1024.0` -> cell `-1`).
///
/// # Errors
///
/// [`LargePosError::OutOfRange`] if any axis lies outside
/// `[MIN_COORDINATE, MAX_COORDINATE]` or is NaN.
///
/// # Example
/// ```
/// use largepos_rs::{Int3, world_to_cell};
///
/// # fn main() -> Result<(), largepos_rs::LargePosError> {
/// let cell = world_to_cell(&(1000.0, 2000.0, -2500.0))?;
/// assert_eq!(cell, Int3::new(0, 1, -1));
/// # Ok(())
/// # }
/// ```
pub fn world_to_cell<C: Coordinate3>(coord: &C) -> Result<Int3, LargePosError> {
    check_world_range(coord)?;

    Ok(Int3::new(
        nearest_cell(coord.x()),
        nearest_cell(coord.y()),
        nearest_cell(coord.z()),
    ))
}

/// Returns the absolute coordinate of a cell's center, computed in double precision.
pub fn cell_to_world(cell: Int3) -> Double3 {
    Double3::new(
        cell.x as f64 * CELL_SIZE_F64,
        cell.y as f64 * CELL_SIZE_F64,
        cell.z as f64 * CELL_SIZE_F64,
    )
}

/// Per-axis distance `a - b` in cells.
///
/// Computed in 64 bits: `i32::MAX - i32::MIN` does not fit in an `i32`.
pub fn cell_separation(a: Int3, b: Int3) -> [i64; 3] {
    [
        a.x as i64 - b.x as i64,
        a.y as i64 - b.y as i64,
        a.z as i64 - b.z as i64,
    ]
}

/// Offset of `local` (relative to cell `from`) re-expressed relative to cell `to`.
///
/// Single precision, no bounds check. Callers decide whether the result is usable.
pub(crate) fn rebase_offset(local: Float3, from: Int3, to: Int3) -> Float3 {
    let [dx, dy, dz] = cell_separation(from, to);
    Float3::new(
        local.x + dx as f32 * CELL_SIZE,
        local.y + dy as f32 * CELL_SIZE,
        local.z + dz as f32 * CELL_SIZE,
    )
}

fn check_world_range<C: Coordinate3>(coord: &C) -> Result<(), LargePosError> {
    for axis in Axis::ALL {
        let value = coord.axis(axis);
        if !(MIN_COORDINATE..=MAX_COORDINATE).contains(&value) {
            return Err(LargePosError::OutOfRange { axis, value });
        }
    }
    Ok(())
}

/// Checks every axis of `offset` against `limit`, building the error with `make_err`.
pub(crate) fn check_offset(
    offset: Float3,
    limit: f32,
    make_err: fn(Axis, f32) -> LargePosError,
) -> Result<(), LargePosError> {
    for axis in Axis::ALL {
        let value = offset.get(axis);
        if !(value.abs() <= limit) {
            return Err(make_err(axis, value));
        }
    }
    Ok(())
}

fn nearest_cell(value: f64) -> i32 {
    // In range by the caller's check: |value / CELL_SIZE| <= i32::MAX
    (value / CELL_SIZE_F64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_cell_and_back() -> Result<(), LargePosError> {
        let cell = world_to_cell(&(1000.0, 2000.0, 3000.0))?;
        assert_eq!(cell, Int3::new(0, 1, 1));

        let center = cell_to_world(cell);
        assert_eq!(center, Double3::new(0.0, 2048.0, 2048.0));
        Ok(())
    }

    #[test]
    fn test_half_cell_ties_round_away_from_zero() -> Result<(), LargePosError> {
        assert_eq!(world_to_cell(&(1024.0, 1024.0, 1024.0))?, Int3::new(1, 1, 1));
        assert_eq!(
            world_to_cell(&(-1024.0, -1024.0, -1024.0))?,
            Int3::new(-1, -1, -1)
        );
        assert_eq!(world_to_cell(&(3072.0, -3072.0, 0.0))?, Int3::new(2, -2, 0));
        assert_eq!(world_to_cell(&(1023.999, -1023.999, 0.0))?, Int3::ZERO);
        Ok(())
    }

    #[test]
    fn test_range_limits() -> Result<(), LargePosError> {
        let max = world_to_cell(&(MAX_COORDINATE, MAX_COORDINATE, MAX_COORDINATE))?;
        assert_eq!(max, Int3::new(i32::MAX, i32::MAX, i32::MAX));

        let min = world_to_cell(&(MIN_COORDINATE, MIN_COORDINATE, MIN_COORDINATE))?;
        assert_eq!(min, Int3::new(i32::MIN, i32::MIN, i32::MIN));
        Ok(())
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let result = world_to_cell(&(0.0, MAX_COORDINATE + CELL_SIZE_F64, 0.0));
        assert!(matches!(
            result,
            Err(LargePosError::OutOfRange { axis: Axis::Y, .. })
        ));

        let result = world_to_cell(&(0.0, 0.0, MIN_COORDINATE - CELL_SIZE_F64));
        assert!(matches!(
            result,
            Err(LargePosError::OutOfRange { axis: Axis::Z, .. })
        ));

        let result = world_to_cell(&(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            result,
            Err(LargePosError::OutOfRange { axis: Axis::X, .. })
        ));
    }

    #[test]
    fn test_cell_separation_does_not_overflow() {
        let a = Int3::new(i32::MAX, 0, -5);
        let b = Int3::new(i32::MIN, 0, 5);
        assert_eq!(cell_separation(a, b), [u32::MAX as i64, 0, -10]);
    }

    #[test]
    fn test_rebase_offset() {
        let local = Float3::new(100.0, 200.0, 300.0);
        let rebased = rebase_offset(local, Int3::new(1, 2, -1), Int3::ZERO);
        assert_eq!(rebased, Float3::new(2148.0, 4296.0, -1748.0));
    }

    #[test]
    fn test_check_offset_reports_first_bad_axis() {
        let bad = Float3::new(1.0, 7000.0, -9000.0);
        let err = check_offset(bad, CELL_SIZE * 3.0, |axis, value| {
            LargePosError::LargeMovement { axis, value }
        });
        assert_eq!(
            err,
            Err(LargePosError::LargeMovement {
                axis: Axis::Y,
                value: 7000.0
            })
        );
    }
}
