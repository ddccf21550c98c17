/// Edge length of one cubic cell, in world units (metres in the demo).
///
/// FP32 ULP at 2048.0 is 0.000244, which sets [`TYPICAL_PRECISION`].
pub const CELL_SIZE: f32 = 2048.0;

/// `CELL_SIZE` widened once, so every double-precision product uses the same value.
pub(crate) const CELL_SIZE_F64: f64 = CELL_SIZE as f64;

/// Smallest supported absolute coordinate on any axis (~ -4.398e12, about -29.3 AU).
pub const MIN_COORDINATE: f64 = i32::MIN as f64 * CELL_SIZE_F64;

/// Largest supported absolute coordinate on any axis (~ +4.398e12, about +29.3 AU).
pub const MAX_COORDINATE: f64 = i32::MAX as f64 * CELL_SIZE_F64;

/// FP32 ULP at `CELL_SIZE`: the precision of a local offset in the normal range.
pub const TYPICAL_PRECISION: f32 = 0.000244;

/// FP32 ULP at `3 * CELL_SIZE`: worst case for any local-offset computation.
pub const MIN_PRECISION: f32 = 0.000488;

/// One astronomical unit in metres. Only a unit-conversion convenience.
pub const AU_DISTANCE: f64 = 149_597_870_700.0;

/// Offsets up to this magnitude keep their reference cell when updated relatively.
///
/// The natural cell boundary is `CELL_SIZE / 2`; the extra quarter cell is the dead zone.
pub const HYSTERESIS_THRESHOLD: f32 = CELL_SIZE * 0.75;

/// Largest relative offset that still converts with single-precision fidelity.
pub const MAX_RELATIVE_OFFSET: f32 = CELL_SIZE * 3.0;

/// Cells further apart than this on any axis can never hold equal positions.
pub const MAX_CELL_SEPARATION: i64 = 3;

/// Absolute tolerance used when comparing two positions, in local-offset units.
pub const POSITION_TOLERANCE: f32 = 1e-6;

/// Per-axis tolerance of `Float3` equality.
pub const FLOAT3_TOLERANCE: f32 = 1e-6;

/// Per-axis tolerance of `Double3` equality.
pub const DOUBLE3_TOLERANCE: f64 = 1e-15;

/// Position key format version
pub const KEY_VERSION: u8 = 1;

/// Encoded length of a position key before Base64: version, 3 x i32, 3 x f32, checksum.
pub(crate) const KEY_BYTES: usize = 26;
