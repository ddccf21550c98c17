use crate::core::constants::{DOUBLE3_TOLERANCE, FLOAT3_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// One of the three spatial axes. Used to report which component broke a precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// A cell index: three 32-bit signed integers.
///
/// Arithmetic wraps on overflow. Range validation belongs to whoever produces the values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Int3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Int3 {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component for the given axis.
    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

impl Add for Int3 {
    type Output = Int3;

    fn add(self, rhs: Int3) -> Int3 {
        Int3::new(
            self.x.wrapping_add(rhs.x),
            self.y.wrapping_add(rhs.y),
            self.z.wrapping_add(rhs.z),
        )
    }
}

impl Sub for Int3 {
    type Output = Int3;

    fn sub(self, rhs: Int3) -> Int3 {
        Int3::new(
            self.x.wrapping_sub(rhs.x),
            self.y.wrapping_sub(rhs.y),
            self.z.wrapping_sub(rhs.z),
        )
    }
}

impl Mul<i32> for Int3 {
    type Output = Int3;

    fn mul(self, scalar: i32) -> Int3 {
        Int3::new(
            self.x.wrapping_mul(scalar),
            self.y.wrapping_mul(scalar),
            self.z.wrapping_mul(scalar),
        )
    }
}

impl From<[i32; 3]> for Int3 {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Int3> for [i32; 3] {
    fn from(v: Int3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl fmt::Display for Int3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A single-precision triple, used for local offsets.
///
/// `==` is approximate: components must differ by less than [`FLOAT3_TOLERANCE`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Float3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Float3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// True when every component differs by strictly less than `tolerance`.
    pub fn approx_eq(&self, other: &Float3, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.z - other.z).abs() < tolerance
    }

    /// True when every component magnitude is `<= limit`. NaN never passes.
    pub fn within(&self, limit: f32) -> bool {
        self.x.abs() <= limit && self.y.abs() <= limit && self.z.abs() <= limit
    }
}

impl PartialEq for Float3 {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, FLOAT3_TOLERANCE)
    }
}

impl Add for Float3 {
    type Output = Float3;

    fn add(self, rhs: Float3) -> Float3 {
        Float3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Float3 {
    type Output = Float3;

    fn sub(self, rhs: Float3) -> Float3 {
        Float3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Float3 {
    type Output = Float3;

    fn mul(self, scalar: f32) -> Float3 {
        Float3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f32> for Float3 {
    type Output = Float3;

    fn div(self, scalar: f32) -> Float3 {
        Float3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl From<[f32; 3]> for Float3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Float3> for [f32; 3] {
    fn from(v: Float3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl fmt::Display for Float3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// A double-precision triple, used for absolute world coordinates.
///
/// `==` is approximate: components must differ by less than [`DOUBLE3_TOLERANCE`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Double3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Double3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// True when every component differs by strictly less than `tolerance`.
    pub fn approx_eq(&self, other: &Double3, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.z - other.z).abs() < tolerance
    }
}

impl PartialEq for Double3 {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DOUBLE3_TOLERANCE)
    }
}

impl Add for Double3 {
    type Output = Double3;

    fn add(self, rhs: Double3) -> Double3 {
        Double3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Double3 {
    type Output = Double3;

    fn sub(self, rhs: Double3) -> Double3 {
        Double3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Double3 {
    type Output = Double3;

    fn mul(self, scalar: f64) -> Double3 {
        Double3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f64> for Double3 {
    type Output = Double3;

    fn div(self, scalar: f64) -> Double3 {
        Double3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl From<[f64; 3]> for Double3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Double3> for [f64; 3] {
    fn from(v: Double3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl fmt::Display for Double3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}
