use crate::core::{Axis, Double3};

/// Trait for types that can provide absolute x/y/z coordinates.
///
/// Implemented for `(f64, f64, f64)` tuples, `[f64; 3]` arrays and [`Double3`].
/// This allows constructors to accept any of them.
pub trait Coordinate3 {
    /// Returns the x-coordinate.
    fn x(&self) -> f64;
    /// Returns the y-coordinate.
    fn y(&self) -> f64;
    /// Returns the z-coordinate.
    fn z(&self) -> f64;

    /// Returns the coordinate along `axis`.
    fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x(),
            Axis::Y => self.y(),
            Axis::Z => self.z(),
        }
    }

    /// Copies the coordinate into a [`Double3`].
    fn to_double3(&self) -> Double3 {
        Double3::new(self.x(), self.y(), self.z())
    }
}

impl Coordinate3 for (f64, f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
    fn z(&self) -> f64 {
        self.2
    }
}

impl Coordinate3 for [f64; 3] {
    fn x(&self) -> f64 {
        self[0]
    }
    fn y(&self) -> f64 {
        self[1]
    }
    fn z(&self) -> f64 {
        self[2]
    }
}

impl Coordinate3 for Double3 {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn z(&self) -> f64 {
        self.z
    }
    fn axis(&self, axis: Axis) -> f64 {
        self.get(axis)
    }
}
