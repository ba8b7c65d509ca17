#![warn(missing_docs)]
//! Lens with two spherical (or flat) surfaces
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use super::{check_finite, ElementField};
use crate::{
    error::{OptiResult, OptiSimError},
    ray::ParaxialRay,
};

/// Curvature (= 1/radius) of a surface. A radius of `0.0` or `±inf` denotes a flat surface.
fn curvature(radius: f64) -> f64 {
    if radius == 0.0 || radius.is_infinite() {
        0.0
    } else {
        1.0 / radius
    }
}
/// Paraxial refraction matrix of a single surface with curvature `c` between the media `n1` and `n2`.
fn surface_matrix(n1: f64, n2: f64, c: f64) -> Matrix2<f64> {
    Matrix2::new(1.0, 0.0, -(n2 - n1) * c / n2, n1 / n2)
}

/// A lens with two refracting surfaces separated by the center thickness `d`.
///
/// The lens is surrounded by an ambient medium with a refractive index of 1.0.
///
/// # Curvature convention:
/// - a positive radius places the center of curvature to the right of the surface
/// - a positive `r_left` is a convex (focusing) front surface
/// - a negative `r_right` is a convex (focusing) rear surface
/// - a radius of `0.0` or `±inf` corresponds to a flat surface
///
/// ## Fields
///   - `x` (vertex of the left surface)
///   - `n` (refractive index)
///   - `d` (center thickness)
///   - `r_left`
///   - `r_right`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThickLens {
    x: f64,
    n: f64,
    d: f64,
    r_left: f64,
    r_right: f64,
}
impl ThickLens {
    /// Creates a new [`ThickLens`].
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - `x` or `d` are not finite.
    ///   - the refractive index is <= 0.0, == 1.0 or not finite.
    ///   - the center thickness is <= 0.0.
    ///   - one of the radii is `NaN` or so small that its curvature overflows.
    ///   - the position of the right surface (`x + d`) or the optical power is not finite.
    pub fn new(x: f64, n: f64, d: f64, r_left: f64, r_right: f64) -> OptiResult<Self> {
        let lens = Self {
            x,
            n,
            d,
            r_left,
            r_right,
        };
        lens.validate()?;
        Ok(lens)
    }
    /// Returns the position of the left surface vertex.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the refractive index of the lens material.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }
    /// Returns the center thickness.
    #[must_use]
    pub const fn d(&self) -> f64 {
        self.d
    }
    /// Returns the radius of curvature of the left surface.
    #[must_use]
    pub const fn r_left(&self) -> f64 {
        self.r_left
    }
    /// Returns the radius of curvature of the right surface.
    #[must_use]
    pub const fn r_right(&self) -> f64 {
        self.r_right
    }
    /// Check the constraints of this [`ThickLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the parameters is out of its valid range.
    pub fn validate(&self) -> OptiResult<()> {
        check_finite(self.x, "position x")?;
        check_finite(self.n, "refractive index")?;
        check_finite(self.d, "thickness")?;
        if self.n <= 0.0 {
            return Err(OptiSimError::InvalidParameter(
                "refractive index must be > 0.0".into(),
            ));
        }
        if self.n == 1.0 {
            return Err(OptiSimError::InvalidParameter(
                "refractive index must not be 1.0 (lens has no optical effect)".into(),
            ));
        }
        if self.d <= 0.0 {
            return Err(OptiSimError::InvalidParameter(
                "thickness must be > 0.0".into(),
            ));
        }
        if self.r_left.is_nan() || self.r_right.is_nan() {
            return Err(OptiSimError::InvalidParameter(
                "radius of curvature must not be NaN".into(),
            ));
        }
        check_finite(curvature(self.r_left), "curvature of the left surface")?;
        check_finite(curvature(self.r_right), "curvature of the right surface")?;
        check_finite(self.x + self.d, "position of the right surface")?;
        check_finite(self.optical_power(), "optical power")
    }
    pub(super) fn set_field(&mut self, field: ElementField, value: f64) -> OptiResult<()> {
        match field {
            ElementField::X => self.x = value,
            ElementField::N => self.n = value,
            ElementField::D => self.d = value,
            ElementField::RLeft => self.r_left = value,
            ElementField::RRight => self.r_right = value,
            ElementField::F => {
                return Err(OptiSimError::InvalidField(
                    "the focal length of a thick lens is derived and cannot be set directly".into(),
                ))
            }
        }
        Ok(())
    }
    /// Returns the optical power (= 1/f) following the lensmaker's equation for thick lenses.
    #[must_use]
    pub fn optical_power(&self) -> f64 {
        let c_l = curvature(self.r_left);
        let c_r = curvature(self.r_right);
        (self.n - 1.0) * ((self.n - 1.0) * self.d * c_l * c_r / self.n + c_l - c_r)
    }
    /// Returns the effective focal length of this lens.
    ///
    /// An afocal lens (zero optical power, e.g. a flat slab) returns `f64::INFINITY`.
    #[must_use]
    pub fn focal_length(&self) -> f64 {
        let power = self.optical_power();
        if power == 0.0 {
            f64::INFINITY
        } else {
            1.0 / power
        }
    }
    /// Returns the axial positions of the front and rear principal planes.
    ///
    /// Returns `None` for afocal lenses.
    #[must_use]
    pub fn principal_planes(&self) -> Option<(f64, f64)> {
        let f = self.focal_length();
        if f.is_infinite() {
            return None;
        }
        let shift = (self.n - 1.0) * self.d / self.n;
        let front = self.x - f * shift * curvature(self.r_right);
        let rear = self.x + self.d - f * shift * curvature(self.r_left);
        Some((front, rear))
    }
    /// Returns the paraxial transfer matrix (left vertex to right vertex) acting on a `(height, slope)` ray vector.
    #[must_use]
    pub fn transfer_matrix(&self) -> Matrix2<f64> {
        let left = surface_matrix(1.0, self.n, curvature(self.r_left));
        let gap = Matrix2::new(1.0, self.d, 0.0, 1.0);
        let right = surface_matrix(self.n, 1.0, curvature(self.r_right));
        right * gap * left
    }
    pub(super) fn trace(&self, ray: &mut ParaxialRay) -> OptiResult<()> {
        ray.propagate_to(self.x)?;
        ray.refract(&surface_matrix(1.0, self.n, curvature(self.r_left)))?;
        ray.propagate_to(self.x + self.d)?;
        ray.refract(&surface_matrix(self.n, 1.0, curvature(self.r_right)))
    }
}
