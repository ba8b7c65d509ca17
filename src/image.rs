#![warn(missing_docs)]
//! Images formed by an optical system and the analytic resolution of image points.
use std::fmt::Display;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ray::ParaxialRay;

/// Classification of an [`Image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ImageKind {
    /// formed by converging rays behind the last element
    #[strum(serialize = "real")]
    Real,
    /// located by back-extension of diverging rays
    #[strum(serialize = "virtual")]
    Virtual,
}

/// The image of the light source formed by (a part of) an optical system.
///
/// Images are always derived from the current state of a system and are never stored. An image at infinity
/// (parallel outgoing rays) is represented by an infinite `x` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Image {
    x: f64,
    y: f64,
    kind: ImageKind,
}
impl Image {
    /// Creates a new [`Image`].
    #[must_use]
    pub const fn new(x: f64, y: f64, kind: ImageKind) -> Self {
        Self { x, y, kind }
    }
    /// Create an image from an intersection point of rays leaving an element at `exit_x`.
    ///
    /// The image is real if it lies at or behind the exit plane, otherwise it is virtual.
    #[must_use]
    pub fn from_intersection(point: Point2<f64>, exit_x: f64) -> Self {
        let kind = if point.x >= exit_x {
            ImageKind::Real
        } else {
            ImageKind::Virtual
        };
        Self::new(point.x, point.y, kind)
    }
    /// Create an image at infinity for parallel rays leaving an element with the given focal length.
    ///
    /// Converging elements place the image at `+inf` (real), diverging ones at `-inf` (virtual). The height is infinite.
    #[must_use]
    pub fn at_infinity(focal_length: f64) -> Self {
        if focal_length > 0.0 {
            Self::new(f64::INFINITY, f64::INFINITY, ImageKind::Real)
        } else {
            Self::new(f64::NEG_INFINITY, f64::INFINITY, ImageKind::Virtual)
        }
    }
    /// Returns the axial position of this [`Image`].
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the (signed) height of this [`Image`].
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
    /// Returns the classification of this [`Image`].
    #[must_use]
    pub const fn kind(&self) -> ImageKind {
        self.kind
    }
    /// Return `true` if this is a real image.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.kind == ImageKind::Real
    }
    /// Return `true` if the image lies at infinity.
    #[must_use]
    pub fn is_at_infinity(&self) -> bool {
        self.x.is_infinite()
    }
}
impl Display for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image (x: {}, y: {}, {})", self.x, self.y, self.kind)
    }
}

/// Intersect the line through `p1`, `p2` with the line through `q1`, `q2`.
///
/// Returns `None` if both lines are parallel within the given relative `tolerance`.
#[must_use]
pub fn intersect_lines(
    p1: Point2<f64>,
    p2: Point2<f64>,
    q1: Point2<f64>,
    q2: Point2<f64>,
    tolerance: f64,
) -> Option<Point2<f64>> {
    let d1 = p2 - p1;
    let d2 = q2 - q1;
    let cross = d1.perp(&d2);
    if cross.abs() <= tolerance * d1.norm() * d2.norm() {
        return None;
    }
    let t = (q1 - p1).perp(&d2) / cross;
    Some(p1 + d1 * t)
}

/// Determine the common point of the current segments of two rays.
///
/// The point is calculated analytically from the last two sample points of each ray. Returns `None` if the rays are
/// parallel.
#[must_use]
pub fn resolve_image_point(
    ray_1: &ParaxialRay,
    ray_2: &ParaxialRay,
    tolerance: f64,
) -> Option<Point2<f64>> {
    let (p1, p2) = ray_1.current_segment();
    let (q1, q2) = ray_2.current_segment();
    intersect_lines(p1, p2, q1, q2, tolerance)
}
