#![warn(missing_docs)]
//! Module for handling paraxial rays
use itertools::Itertools;
use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{OptiResult, OptiSimError};

/// A single paraxial ray in the meridional plane.
///
/// The ray state is the vector `(height, slope)` at the current axial position. Every propagation step records a
/// sample point so that the full path of the ray can be retrieved afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ParaxialRay {
    /// current axial position
    x: f64,
    /// `(height, slope)` at the current position
    state: Vector2<f64>,
    /// sample points visited so far
    path: Vec<Point2<f64>>,
}
impl ParaxialRay {
    /// Creates a new [`ParaxialRay`] starting at `(x, height)` with the given `slope`.
    #[must_use]
    pub fn new(x: f64, height: f64, slope: f64) -> Self {
        Self {
            x,
            state: Vector2::new(height, slope),
            path: vec![Point2::new(x, height)],
        }
    }
    /// Returns the current axial position of this [`ParaxialRay`].
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the current height of this [`ParaxialRay`].
    #[must_use]
    pub fn height(&self) -> f64 {
        self.state.x
    }
    /// Returns the current slope of this [`ParaxialRay`].
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.state.y
    }
    /// Returns the sample points recorded so far.
    #[must_use]
    pub fn path(&self) -> &[Point2<f64>] {
        &self.path
    }
    /// Returns the height of the current (straight) segment, extended to the axial position `x`.
    #[must_use]
    pub fn height_at(&self, x: f64) -> f64 {
        self.slope().mul_add(x - self.x, self.height())
    }
    /// Returns the last sample point and a second point one length unit further along the current direction.
    ///
    /// Both points define the line of the current segment.
    #[must_use]
    pub fn current_segment(&self) -> (Point2<f64>, Point2<f64>) {
        let start = Point2::new(self.x, self.height());
        let end = Point2::new(self.x + 1.0, self.height_at(self.x + 1.0));
        (start, end)
    }
    /// Propagate the ray in free space to the axial position `x` and record the new sample point.
    ///
    /// The distance may be negative. In this case the ray is traced backwards (virtual segment).
    ///
    /// # Errors
    /// This function returns an error if
    ///   - the target position is not finite.
    ///   - the ray height would overflow during propagation.
    ///
    /// The ray is left untouched in the error case.
    pub fn propagate_to(&mut self, x: f64) -> OptiResult<()> {
        if !x.is_finite() {
            return Err(OptiSimError::NoConvergence(
                "propagation target must be finite".into(),
            ));
        }
        let transfer = Matrix2::new(1.0, x - self.x, 0.0, 1.0);
        let state = transfer * self.state;
        if !state.iter().all(|v| v.is_finite()) {
            return Err(OptiSimError::NoConvergence(format!(
                "ray state is not finite after propagating from x={} to x={x}",
                self.x
            )));
        }
        self.state = state;
        self.x = x;
        self.path.push(Point2::new(x, self.height()));
        Ok(())
    }
    /// Apply a paraxial refraction matrix at the current position. The position does not change.
    ///
    /// # Errors
    /// This function returns an error if the refracted ray state is not finite. The ray is left untouched in
    /// this case.
    pub fn refract(&mut self, matrix: &Matrix2<f64>) -> OptiResult<()> {
        let state = matrix * self.state;
        if !state.iter().all(|v| v.is_finite()) {
            return Err(OptiSimError::NoConvergence(format!(
                "ray state is not finite after refraction at x={}",
                self.x
            )));
        }
        self.state = state;
        Ok(())
    }
}

/// The polyline of a traced ray as handed out to callers (e.g. for rendering).
///
/// The segment between point `i` and point `i + 1` is tagged as virtual (`virtual_segments[i] == true`)
/// if it runs backwards with respect to the propagation direction. Such segments are back-extensions of
/// real rays and should be drawn distinctly (e.g. dashed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RayPath {
    x: Vec<f64>,
    y: Vec<f64>,
    virtual_segments: Vec<bool>,
}
impl RayPath {
    /// Create a [`RayPath`] from a list of sample points.
    #[must_use]
    pub fn from_points(points: &[Point2<f64>]) -> Self {
        Self {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            virtual_segments: points
                .iter()
                .tuple_windows()
                .map(|(start, end)| end.x < start.x)
                .collect(),
        }
    }
    /// Returns the axial coordinates of all sample points.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }
    /// Returns the heights of all sample points.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }
    /// Returns the virtual flags of all segments. The list has one entry less than the number of points.
    #[must_use]
    pub fn virtual_segments(&self) -> &[bool] {
        &self.virtual_segments
    }
    /// Returns the number of sample points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }
    /// Returns `true` if the path does not contain any point.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    /// Return `true` if at least one segment of this path is virtual.
    #[must_use]
    pub fn has_virtual_segments(&self) -> bool {
        self.virtual_segments.iter().any(|v| *v)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    #[test]
    fn new() {
        let ray = ParaxialRay::new(-20.0, 10.0, 0.5);
        assert_eq!(ray.x(), -20.0);
        assert_eq!(ray.height(), 10.0);
        assert_eq!(ray.slope(), 0.5);
        assert_eq!(ray.path(), &[Point2::new(-20.0, 10.0)]);
    }
    #[test]
    fn propagate_to() {
        let mut ray = ParaxialRay::new(0.0, 1.0, 0.5);
        ray.propagate_to(4.0).unwrap();
        assert_eq!(ray.x(), 4.0);
        assert_eq!(ray.height(), 3.0);
        assert_eq!(ray.slope(), 0.5);
        ray.propagate_to(2.0).unwrap();
        assert_eq!(ray.height(), 2.0);
        assert_eq!(ray.path().len(), 3);
    }
    #[test]
    fn refract() {
        let mut ray = ParaxialRay::new(0.0, 2.0, 0.0);
        ray.refract(&Matrix2::new(1.0, 0.0, -0.1, 1.0)).unwrap();
        assert_eq!(ray.x(), 0.0);
        assert_eq!(ray.height(), 2.0);
        assert_relative_eq!(ray.slope(), -0.2);
        assert_eq!(ray.path().len(), 1);
    }
    #[test]
    fn propagate_to_not_finite() {
        let mut ray = ParaxialRay::new(0.0, 1.0, 0.5);
        assert_matches!(
            ray.propagate_to(f64::INFINITY),
            Err(OptiSimError::NoConvergence(_))
        );
        assert_matches!(
            ray.propagate_to(f64::NAN),
            Err(OptiSimError::NoConvergence(_))
        );
        let mut ray = ParaxialRay::new(-1.0e308, 1.0, 10.0);
        assert_matches!(
            ray.propagate_to(1.0e308),
            Err(OptiSimError::NoConvergence(_))
        );
        assert_eq!(ray.x(), -1.0e308);
        assert_eq!(ray.height(), 1.0);
        assert_eq!(ray.path().len(), 1);
    }
    #[test]
    fn refract_not_finite() {
        let mut ray = ParaxialRay::new(0.0, 2.0, 0.0);
        assert_matches!(
            ray.refract(&Matrix2::new(1.0, 0.0, f64::NEG_INFINITY, 1.0)),
            Err(OptiSimError::NoConvergence(_))
        );
        assert_eq!(ray.slope(), 0.0);
    }
    #[test]
    fn height_at() {
        let ray = ParaxialRay::new(10.0, 1.0, -0.1);
        assert_relative_eq!(ray.height_at(20.0), 0.0);
        assert_relative_eq!(ray.height_at(0.0), 2.0);
    }
    #[test]
    fn current_segment() {
        let ray = ParaxialRay::new(10.0, 1.0, -0.5);
        let (start, end) = ray.current_segment();
        assert_eq!(start, Point2::new(10.0, 1.0));
        assert_eq!(end, Point2::new(11.0, 0.5));
    }
    #[test]
    fn ray_path_from_points() {
        let path = RayPath::from_points(&[
            Point2::new(0.0, 1.0),
            Point2::new(10.0, 1.0),
            Point2::new(30.0, 3.0),
            Point2::new(5.0, 0.5),
        ]);
        assert_eq!(path.len(), 4);
        assert_eq!(path.x(), &[0.0, 10.0, 30.0, 5.0]);
        assert_eq!(path.y(), &[1.0, 1.0, 3.0, 0.5]);
        assert_eq!(path.virtual_segments(), &[false, false, true]);
        assert!(path.has_virtual_segments());
    }
    #[test]
    fn ray_path_default() {
        let path = RayPath::default();
        assert!(path.is_empty());
        assert!(!path.has_virtual_segments());
    }
    #[test]
    fn ray_path_serialize() {
        let path = RayPath::from_points(&[Point2::new(0.0, 1.0), Point2::new(10.0, 1.0)]);
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            r#"{"x":[0.0,10.0],"y":[1.0,1.0],"virtual_segments":[false]}"#
        );
    }
}
