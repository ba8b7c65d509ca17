#![warn(missing_docs)]
//! An ideal thin lens
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use super::{check_finite, ElementField};
use crate::{
    error::{OptiResult, OptiSimError},
    ray::ParaxialRay,
};

/// Thin lens (= paraxial surface)
///
/// This element models an idealized lens of zero thickness with a given focal length `f`. A positive
/// focal length corresponds to a converging lens while a negative focal length represents a diverging
/// lens.
///
/// ## Fields
///   - `x`
///   - `f`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThinLens {
    x: f64,
    f: f64,
}
impl ThinLens {
    /// Create a new thin lens at axial position `x` with the focal length `f`.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - `x` is not finite.
    ///  - the given focal length is 0.0 or not finite.
    ///  - the optical power (= 1/f) is not finite (subnormal focal length).
    pub fn new(x: f64, f: f64) -> OptiResult<Self> {
        let lens = Self { x, f };
        lens.validate()?;
        Ok(lens)
    }
    /// Returns the axial position of this [`ThinLens`].
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the focal length of this [`ThinLens`].
    #[must_use]
    pub const fn f(&self) -> f64 {
        self.f
    }
    /// Check the constraints of this [`ThinLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position or the focal length is not finite, the focal length is zero
    /// or so small that its optical power overflows.
    pub fn validate(&self) -> OptiResult<()> {
        check_finite(self.x, "position x")?;
        check_finite(self.f, "focal length")?;
        if self.f == 0.0 {
            return Err(OptiSimError::InvalidParameter(
                "focal length must not be 0.0".into(),
            ));
        }
        check_finite(1.0 / self.f, "optical power")
    }
    pub(super) fn set_field(&mut self, field: ElementField, value: f64) -> OptiResult<()> {
        match field {
            ElementField::X => self.x = value,
            ElementField::F => self.f = value,
            _ => {
                return Err(OptiSimError::InvalidField(format!(
                    "field '{field}' is not applicable to a thin lens"
                )))
            }
        }
        Ok(())
    }
    /// Returns the paraxial transfer matrix of this lens acting on a `(height, slope)` ray vector.
    #[must_use]
    pub fn transfer_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(1.0, 0.0, -1.0 / self.f, 1.0)
    }
    pub(super) fn trace(&self, ray: &mut ParaxialRay) -> OptiResult<()> {
        ray.propagate_to(self.x)?;
        ray.refract(&self.transfer_matrix())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    #[test]
    fn new() {
        let lens = ThinLens::new(10.0, 5.0).unwrap();
        assert_eq!(lens.x(), 10.0);
        assert_eq!(lens.f(), 5.0);
        assert!(ThinLens::new(0.0, -1.0).is_ok());
        assert!(ThinLens::new(0.0, 1.0e-9).is_ok());
        assert_matches!(
            ThinLens::new(0.0, 0.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert!(ThinLens::new(0.0, -0.0).is_err());
        assert!(ThinLens::new(0.0, f64::NAN).is_err());
        assert!(ThinLens::new(0.0, f64::INFINITY).is_err());
        assert!(ThinLens::new(0.0, f64::NEG_INFINITY).is_err());
        assert!(ThinLens::new(f64::NAN, 10.0).is_err());
        assert_matches!(
            ThinLens::new(0.0, 1.0e-320),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert!(ThinLens::new(0.0, -1.0e-320).is_err());
    }
    #[test]
    fn set_field() {
        let mut lens = ThinLens::new(10.0, 5.0).unwrap();
        lens.set_field(ElementField::X, 15.0).unwrap();
        lens.set_field(ElementField::F, 10.0).unwrap();
        assert_eq!(lens, ThinLens::new(15.0, 10.0).unwrap());
        assert_matches!(
            lens.set_field(ElementField::N, 1.5),
            Err(OptiSimError::InvalidField(_))
        );
        assert_matches!(
            lens.set_field(ElementField::RLeft, 1.5),
            Err(OptiSimError::InvalidField(_))
        );
    }
    #[test]
    fn transfer_matrix() {
        let lens = ThinLens::new(0.0, 10.0).unwrap();
        let m = lens.transfer_matrix();
        assert_relative_eq!(m.determinant(), 1.0);
        assert_eq!(m[(1, 0)], -0.1);
    }
    #[test]
    fn trace_parallel_ray() {
        let lens = ThinLens::new(20.0, 10.0).unwrap();
        let mut ray = ParaxialRay::new(0.0, 2.0, 0.0);
        lens.trace(&mut ray).unwrap();
        assert_eq!(ray.x(), 20.0);
        assert_eq!(ray.height(), 2.0);
        assert_relative_eq!(ray.slope(), -0.2);
    }
    #[test]
    fn serialize() {
        let lens = ThinLens::new(20.0, -10.0).unwrap();
        assert_eq!(
            serde_json::to_string(&lens).unwrap(),
            r#"{"x":20.0,"f":-10.0}"#
        );
    }
}
