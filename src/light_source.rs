#![warn(missing_docs)]
//! The (point-like) light source of an optical system
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

use crate::error::{OptiResult, OptiSimError};

/// Editable fields of a [`LightSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, strum::Display)]
pub enum LightSourceField {
    /// axial position
    #[strum(serialize = "x")]
    X,
    /// transverse (signed) half-height
    #[strum(serialize = "y")]
    Y,
}

/// A point-like object located on the optical axis at `x` with a signed transverse half-height `y`.
///
/// Every [`OpticalSystem`](crate::OpticalSystem) owns exactly one light source. It can be modified in
/// place but never removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightSource {
    x: f64,
    y: f64,
}
impl Default for LightSource {
    /// Create a light source at `x = 0.0` with a height of `y = 8.0`.
    fn default() -> Self {
        Self { x: 0.0, y: 8.0 }
    }
}
impl LightSource {
    /// Creates a new [`LightSource`].
    ///
    /// # Errors
    ///
    /// This function returns an error if `x` or `y` are not finite.
    pub fn new(x: f64, y: f64) -> OptiResult<Self> {
        let source = Self { x, y };
        source.validate()?;
        Ok(source)
    }
    /// Returns the axial position of this [`LightSource`].
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }
    /// Returns the signed height of this [`LightSource`].
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
    /// Shift the light source along the optical axis by `dx`.
    pub(crate) fn shift_x(&mut self, dx: f64) {
        self.x += dx;
    }
    /// Set the given field to a new value.
    ///
    /// The light source remains unchanged if the value is rejected.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///   - the field name is neither `x` nor `y`.
    ///   - the value is not finite.
    pub fn modify(&mut self, field: &str, value: f64) -> OptiResult<()> {
        let field = LightSourceField::from_str(field).map_err(|_| {
            OptiSimError::InvalidField(format!("light source has no field '{field}'"))
        })?;
        let mut candidate = *self;
        match field {
            LightSourceField::X => candidate.x = value,
            LightSourceField::Y => candidate.y = value,
        }
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
    /// Check the constraints of this [`LightSource`].
    ///
    /// # Errors
    ///
    /// This function returns an error if a coordinate is not finite.
    pub fn validate(&self) -> OptiResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(OptiSimError::InvalidParameter(
                "light source coordinates must be finite".into(),
            ));
        }
        Ok(())
    }
}
impl Display for LightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LightSource (x: {}, y: {})", self.x, self.y)
    }
}
