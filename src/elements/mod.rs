#![warn(missing_docs)]
//! The optical elements which can be placed along the optical axis.
//!
//! All elements are variants of the closed sum type [`OpticalElement`] so that the ray tracer can dispatch
//! over them exhaustively.
mod thick_lens;
mod thin_lens;

use std::{fmt::Display, str::FromStr};

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

pub use thick_lens::ThickLens;
pub use thin_lens::ThinLens;

use crate::{
    error::{OptiResult, OptiSimError},
    ray::ParaxialRay,
};

pub(crate) fn check_finite(value: f64, what: &str) -> OptiResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OptiSimError::InvalidParameter(format!(
            "{what} must be finite"
        )))
    }
}

/// Editable fields of an [`OpticalElement`].
///
/// The string representation matches the field names used in system files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, strum::Display)]
pub enum ElementField {
    /// axial position
    #[strum(serialize = "x")]
    X,
    /// focal length (thin lens only)
    #[strum(serialize = "f")]
    F,
    /// refractive index (thick lens only)
    #[strum(serialize = "n")]
    N,
    /// center thickness (thick lens only)
    #[strum(serialize = "d")]
    D,
    /// radius of curvature of the left surface (thick lens only)
    #[strum(serialize = "r_left")]
    RLeft,
    /// radius of curvature of the right surface (thick lens only)
    #[strum(serialize = "r_right")]
    RRight,
}

/// An optical element of an [`OpticalSystem`](crate::OpticalSystem).
///
/// The serialized form carries the variant as `type` field:
/// ```json
/// { "type": "ThinLens", "x": 20.0, "f": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OpticalElement {
    /// an ideal lens of zero thickness
    ThinLens(ThinLens),
    /// a lens with two refracting surfaces
    ThickLens(ThickLens),
}
impl OpticalElement {
    /// Returns the axial position of this element (the left vertex for thick lenses).
    #[must_use]
    pub const fn x(&self) -> f64 {
        match self {
            Self::ThinLens(lens) => lens.x(),
            Self::ThickLens(lens) => lens.x(),
        }
    }
    /// Returns the axial range `(start, end)` occupied by this element.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        match self {
            Self::ThinLens(lens) => (lens.x(), lens.x()),
            Self::ThickLens(lens) => (lens.x(), lens.x() + lens.d()),
        }
    }
    /// Returns the axial position where rays leave this element.
    #[must_use]
    pub fn exit_x(&self) -> f64 {
        self.extent().1
    }
    /// Returns the (effective) focal length of this element.
    #[must_use]
    pub fn focal_length(&self) -> f64 {
        match self {
            Self::ThinLens(lens) => lens.f(),
            Self::ThickLens(lens) => lens.focal_length(),
        }
    }
    /// Returns the name of the element type as used in system files.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::ThinLens(_) => "ThinLens",
            Self::ThickLens(_) => "ThickLens",
        }
    }
    /// Return `true` if the axial ranges of both elements touch or overlap.
    #[must_use]
    pub fn collides_with(&self, other: &Self) -> bool {
        let (start, end) = self.extent();
        let (other_start, other_end) = other.extent();
        start <= other_end && other_start <= end
    }
    /// Check the constraints of this element.
    ///
    /// # Errors
    ///
    /// This function will return an error if a parameter violates the constraints of the element type.
    pub fn validate(&self) -> OptiResult<()> {
        match self {
            Self::ThinLens(lens) => lens.validate(),
            Self::ThickLens(lens) => lens.validate(),
        }
    }
    /// Set a field of this element given by its name.
    ///
    /// The element is only changed if the new value is valid.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the field name is unknown or not applicable to the element type.
    ///   - the new value violates the constraints of the element type.
    pub fn modify(&mut self, field: &str, value: f64) -> OptiResult<()> {
        let field = ElementField::from_str(field)
            .map_err(|_| OptiSimError::InvalidField(format!("unknown field '{field}'")))?;
        let mut candidate = *self;
        match &mut candidate {
            Self::ThinLens(lens) => lens.set_field(field, value)?,
            Self::ThickLens(lens) => lens.set_field(field, value)?,
        }
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
    /// Returns the paraxial transfer matrix from the entrance to the exit plane of this element.
    #[must_use]
    pub fn transfer_matrix(&self) -> Matrix2<f64> {
        match self {
            Self::ThinLens(lens) => lens.transfer_matrix(),
            Self::ThickLens(lens) => lens.transfer_matrix(),
        }
    }
    /// Propagate the given ray to this element and refract it on all of its surfaces.
    ///
    /// # Errors
    /// This function returns an error if the ray state overflows while passing the element.
    pub fn trace(&self, ray: &mut ParaxialRay) -> OptiResult<()> {
        match self {
            Self::ThinLens(lens) => lens.trace(ray),
            Self::ThickLens(lens) => lens.trace(ray),
        }
    }
}
impl From<ThinLens> for OpticalElement {
    fn from(lens: ThinLens) -> Self {
        Self::ThinLens(lens)
    }
}
impl From<ThickLens> for OpticalElement {
    fn from(lens: ThickLens) -> Self {
        Self::ThickLens(lens)
    }
}
impl Display for OpticalElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThinLens(lens) => write!(f, "ThinLens (x: {}, f: {})", lens.x(), lens.f()),
            Self::ThickLens(lens) => write!(
                f,
                "ThickLens (x: {}, n: {}, d: {}, r_left: {}, r_right: {}, f: {})",
                lens.x(),
                lens.n(),
                lens.d(),
                lens.r_left(),
                lens.r_right(),
                lens.focal_length()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    use strum::IntoEnumIterator;
    #[test]
    fn field_names() {
        let names: Vec<String> = ElementField::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["x", "f", "n", "d", "r_left", "r_right"]);
        assert_eq!(ElementField::from_str("r_left").unwrap(), ElementField::RLeft);
        assert!(ElementField::from_str("radius").is_err());
    }
    #[test]
    fn accessors() {
        let thin: OpticalElement = ThinLens::new(20.0, 10.0).unwrap().into();
        assert_eq!(thin.x(), 20.0);
        assert_eq!(thin.extent(), (20.0, 20.0));
        assert_eq!(thin.exit_x(), 20.0);
        assert_eq!(thin.focal_length(), 10.0);
        assert_eq!(thin.type_name(), "ThinLens");
        let thick: OpticalElement = ThickLens::new(30.0, 1.5, 5.0, -20.0, 25.0)
            .unwrap()
            .into();
        assert_eq!(thick.x(), 30.0);
        assert_eq!(thick.extent(), (30.0, 35.0));
        assert_eq!(thick.exit_x(), 35.0);
        assert_eq!(thick.type_name(), "ThickLens");
    }
    #[test]
    fn collides_with() {
        let thin: OpticalElement = ThinLens::new(20.0, 10.0).unwrap().into();
        let same_x: OpticalElement = ThinLens::new(20.0, -5.0).unwrap().into();
        let other: OpticalElement = ThinLens::new(21.0, 10.0).unwrap().into();
        let thick: OpticalElement = ThickLens::new(18.0, 1.5, 2.0, 10.0, -10.0)
            .unwrap()
            .into();
        let thick_far: OpticalElement = ThickLens::new(22.0, 1.5, 2.0, 10.0, -10.0)
            .unwrap()
            .into();
        assert!(thin.collides_with(&same_x));
        assert!(!thin.collides_with(&other));
        assert!(thin.collides_with(&thick));
        assert!(thick.collides_with(&thin));
        assert!(!other.collides_with(&thick_far));
        assert!(!thick.collides_with(&thick_far));
    }
    #[test]
    fn modify() {
        let mut element: OpticalElement = ThinLens::new(0.0, 10.0).unwrap().into();
        element.modify("x", 5.0).unwrap();
        element.modify("f", -10.0).unwrap();
        assert_eq!(element, ThinLens::new(5.0, -10.0).unwrap().into());
        assert_matches!(element.modify("n", 1.5), Err(OptiSimError::InvalidField(_)));
        assert_matches!(element.modify("focal", 1.5), Err(OptiSimError::InvalidField(_)));
        assert_matches!(
            element.modify("f", 0.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_eq!(element, ThinLens::new(5.0, -10.0).unwrap().into());
    }
    #[test]
    fn modify_thick_lens() {
        let mut element: OpticalElement = ThickLens::new(30.0, 1.5, 5.0, -20.0, 25.0)
            .unwrap()
            .into();
        element.modify("r_right", 40.0).unwrap();
        assert_matches!(
            element.modify("n", 1.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_matches!(
            element.modify("d", -1.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_matches!(element.modify("f", 10.0), Err(OptiSimError::InvalidField(_)));
        assert_eq!(
            element,
            ThickLens::new(30.0, 1.5, 5.0, -20.0, 40.0).unwrap().into()
        );
    }
    #[test]
    fn serialize() {
        let element: OpticalElement = ThinLens::new(20.0, 10.0).unwrap().into();
        assert_eq!(
            serde_json::to_string(&element).unwrap(),
            r#"{"type":"ThinLens","x":20.0,"f":10.0}"#
        );
        let element: OpticalElement = ThickLens::new(40.0, 1.5, 2.0, 15.0, -15.0)
            .unwrap()
            .into();
        assert_eq!(
            serde_json::to_string(&element).unwrap(),
            r#"{"type":"ThickLens","x":40.0,"n":1.5,"d":2.0,"r_left":15.0,"r_right":-15.0}"#
        );
    }
    #[test]
    fn deserialize() {
        let element: OpticalElement =
            serde_json::from_str(r#"{"type":"ThinLens","x":20.0,"f":10.0}"#).unwrap();
        assert_eq!(element, ThinLens::new(20.0, 10.0).unwrap().into());
        assert!(serde_json::from_str::<OpticalElement>(r#"{"type":"Mirror","x":20.0}"#).is_err());
        assert!(serde_json::from_str::<OpticalElement>(r#"{"type":"ThinLens","x":20.0}"#).is_err());
    }
    #[test]
    fn display() {
        let element: OpticalElement = ThinLens::new(20.0, 10.0).unwrap().into();
        assert_eq!(format!("{element}"), "ThinLens (x: 20, f: 10)");
    }
}
