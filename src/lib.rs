#![warn(missing_docs)]
//! This is the documentation for the **OptiSim** software package, a paraxial ray tracing engine for thin and
//! thick lenses.
//!
//! An [`OpticalSystem`] consists of a single point-like light source and a sequence of named optical elements placed
//! along the optical axis. Two characteristic rays leaving the top of the light source are traced through all elements
//! in axial order in order to determine the position, size and type (real / virtual) of the image.
pub mod console;
pub mod document;
pub mod elements;
pub mod error;
pub mod image;
pub mod light_source;
pub mod optical_system;
pub mod ray;
pub mod registry;
pub mod reporter;
pub mod tracer;
mod utils;

pub use optical_system::OpticalSystem;

/// Return the version information of this crate.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
