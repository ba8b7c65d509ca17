#![warn(missing_docs)]
//! Paraxial ray tracing of the two characteristic rays through an optical system.
use std::collections::BTreeMap;

use approx::abs_diff_eq;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{
    error::{OptiResult, OptiSimError},
    image::{resolve_image_point, Image},
    light_source::LightSource,
    ray::{ParaxialRay, RayPath},
    registry::SystemRegistry,
};

/// Identifiers of the two characteristic rays.
///
/// `ray_1` leaves the light source parallel to the optical axis, `ray_2` is aimed at the axis point of the first element.
pub const RAY_IDS: [&str; 2] = ["ray_1", "ray_2"];

/// Extension of the rays behind the last element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RayExtension {
    /// End the rays at a real image. Virtual images and images at infinity get a forward extension as long as the
    /// distance between image (or light source) and the exit plane.
    #[default]
    ToImage,
    /// Extend all rays by a fixed span behind the exit plane.
    Fixed(f64),
}

/// Configuration data for a paraxial ray tracing run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayTraceConfig {
    extension: RayExtension,
    parallel_tolerance: f64,
    probe_epsilon: f64,
}
impl Default for RayTraceConfig {
    /// Create a default config with the following parameters:
    ///   - ray extension: [`RayExtension::ToImage`]
    ///   - parallel tolerance: `1e-9`
    ///   - probe epsilon: `1e-3`
    fn default() -> Self {
        Self {
            extension: RayExtension::default(),
            parallel_tolerance: 1e-9,
            probe_epsilon: 1e-3,
        }
    }
}
impl RayTraceConfig {
    /// Returns the ray extension mode of this [`RayTraceConfig`].
    #[must_use]
    pub const fn extension(&self) -> RayExtension {
        self.extension
    }
    /// Sets the ray extension mode of this [`RayTraceConfig`].
    ///
    /// # Errors
    ///
    /// This function will return an error if a fixed span is not finite or <= 0.0.
    pub fn set_extension(&mut self, extension: RayExtension) -> OptiResult<()> {
        if let RayExtension::Fixed(span) = extension {
            if !span.is_finite() || span <= 0.0 {
                return Err(OptiSimError::InvalidParameter(
                    "ray extension span must be > 0.0 and finite".into(),
                ));
            }
        }
        self.extension = extension;
        Ok(())
    }
    /// Returns the relative tolerance below which two rays are considered parallel.
    #[must_use]
    pub const fn parallel_tolerance(&self) -> f64 {
        self.parallel_tolerance
    }
    /// Sets the relative tolerance below which two rays are considered parallel.
    ///
    /// # Errors
    ///
    /// This function will return an error if the tolerance is not finite or <= 0.0.
    pub fn set_parallel_tolerance(&mut self, parallel_tolerance: f64) -> OptiResult<()> {
        if !parallel_tolerance.is_finite() || parallel_tolerance <= 0.0 {
            return Err(OptiSimError::InvalidParameter(
                "parallel tolerance must be > 0.0 and finite".into(),
            ));
        }
        self.parallel_tolerance = parallel_tolerance;
        Ok(())
    }
    /// Returns the relative shift of the light source used for probing an image at infinity.
    #[must_use]
    pub const fn probe_epsilon(&self) -> f64 {
        self.probe_epsilon
    }
    /// Sets the relative shift of the light source used for probing an image at infinity.
    ///
    /// # Errors
    ///
    /// This function will return an error if the value is not finite or <= 0.0.
    pub fn set_probe_epsilon(&mut self, probe_epsilon: f64) -> OptiResult<()> {
        if !probe_epsilon.is_finite() || probe_epsilon <= 0.0 {
            return Err(OptiSimError::InvalidParameter(
                "probe epsilon must be > 0.0 and finite".into(),
            ));
        }
        self.probe_epsilon = probe_epsilon;
        Ok(())
    }
}

/// Create the two characteristic rays leaving the light source.
///
/// `aim_x` is the axial position of the first element.
fn characteristic_rays(source: &LightSource, aim_x: f64) -> [ParaxialRay; 2] {
    let mut distance = aim_x - source.x();
    if abs_diff_eq!(distance, 0.0) {
        distance = 1.0;
    }
    // an on-axis source would make both rays coincide
    let target = if source.y() == 0.0 { 1.0 } else { 0.0 };
    let slope = (target - source.y()) / distance;
    [
        ParaxialRay::new(source.x(), source.y(), 0.0),
        ParaxialRay::new(source.x(), source.y(), slope),
    ]
}

/// Traces the characteristic rays of a light source through the elements of a [`SystemRegistry`].
pub struct RayTracer<'a> {
    registry: &'a SystemRegistry,
    config: &'a RayTraceConfig,
}
impl<'a> RayTracer<'a> {
    /// Creates a new [`RayTracer`].
    #[must_use]
    pub const fn new(registry: &'a SystemRegistry, config: &'a RayTraceConfig) -> Self {
        Self { registry, config }
    }
    /// Trace both characteristic rays through all elements in ascending axial order.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the registry does not contain any element.
    ///   - the ray state overflows on its way through the system.
    pub fn trace(&self, source: &LightSource) -> OptiResult<TraceResult> {
        let elements = self.registry.sorted_elements();
        let Some((_, first)) = elements.first() else {
            return Err(OptiSimError::NoConvergence(
                "optical system does not contain any element".into(),
            ));
        };
        let mut rays = characteristic_rays(source, first.x());
        let mut image_sequence = Vec::with_capacity(elements.len());
        let mut exit_x = first.exit_x();
        for (name, element) in &elements {
            for ray in &mut rays {
                element.trace(ray)?;
            }
            exit_x = element.exit_x();
            let image = resolve_image_point(&rays[0], &rays[1], self.config.parallel_tolerance())
                .map_or_else(
                    || Image::at_infinity(element.focal_length()),
                    |point| Image::from_intersection(point, exit_x),
                );
            debug!("image after element '{name}': {image}");
            image_sequence.push(image);
        }
        let image_point =
            resolve_image_point(&rays[0], &rays[1], self.config.parallel_tolerance());
        let final_image = image_point.map_or_else(
            || Image::at_infinity(elements[elements.len() - 1].1.focal_length()),
            |point| Image::from_intersection(point, exit_x),
        );
        Ok(TraceResult {
            rays,
            source_x: source.x(),
            exit_x,
            image_point,
            final_image,
            image_sequence,
            extension: self.config.extension(),
        })
    }
}

/// The outcome of a single tracing run.
#[derive(Debug, Clone)]
pub struct TraceResult {
    rays: [ParaxialRay; 2],
    source_x: f64,
    exit_x: f64,
    image_point: Option<Point2<f64>>,
    final_image: Image,
    image_sequence: Vec<Image>,
    extension: RayExtension,
}
impl TraceResult {
    /// Returns the traced rays (without extension behind the last element).
    #[must_use]
    pub const fn rays(&self) -> &[ParaxialRay; 2] {
        &self.rays
    }
    /// Returns the axial position of the exit plane of the last element.
    #[must_use]
    pub const fn exit_x(&self) -> f64 {
        self.exit_x
    }
    /// Returns the final image or `None` if the rays leave the system parallel.
    #[must_use]
    pub fn image(&self) -> Option<Image> {
        self.image_point
            .map(|point| Image::from_intersection(point, self.exit_x))
    }
    /// Returns the final image. Parallel rays are reported at infinity with an infinite height.
    #[must_use]
    pub const fn final_image(&self) -> Image {
        self.final_image
    }
    /// Returns the intermediate images behind each element in ascending axial order.
    #[must_use]
    pub fn image_sequence(&self) -> &[Image] {
        &self.image_sequence
    }
    /// Returns the polylines of both rays including their extension behind the last element towards `image`.
    #[must_use]
    pub fn ray_paths(&self, image: &Image) -> BTreeMap<String, RayPath> {
        RAY_IDS
            .iter()
            .zip(self.rays.iter())
            .map(|(id, ray)| ((*id).to_string(), RayPath::from_points(&self.extend(ray, image))))
            .collect()
    }
    fn display_span(&self, image: &Image) -> f64 {
        match self.extension {
            RayExtension::Fixed(span) => span,
            RayExtension::ToImage => {
                let reference = if image.is_at_infinity() {
                    self.source_x
                } else {
                    image.x()
                };
                (self.exit_x - reference).abs().max(1.0)
            }
        }
    }
    fn extend(&self, ray: &ParaxialRay, image: &Image) -> Vec<Point2<f64>> {
        let mut points = ray.path().to_vec();
        let forward = self.exit_x + self.display_span(image);
        if image.is_at_infinity() {
            points.push(Point2::new(forward, ray.height_at(forward)));
        } else if image.is_real() {
            let end = match self.extension {
                RayExtension::ToImage => image.x(),
                RayExtension::Fixed(_) => forward,
            };
            points.push(Point2::new(end, ray.height_at(end)));
        } else {
            // forward part and virtual back-extension to the image
            points.push(Point2::new(forward, ray.height_at(forward)));
            points.push(Point2::new(image.x(), ray.height_at(image.x())));
        }
        points
    }
}
