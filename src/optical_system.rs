#![warn(missing_docs)]
//! The central imaging engine.
//!
//! An [`OpticalSystem`] owns exactly one [`LightSource`] and a registry of named optical elements. It traces the
//! characteristic rays of the light source through all elements and derives the image formed by the system.
use std::{collections::BTreeMap, path::Path};

use log::{debug, info, warn};

use crate::{
    document::SystemDocument,
    elements::{OpticalElement, ThickLens, ThinLens},
    error::{OptiResult, OptiSimError},
    image::Image,
    light_source::LightSource,
    ray::RayPath,
    registry::SystemRegistry,
    tracer::{RayTraceConfig, RayTracer},
};

/// Temporarily shifted light source used for resolving an image at infinity.
///
/// The original light source is restored when the probe is dropped, on every exit path.
struct LightSourceProbe<'a> {
    source: &'a mut LightSource,
    original: LightSource,
}
impl<'a> LightSourceProbe<'a> {
    fn new(source: &'a mut LightSource) -> Self {
        let original = *source;
        Self { source, original }
    }
    fn shift_x(&mut self, dx: f64) {
        self.source.shift_x(dx);
    }
    fn source(&self) -> &LightSource {
        self.source
    }
}
impl Drop for LightSourceProbe<'_> {
    fn drop(&mut self) {
        *self.source = self.original;
        debug!("light source restored to {}", self.original);
    }
}

/// A paraxial optical system consisting of a light source and a sequence of thin and thick lenses.
///
/// ```rust
/// use optisim::OpticalSystem;
///
/// let mut system = OpticalSystem::new();
/// system.modify_light_source("y", 1.0).unwrap();
/// system.add_thin_lens("Lens_1", 20.0, 10.0).unwrap();
/// let image = system.calculate().unwrap();
/// assert!((image.x() - 40.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpticalSystem {
    light_source: LightSource,
    registry: SystemRegistry,
    config: RayTraceConfig,
}
impl OpticalSystem {
    /// Creates a new, empty [`OpticalSystem`] with a default [`LightSource`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Create a new [`OpticalSystem`] from a system file.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the file cannot be read.
    ///   - the file content is malformed.
    ///   - the light source or one of the elements violates its constraints.
    pub fn from_file(path: &Path) -> OptiResult<Self> {
        let document = SystemDocument::from_file(path)?;
        Self::from_document(&document)
    }
    /// Create a new [`OpticalSystem`] from a [`SystemDocument`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the light source or one of the elements violates its constraints
    /// (including overlapping elements).
    pub fn from_document(document: &SystemDocument) -> OptiResult<Self> {
        let light_source = *document.light_source();
        light_source.validate()?;
        let mut registry = SystemRegistry::new();
        for (name, element) in document.elements() {
            registry.add(name, *element)?;
        }
        Ok(Self {
            light_source,
            registry,
            config: RayTraceConfig::default(),
        })
    }
    /// Replace light source and all elements by the content of a system file.
    ///
    /// The system is left unchanged if loading fails. The ray tracing configuration is kept.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the file cannot be read.
    ///   - the file content is malformed.
    ///   - the light source or one of the elements violates its constraints.
    pub fn initialize(&mut self, path: &Path) -> OptiResult<()> {
        let loaded = Self::from_file(path)?;
        self.light_source = loaded.light_source;
        self.registry = loaded.registry;
        info!(
            "loaded optical system with {} element(s) from {}",
            self.registry.len(),
            path.display()
        );
        Ok(())
    }
    /// Returns a [`SystemDocument`] of the current light source and elements.
    #[must_use]
    pub fn to_document(&self) -> SystemDocument {
        SystemDocument::new(self.light_source, self.registry.snapshot())
    }
    /// Save light source and elements to a system file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> OptiResult<()> {
        self.to_document().save_to_file(path)?;
        info!("saved optical system to {}", path.display());
        Ok(())
    }
    /// [`SystemRegistry::add`] checks the name as well, but only after the element has been constructed. Checking
    /// here first reports [`OptiSimError::DuplicateName`] even if the new lens parameters are invalid, too.
    fn check_name_free(&self, name: &str) -> OptiResult<()> {
        if self.registry.contains(name) {
            return Err(OptiSimError::DuplicateName(format!(
                "an element named '{name}' already exists"
            )));
        }
        Ok(())
    }
    /// Add a [`ThinLens`] with the given name.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - an element with this name already exists.
    ///   - the focal length is zero or a parameter is not finite.
    ///   - the name is empty.
    ///   - the lens would coincide with or overlap an existing element.
    pub fn add_thin_lens(&mut self, name: &str, x: f64, f: f64) -> OptiResult<()> {
        self.check_name_free(name)?;
        self.registry.add(name, ThinLens::new(x, f)?.into())
    }
    /// Add a [`ThickLens`] with the given name.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - an element with this name already exists.
    ///   - one of the lens parameters is invalid (see [`ThickLens::new`]).
    ///   - the name is empty.
    ///   - the lens would overlap an existing element.
    pub fn add_thick_lens(
        &mut self,
        name: &str,
        x: f64,
        n: f64,
        d: f64,
        r_left: f64,
        r_right: f64,
    ) -> OptiResult<()> {
        self.check_name_free(name)?;
        self.registry
            .add(name, ThickLens::new(x, n, d, r_left, r_right)?.into())
    }
    /// Change a single field (`x`, `f`, `n`, `d`, `r_left`, `r_right`) of the element with the given name.
    ///
    /// The element is left unchanged if the modification fails.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the element does not exist.
    ///   - the field is unknown or not applicable to this element type.
    ///   - the new value is invalid or leads to an overlap with another element.
    pub fn modify_optical_object(&mut self, name: &str, field: &str, value: f64) -> OptiResult<()> {
        self.registry.modify(name, field, value)
    }
    /// Change a single field (`x` or `y`) of the light source.
    ///
    /// # Errors
    ///
    /// This function will return an error if the field is unknown or the value is not finite.
    pub fn modify_light_source(&mut self, field: &str, value: f64) -> OptiResult<()> {
        self.light_source.modify(field, value)
    }
    /// Remove the element with the given name.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn remove(&mut self, name: &str) -> OptiResult<()> {
        let element = self.registry.remove(name)?;
        debug!("removed {name}: {element}");
        Ok(())
    }
    /// Returns a snapshot of all elements keyed by their names.
    #[must_use]
    pub fn system_elements(&self) -> BTreeMap<String, OpticalElement> {
        self.registry.snapshot()
    }
    /// Returns the element registry of this [`OpticalSystem`].
    #[must_use]
    pub const fn registry(&self) -> &SystemRegistry {
        &self.registry
    }
    /// Returns the light source of this [`OpticalSystem`].
    #[must_use]
    pub const fn light_source(&self) -> LightSource {
        self.light_source
    }
    /// Returns the ray tracing configuration of this [`OpticalSystem`].
    #[must_use]
    pub const fn config(&self) -> &RayTraceConfig {
        &self.config
    }
    /// Sets the ray tracing configuration of this [`OpticalSystem`].
    pub fn set_config(&mut self, config: RayTraceConfig) {
        self.config = config;
    }
    /// Calculate the image of the light source formed by the complete system.
    ///
    /// If the rays leave the system parallel, the image lies at infinity. Side and type of such an image follow the
    /// sign of the focal length of the last element (`+inf` real for converging, `-inf` virtual for diverging), the
    /// same rule as used for [`image_sequence`](Self::image_sequence). Its (large but finite) height is determined by
    /// shifting the light source slightly away from the system and tracing again. The light source is restored
    /// afterwards.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the system does not contain any element.
    ///   - the ray state overflows on its way through the system.
    pub fn calculate(&mut self) -> OptiResult<Image> {
        let result = RayTracer::new(&self.registry, &self.config).trace(&self.light_source)?;
        if let Some(image) = result.image() {
            info!("{image}");
            return Ok(image);
        }
        info!("rays leave the system parallel, image at infinity");
        let at_infinity = result.final_image();
        let image = match self.probe_infinite_height()? {
            Some(y) => Image::new(at_infinity.x(), y, at_infinity.kind()),
            None => {
                warn!("probing the image at infinity failed, rays stay parallel");
                at_infinity
            }
        };
        info!("{image}");
        Ok(image)
    }
    /// Height of the image of a slightly shifted light source or `None` if its rays stay parallel, too.
    fn probe_infinite_height(&mut self) -> OptiResult<Option<f64>> {
        let first_x = self.registry.first().map_or(0.0, OpticalElement::x);
        let tracer = RayTracer::new(&self.registry, &self.config);
        let mut probe = LightSourceProbe::new(&mut self.light_source);
        let scale = (first_x - probe.source().x()).abs().max(1.0);
        probe.shift_x(-self.config.probe_epsilon() * scale);
        let probed = tracer.trace(probe.source())?.image();
        if let Some(probed) = &probed {
            debug!("probe image: {probed}");
        }
        Ok(probed.map(|image| image.y()))
    }
    /// Returns the polylines of both characteristic rays (`ray_1`, `ray_2`).
    ///
    /// # Errors
    ///
    /// This function will return an error if the system does not contain any element.
    pub fn rays(&self) -> OptiResult<BTreeMap<String, RayPath>> {
        let result = RayTracer::new(&self.registry, &self.config).trace(&self.light_source)?;
        Ok(result.ray_paths(&result.final_image()))
    }
    /// Returns the intermediate images behind each element in ascending axial order.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system does not contain any element.
    pub fn image_sequence(&self) -> OptiResult<Vec<Image>> {
        let result = RayTracer::new(&self.registry, &self.config).trace(&self.light_source)?;
        Ok(result.image_sequence().to_vec())
    }
}
