#![warn(missing_docs)]
//! Analysis reports of an [`OpticalSystem`] as plain text or JSON.
use std::{collections::BTreeMap, fmt::Display};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{
    elements::OpticalElement,
    error::{OptiResult, OptiSimError},
    get_version,
    image::Image,
    light_source::LightSource,
    ray::RayPath,
    OpticalSystem,
};

const SEPARATOR: &str =
    "-------------------------------------------------------------------------------";

#[derive(Serialize, Debug, Clone)]
struct ElementReport {
    name: String,
    #[serde(flatten)]
    element: OpticalElement,
    focal_length: f64,
}

/// Structure for storing the results of an imaging calculation.
#[derive(Serialize, Debug, Clone)]
pub struct AnalysisReport {
    optisim_version: String,
    analysis_timestamp: DateTime<Local>,
    light_source: LightSource,
    elements: Vec<ElementReport>,
    image: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_sequence: Option<Vec<Image>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rays: Option<BTreeMap<String, RayPath>>,
}
impl AnalysisReport {
    /// Calculate the image of the given system and create a report of it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the image calculation fails.
    pub fn new(system: &mut OpticalSystem) -> OptiResult<Self> {
        let image = system.calculate()?;
        let elements = system
            .registry()
            .sorted_elements()
            .into_iter()
            .map(|(name, element)| ElementReport {
                name: name.to_owned(),
                element: *element,
                focal_length: element.focal_length(),
            })
            .collect();
        Ok(Self {
            optisim_version: get_version(),
            analysis_timestamp: Local::now(),
            light_source: system.light_source(),
            elements,
            image,
            image_sequence: None,
            rays: None,
        })
    }
    /// Add the intermediate images of the system to this report.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system does not contain any element.
    pub fn add_image_sequence(&mut self, system: &OpticalSystem) -> OptiResult<()> {
        self.image_sequence = Some(system.image_sequence()?);
        Ok(())
    }
    /// Add the coordinates of both characteristic rays to this report.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system does not contain any element.
    pub fn add_rays(&mut self, system: &OpticalSystem) -> OptiResult<()> {
        self.rays = Some(system.rays()?);
        Ok(())
    }
    /// Returns the calculated image.
    #[must_use]
    pub const fn image(&self) -> &Image {
        &self.image
    }
    /// Return the pretty-printed JSON representation of this report.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_json_string(&self) -> OptiResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| OptiSimError::Other(format!("serialization of report failed: {e}")))
    }
}
impl Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(
            f,
            "OptiSim {} - analysis of {}",
            self.optisim_version,
            self.analysis_timestamp.format("%Y/%m/%d %H:%M:%S")
        )?;
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}", self.light_source)?;
        for report in &self.elements {
            writeln!(
                f,
                "{:<15} {} (focal length: {})",
                report.name, report.element, report.focal_length
            )?;
        }
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}", self.image)?;
        writeln!(f, "{SEPARATOR}")?;
        if let Some(sequence) = &self.image_sequence {
            writeln!(f, "#\tImages\n{SEPARATOR}")?;
            writeln!(f, "{:<15}{:<15}Is real?\n", "X coordinate", "Y coordinate")?;
            for image in sequence {
                writeln!(
                    f,
                    "{:>12.6}{:>15.6}{:>10}",
                    image.x(),
                    image.y(),
                    u8::from(image.is_real())
                )?;
            }
            writeln!(f, "\n{SEPARATOR}")?;
        }
        if let Some(rays) = &self.rays {
            writeln!(f, "#\tRays\n{SEPARATOR}")?;
            writeln!(f, "{:>16}{:>30}\n", "Ray 1", "Ray 2")?;
            writeln!(
                f,
                "{:<15}{:<15}{:<15}{:<15}\n",
                "X coordinate", "Y coordinate", "X coordinate", "Y coordinate"
            )?;
            if let (Some(ray_1), Some(ray_2)) = (rays.get("ray_1"), rays.get("ray_2")) {
                for (((x1, y1), x2), y2) in ray_1
                    .x()
                    .iter()
                    .zip(ray_1.y())
                    .zip(ray_2.x())
                    .zip(ray_2.y())
                {
                    writeln!(f, "{x1:>12.6}{y1:>15.6}{x2:>15.6}{y2:>15.6}")?;
                }
            }
            writeln!(f, "\n{SEPARATOR}")?;
        }
        Ok(())
    }
}
