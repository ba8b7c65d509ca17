#![warn(missing_docs)]
//! The on-disk representation of an optical system.
//!
//! A system file is a JSON document containing the light source and all named elements:
//! ```json
//! {
//!   "file_version": "1",
//!   "light_source": { "x": 0.0, "y": 8.0 },
//!   "elements": {
//!     "Lens_1": { "type": "ThinLens", "x": 20.0, "f": 10.0 }
//!   }
//! }
//! ```
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::warn;
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use crate::{
    elements::OpticalElement,
    error::{OptiResult, OptiSimError},
    light_source::LightSource,
};

/// Version of the system file format written by this crate.
pub const FILE_VERSION: &str = "1";

fn default_file_version() -> String {
    FILE_VERSION.to_owned()
}

/// Deserialize the element map, rejecting names which occur more than once.
///
/// A plain map would silently keep only the last of several entries with the same name.
fn deserialize_unique_elements<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, OpticalElement>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueElementsVisitor;

    impl<'de> Visitor<'de> for UniqueElementsVisitor {
        type Value = BTreeMap<String, OpticalElement>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a map of uniquely named optical elements")
        }
        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut elements = BTreeMap::new();
            while let Some((name, element)) = map.next_entry::<String, OpticalElement>()? {
                if elements.contains_key(&name) {
                    return Err(de::Error::custom(format!(
                        "duplicate element name '{name}'"
                    )));
                }
                elements.insert(name, element);
            }
            Ok(elements)
        }
    }
    deserializer.deserialize_map(UniqueElementsVisitor)
}

/// Serializable snapshot of an optical system.
///
/// The document is plain data. Constraints of elements and the light source are checked when the document is
/// loaded into an [`OpticalSystem`](crate::OpticalSystem).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemDocument {
    #[serde(default = "default_file_version")]
    file_version: String,
    #[serde(default)]
    light_source: LightSource,
    #[serde(default, deserialize_with = "deserialize_unique_elements")]
    elements: BTreeMap<String, OpticalElement>,
}
impl Default for SystemDocument {
    fn default() -> Self {
        Self {
            file_version: default_file_version(),
            light_source: LightSource::default(),
            elements: BTreeMap::default(),
        }
    }
}
impl SystemDocument {
    /// Creates a new [`SystemDocument`] with the current file version.
    #[must_use]
    pub fn new(light_source: LightSource, elements: BTreeMap<String, OpticalElement>) -> Self {
        Self {
            light_source,
            elements,
            ..Default::default()
        }
    }
    /// Create a new [`SystemDocument`] from a system file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing / deserialization of the file failed.
    pub fn from_file(path: &Path) -> OptiResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OptiSimError::Io(format!("cannot read file {} : {}", path.display(), e))
        })?;
        Self::from_string(&contents)
    }
    /// Create a new [`SystemDocument`] from the given JSON string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parsing of the string failed.
    pub fn from_string(file_string: &str) -> OptiResult<Self> {
        let document: Self = serde_json::from_str(file_string)
            .map_err(|e| OptiSimError::FileFormat(format!("parsing of system failed: {e}")))?;
        if document.file_version != FILE_VERSION {
            warn!(
                "file version '{}' does not match the supported version '{}'. The import might not be correct.",
                document.file_version, FILE_VERSION
            );
        }
        Ok(document)
    }
    /// Save this [`SystemDocument`] to a file with the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization of the document failed.
    ///   - the file cannot be created.
    ///   - it cannot write into the file (e.g. no space).
    pub fn save_to_file(&self, path: &Path) -> OptiResult<()> {
        let serialized = self.to_json_string()?;
        let mut output = File::create(path).map_err(|e| {
            OptiSimError::Io(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        writeln!(output, "{serialized}").map_err(|e| {
            OptiSimError::Io(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
    /// Return the pretty-printed JSON representation of this [`SystemDocument`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails (e.g. for non-finite values).
    pub fn to_json_string(&self) -> OptiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            OptiSimError::FileFormat(format!("serialization of system failed: {e}"))
        })
    }
    /// Returns the file version of this [`SystemDocument`].
    #[must_use]
    pub fn file_version(&self) -> &str {
        &self.file_version
    }
    /// Returns the light source of this [`SystemDocument`].
    #[must_use]
    pub const fn light_source(&self) -> &LightSource {
        &self.light_source
    }
    /// Returns the elements of this [`SystemDocument`].
    #[must_use]
    pub const fn elements(&self) -> &BTreeMap<String, OpticalElement> {
        &self.elements
    }
}
