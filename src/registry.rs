#![warn(missing_docs)]
//! The registry of named optical elements of a system.
use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;

use crate::{
    elements::OpticalElement,
    error::{OptiResult, OptiSimError},
};

/// Collection of optical elements, each stored under a unique name.
///
/// The registry guarantees that
///   - every name is unique and non-empty.
///   - every element satisfies the constraints of its type.
///   - no two elements touch or overlap along the optical axis. Hence, the ordering by axial position is unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemRegistry {
    elements: BTreeMap<String, OpticalElement>,
}
impl SystemRegistry {
    /// Creates a new, empty [`SystemRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    /// Returns `true` if the registry does not contain any element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Return `true` if an element with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }
    /// Returns a reference to the element with the given name.
    ///
    /// # Errors
    ///
    /// This function will return an error if no element with the given name exists.
    pub fn get(&self, name: &str) -> OptiResult<&OpticalElement> {
        self.elements
            .get(name)
            .ok_or_else(|| OptiSimError::UnknownElement(format!("no element named '{name}'")))
    }
    /// Add a new element under the given name.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - an element with the same name already exists.
    ///   - the name is empty.
    ///   - the element violates its constraints.
    ///   - the element touches or overlaps with an existing element.
    pub fn add(&mut self, name: &str, element: OpticalElement) -> OptiResult<()> {
        if self.elements.contains_key(name) {
            return Err(OptiSimError::DuplicateName(format!(
                "an element named '{name}' already exists"
            )));
        }
        if name.is_empty() {
            return Err(OptiSimError::InvalidParameter(
                "element name must not be empty".into(),
            ));
        }
        element.validate()?;
        self.check_collisions(name, &element)?;
        debug!("add {name}: {element}");
        self.elements.insert(name.to_owned(), element);
        Ok(())
    }
    /// Change a single field of the element with the given name.
    ///
    /// The registry is left unchanged if the modification fails.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the element does not exist.
    ///   - the field does not exist for this element type.
    ///   - the new value violates the constraints of the element or leads to an overlap with another element.
    pub fn modify(&mut self, name: &str, field: &str, value: f64) -> OptiResult<()> {
        let mut candidate = *self.get(name)?;
        candidate.modify(field, value)?;
        self.check_collisions(name, &candidate)?;
        debug!("modify {name}: {field} = {value}");
        self.elements.insert(name.to_owned(), candidate);
        Ok(())
    }
    /// Remove the element with the given name and return it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn remove(&mut self, name: &str) -> OptiResult<OpticalElement> {
        self.elements
            .remove(name)
            .ok_or_else(|| OptiSimError::UnknownElement(format!("no element named '{name}'")))
    }
    /// Returns a snapshot of all elements keyed by name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, OpticalElement> {
        self.elements.clone()
    }
    /// Returns all elements ordered by ascending axial position.
    #[must_use]
    pub fn sorted_elements(&self) -> Vec<(&str, &OpticalElement)> {
        self.elements
            .iter()
            .map(|(name, element)| (name.as_str(), element))
            .sorted_by(|a, b| a.1.x().total_cmp(&b.1.x()))
            .collect()
    }
    /// Returns the element with the smallest axial position.
    #[must_use]
    pub fn first(&self) -> Option<&OpticalElement> {
        self.elements
            .values()
            .min_by(|a, b| a.x().total_cmp(&b.x()))
    }
    fn check_collisions(&self, name: &str, element: &OpticalElement) -> OptiResult<()> {
        if let Some((other_name, _)) = self
            .elements
            .iter()
            .filter(|(other_name, _)| other_name.as_str() != name)
            .find(|(_, other)| element.collides_with(other))
        {
            return Err(OptiSimError::InvalidParameter(format!(
                "element '{name}' would coincide with or overlap element '{other_name}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::{ThickLens, ThinLens};
    use assert_matches::assert_matches;
    fn thin(x: f64, f: f64) -> OpticalElement {
        ThinLens::new(x, f).unwrap().into()
    }
    #[test]
    fn new() {
        let registry = SystemRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.first().is_none());
    }
    #[test]
    fn add() {
        let mut registry = SystemRegistry::new();
        registry.add("L1", thin(0.0, 10.0)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("L1"));
        assert_matches!(
            registry.add("L1", thin(10.0, 10.0)),
            Err(OptiSimError::DuplicateName(_))
        );
        assert_matches!(
            registry.add("", thin(10.0, 10.0)),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_eq!(registry.len(), 1);
    }
    #[test]
    fn add_unvalidated_element() {
        let mut registry = SystemRegistry::new();
        let element: OpticalElement =
            serde_json::from_str(r#"{"type":"ThinLens","x":20.0,"f":0.0}"#).unwrap();
        assert_matches!(
            registry.add("L1", element),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert!(registry.is_empty());
    }
    #[test]
    fn add_same_position() {
        let mut registry = SystemRegistry::new();
        registry.add("L1", thin(20.0, 10.0)).unwrap();
        assert_matches!(
            registry.add("L2", thin(20.0, -10.0)),
            Err(OptiSimError::InvalidParameter(_))
        );
        let thick = ThickLens::new(18.0, 1.5, 5.0, 10.0, -10.0).unwrap().into();
        assert_matches!(
            registry.add("L3", thick),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_eq!(registry.len(), 1);
    }
    #[test]
    fn modify() {
        let mut registry = SystemRegistry::new();
        registry.add("L1", thin(0.0, 10.0)).unwrap();
        registry.add("L2", thin(20.0, 10.0)).unwrap();
        registry.modify("L1", "x", 5.0).unwrap();
        registry.modify("L1", "f", -5.0).unwrap();
        assert_eq!(registry.get("L1").unwrap(), &thin(5.0, -5.0));
        assert_matches!(
            registry.modify("L3", "x", 5.0),
            Err(OptiSimError::UnknownElement(_))
        );
        assert_matches!(
            registry.modify("L1", "n", 1.5),
            Err(OptiSimError::InvalidField(_))
        );
        assert_matches!(
            registry.modify("L1", "f", 0.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_matches!(
            registry.modify("L1", "x", 20.0),
            Err(OptiSimError::InvalidParameter(_))
        );
        assert_eq!(registry.get("L1").unwrap(), &thin(5.0, -5.0));
    }
    #[test]
    fn modify_own_position() {
        let mut registry = SystemRegistry::new();
        registry
            .add("L1", ThickLens::new(0.0, 1.5, 5.0, 10.0, -10.0).unwrap().into())
            .unwrap();
        registry.modify("L1", "x", 2.0).unwrap();
        registry.modify("L1", "d", 8.0).unwrap();
        assert_eq!(registry.get("L1").unwrap().extent(), (2.0, 10.0));
    }
    #[test]
    fn remove() {
        let mut registry = SystemRegistry::new();
        registry.add("L1", thin(0.0, 10.0)).unwrap();
        assert_eq!(registry.remove("L1").unwrap(), thin(0.0, 10.0));
        assert!(registry.is_empty());
        assert_matches!(registry.remove("L1"), Err(OptiSimError::UnknownElement(_)));
        assert_matches!(registry.get("L1"), Err(OptiSimError::UnknownElement(_)));
    }
    #[test]
    fn sorted_elements() {
        let mut registry = SystemRegistry::new();
        registry.add("a", thin(30.0, 10.0)).unwrap();
        registry.add("b", thin(-10.0, 10.0)).unwrap();
        registry.add("c", thin(10.0, 10.0)).unwrap();
        let names: Vec<&str> = registry.sorted_elements().iter().map(|e| e.0).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(registry.first().unwrap(), &thin(-10.0, 10.0));
    }
    #[test]
    fn snapshot() {
        let mut registry = SystemRegistry::new();
        registry.add("L1", thin(0.0, 10.0)).unwrap();
        let mut snapshot = registry.snapshot();
        snapshot.clear();
        assert_eq!(registry.len(), 1);
    }
}
