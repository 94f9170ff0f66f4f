use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::error::{QuizError, QuizResult};

/// One atom of an element, bound to the printed marker that shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomPart {
    /// Atom/model name (e.g., "H"). Also the asset id.
    pub atom: String,
    /// Index of the image target in the compiled marker set.
    pub target_index: u32,
}

impl AtomPart {
    pub fn new(atom: impl Into<String>, target_index: u32) -> Self {
        Self {
            atom: atom.into(),
            target_index,
        }
    }
}

/// A chemical compound the player has to assemble from markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDefinition {
    /// Display name (e.g., "Agua").
    pub name: String,
    /// Optional formula; falls back to the built-in formula table.
    #[serde(default)]
    pub formula: Option<String>,
    /// Ordered atom parts. The position in this list is the part's slot.
    pub parts: Vec<AtomPart>,
}

impl ElementDefinition {
    pub fn new(name: impl Into<String>, parts: Vec<AtomPart>) -> Self {
        Self {
            name: name.into(),
            formula: None,
            parts,
        }
    }

    /// Number of markers that must be visible at once.
    pub fn marker_count(&self) -> usize {
        self.parts.len()
    }

    /// Human-readable formula, or an empty string if none is known.
    pub fn formula(&self) -> String {
        match &self.formula {
            Some(f) => f.clone(),
            None => builtin_formula(&self.name).unwrap_or_default().to_string(),
        }
    }
}

/// Formulas for compounds the game ships assets for.
pub fn builtin_formula(name: &str) -> Option<&'static str> {
    match name {
        "Agua" => Some("H₂O"),
        "Metano" => Some("CH₄"),
        "Dióxido de Carbono" => Some("CO₂"),
        "Amoníaco" => Some("NH₃"),
        "Metanol" => Some("CH₃OH"),
        _ => None,
    }
}

/// Ordered sequence of elements played in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCatalog {
    pub elements: Vec<ElementDefinition>,
}

impl Default for ElementCatalog {
    fn default() -> Self {
        Self {
            elements: vec![
                ElementDefinition::new(
                    "Agua",
                    vec![AtomPart::new("H", 1), AtomPart::new("O", 2)],
                ),
                ElementDefinition::new(
                    "Metano",
                    vec![AtomPart::new("C", 0), AtomPart::new("H", 1)],
                ),
                ElementDefinition::new(
                    "Dióxido de Carbono",
                    vec![AtomPart::new("C", 0), AtomPart::new("O", 2)],
                ),
            ],
        }
    }
}

impl ElementCatalog {
    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs a session could not be played with.
    pub fn validate(&self) -> QuizResult<()> {
        if self.elements.is_empty() {
            return Err(QuizError::EmptyCatalog);
        }
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if element.parts.is_empty() {
                return Err(QuizError::EmptyElement(element.name.clone()));
            }
            if let Some(part) = element.parts.iter().find(|p| p.target_index == u32::MAX) {
                return Err(QuizError::TargetIndexOutOfRange(
                    element.name.clone(),
                    part.target_index,
                ));
            }
            if !seen.insert(element.name.as_str()) {
                return Err(QuizError::DuplicateElement(element.name.clone()));
            }
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ElementDefinition> {
        self.elements.get(index)
    }

    /// Index of the element with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementDefinition> {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = ElementCatalog::default();
        catalog.validate().unwrap();
        assert_eq!(catalog.len(), 3);
        let water = catalog.get(0).unwrap();
        assert_eq!(water.name, "Agua");
        assert_eq!(water.marker_count(), 2);
        assert_eq!(water.parts[1], AtomPart::new("O", 2));
        assert_eq!(water.formula(), "H₂O");
    }

    #[test]
    fn parse_catalog_with_explicit_formula() {
        let json = r#"{
            "elements": [
                { "name": "Amoníaco", "parts": [
                    { "atom": "N", "target_index": 3 },
                    { "atom": "H", "target_index": 1 }
                ] },
                { "name": "Ozono", "formula": "O₃", "parts": [
                    { "atom": "O", "target_index": 2 }
                ] }
            ]
        }"#;
        let catalog = ElementCatalog::from_json(json).unwrap();
        assert_eq!(catalog.position("Ozono"), Some(1));
        assert_eq!(catalog.get(0).unwrap().formula(), "NH₃");
        assert_eq!(catalog.get(1).unwrap().formula(), "O₃");
    }

    #[test]
    fn unknown_formula_is_empty() {
        let e = ElementDefinition::new("Sal", vec![AtomPart::new("Na", 4)]);
        assert_eq!(e.formula(), "");
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = ElementCatalog::from_json(r#"{ "elements": [] }"#).unwrap_err();
        assert!(matches!(err, QuizError::EmptyCatalog));
    }

    #[test]
    fn rejects_element_without_parts() {
        let err = ElementCatalog::from_json(r#"{ "elements": [ { "name": "X", "parts": [] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, QuizError::EmptyElement(name) if name == "X"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut catalog = ElementCatalog::default();
        catalog.elements.push(catalog.elements[0].clone());
        assert!(matches!(
            catalog.validate(),
            Err(QuizError::DuplicateElement(name)) if name == "Agua"
        ));
    }

    #[test]
    fn rejects_untrackable_target_index() {
        let json = r#"{ "elements": [ { "name": "X", "parts": [
            { "atom": "H", "target_index": 4294967295 }
        ] } ] }"#;
        let err = ElementCatalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            QuizError::TargetIndexOutOfRange(name, index) if name == "X" && index == u32::MAX
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ElementCatalog::from_json("{ nope").unwrap_err();
        assert!(matches!(err, QuizError::Json(_)));
    }
}
