use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Placement of an atom model relative to its marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelLayout {
    /// Vertical offset above the marker plane.
    pub position_y: f32,
    /// Model scale.
    pub scale: Vec3,
}

impl ModelLayout {
    pub const fn new(position_y: f32, uniform_scale: f32) -> Self {
        Self {
            position_y,
            scale: Vec3::splat(uniform_scale),
        }
    }
}

impl Default for ModelLayout {
    fn default() -> Self {
        Self::new(0.0, 0.1)
    }
}

/// Name-keyed model layouts with a declared fallback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTable {
    /// Used for any name without an entry.
    pub default: ModelLayout,
    pub entries: HashMap<String, ModelLayout>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        let entries = [
            ("Plant", ModelLayout::new(0.0, 0.1)),
            ("Plant2", ModelLayout::new(0.0, 0.1)),
            ("Words", ModelLayout::new(-0.25, 0.05)),
            ("H", ModelLayout::new(0.0, 0.08)),
            ("O", ModelLayout::new(-0.1, 0.12)),
            ("C", ModelLayout::new(0.0, 0.10)),
            ("N", ModelLayout::new(0.0, 0.09)),
        ]
        .into_iter()
        .map(|(name, layout)| (name.to_string(), layout))
        .collect();

        Self {
            default: ModelLayout::default(),
            entries,
        }
    }
}

impl LayoutTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Exact entry for `name`, without fallback.
    pub fn get(&self, name: &str) -> Option<&ModelLayout> {
        self.entries.get(name)
    }

    /// Layout for `name`, falling back to the default entry.
    /// A miss is logged so misnamed assets show up in the console.
    pub fn lookup(&self, name: &str) -> ModelLayout {
        match self.entries.get(name) {
            Some(layout) => *layout,
            None => {
                log::warn!("No layout for model '{}', using default", name);
                self.default
            }
        }
    }

    /// Names from `names` that would fall back to the default, in input order, deduplicated.
    pub fn missing_keys<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for name in names {
            if !self.entries.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_entries() {
        let table = LayoutTable::default();
        let o = table.lookup("O");
        assert_eq!(o.position_y, -0.1);
        assert_eq!(o.scale, Vec3::splat(0.12));
        assert_eq!(table.lookup("Words").position_y, -0.25);
    }

    #[test]
    fn unknown_falls_back_to_default() {
        let table = LayoutTable::default();
        assert!(table.get("Xe").is_none());
        assert_eq!(table.lookup("Xe"), ModelLayout::new(0.0, 0.1));
    }

    #[test]
    fn missing_keys_are_reported_once() {
        let table = LayoutTable::default();
        let missing = table.missing_keys(["H", "Xe", "O", "Xe", "Na"]);
        assert_eq!(missing, vec!["Xe".to_string(), "Na".to_string()]);
    }

    #[test]
    fn parse_overrides_default() {
        let json = r#"{
            "default": { "position_y": 0.5, "scale": [1.0, 1.0, 1.0] },
            "entries": { "Na": { "position_y": 0.0, "scale": [0.2, 0.2, 0.2] } }
        }"#;
        let table = LayoutTable::from_json(json).unwrap();
        assert_eq!(table.lookup("Na").scale, Vec3::splat(0.2));
        assert_eq!(table.lookup("H").position_y, 0.5);
    }
}
