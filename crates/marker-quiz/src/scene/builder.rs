//! Declarative description of the marker-anchored AR scene.
//!
//! The core never creates DOM nodes. It produces a `SceneDecl` that the web
//! bridge turns into `a-scene` / `a-assets` / `a-entity` elements. Keeping the
//! declaration as plain data makes the layout logic testable on the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::config::QuizConfig;
use crate::api::types::Slot;
use crate::assets::catalog::AtomPart;
use crate::assets::layout::LayoutTable;

/// A model asset to preload (`a-asset-item`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDecl {
    pub id: String,
    pub src: String,
}

/// The model shown on top of a marker (`a-gltf-model`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDecl {
    /// Asset reference, `#<asset id>`.
    pub src: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

/// One tracked image target with its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDecl {
    /// Positional index forwarded on found/lost.
    pub slot: Slot,
    /// Image target index in the compiled marker set.
    pub target_index: u32,
    pub model: ModelDecl,
}

/// Fixed camera for the AR view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDecl {
    pub position: Vec3,
    pub look_controls: bool,
}

impl Default for CameraDecl {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_controls: false,
        }
    }
}

/// Complete scene for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDecl {
    pub image_target_src: String,
    /// Number of targets the tracker follows simultaneously.
    pub max_track: u32,
    pub assets: Vec<AssetDecl>,
    pub anchors: Vec<AnchorDecl>,
    pub camera: CameraDecl,
}

impl SceneDecl {
    pub fn anchor(&self, slot: Slot) -> Option<&AnchorDecl> {
        self.anchors.iter().find(|a| a.slot == slot)
    }
}

/// Unique atom names in first-appearance order.
pub fn unique_atoms(parts: &[AtomPart]) -> Vec<&str> {
    let mut atoms: Vec<&str> = Vec::with_capacity(parts.len());
    for part in parts {
        if !atoms.contains(&part.atom.as_str()) {
            atoms.push(&part.atom);
        }
    }
    atoms
}

/// Build the scene declaration for an ordered list of atom parts.
pub fn build_scene(parts: &[AtomPart], layout: &LayoutTable, config: &QuizConfig) -> SceneDecl {
    let max_track = parts
        .iter()
        .map(|p| p.target_index.saturating_add(1))
        .max()
        .unwrap_or(0);

    let assets = unique_atoms(parts)
        .into_iter()
        .map(|atom| AssetDecl {
            id: atom.to_string(),
            src: config.model_path(atom),
        })
        .collect();

    let anchors = parts
        .iter()
        .enumerate()
        .map(|(slot, part)| {
            let placement = layout.lookup(&part.atom);
            AnchorDecl {
                slot: slot as Slot,
                target_index: part.target_index,
                model: ModelDecl {
                    src: format!("#{}", part.atom),
                    position: Vec3::new(0.0, placement.position_y, 0.0),
                    rotation: Vec3::ZERO,
                    scale: placement.scale,
                },
            }
        })
        .collect();

    SceneDecl {
        image_target_src: config.image_target_src.clone(),
        max_track,
        assets,
        anchors,
        camera: CameraDecl::default(),
    }
}
