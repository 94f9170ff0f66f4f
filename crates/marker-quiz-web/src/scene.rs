//! Turns a `SceneDecl` into A-Frame / MindAR elements.
//!
//! The tracker emits `targetFound` / `targetLost` on each
//! `a-entity[mindar-image-target]`; listeners forward the anchor's slot into
//! the runner's tracking queue.

use glam::Vec3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use marker_quiz::bridge::protocol::SCENE_PARENT_ID;
use marker_quiz::{AnchorDecl, SceneDecl, TrackingEvent};

type Listener = Closure<dyn FnMut(Event)>;

/// A scene attached to the page, with the listeners that must outlive it.
/// Dropping it detaches the scene before its listeners are freed.
pub struct MountedScene {
    root: Element,
    _listeners: Vec<Listener>,
}

impl Drop for MountedScene {
    fn drop(&mut self) {
        self.root.remove();
    }
}

/// A-Frame vector attribute, e.g. "0 -0.1 0".
pub fn vec3_attr(v: Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

pub fn mindar_image_attr(image_target_src: &str, max_track: u32) -> String {
    format!("imageTargetSrc: {}; maxTrack: {}", image_target_src, max_track)
}

pub fn image_target_attr(target_index: u32) -> String {
    format!("targetIndex: {}", target_index)
}

pub fn enabled_attr(enabled: bool) -> String {
    format!("enabled: {}", enabled)
}

/// Build the scene, append it to the page and hook tracker events.
pub fn mount_scene(document: &Document, decl: &SceneDecl) -> Result<MountedScene, JsValue> {
    let scene = document.create_element("a-scene")?;
    scene.set_attribute(
        "mindar-image",
        &mindar_image_attr(&decl.image_target_src, decl.max_track),
    )?;
    scene.set_attribute("vr-mode-ui", &enabled_attr(false))?;
    scene.set_attribute("device-orientation-permission-ui", &enabled_attr(false))?;

    let assets = document.create_element("a-assets")?;
    for asset in &decl.assets {
        let item = document.create_element("a-asset-item")?;
        item.set_attribute("id", &asset.id)?;
        item.set_attribute("src", &asset.src)?;
        assets.append_child(&item)?;
    }
    scene.append_child(&assets)?;

    let mut listeners = Vec::with_capacity(decl.anchors.len() * 2);
    for anchor in &decl.anchors {
        let entity = create_anchor(document, anchor)?;
        listeners.push(forward(&entity, "targetFound", TrackingEvent::TargetFound { slot: anchor.slot })?);
        listeners.push(forward(&entity, "targetLost", TrackingEvent::TargetLost { slot: anchor.slot })?);
        scene.append_child(&entity)?;
    }

    let camera = document.create_element("a-camera")?;
    camera.set_attribute("position", &vec3_attr(decl.camera.position))?;
    camera.set_attribute("look-controls", &enabled_attr(decl.camera.look_controls))?;
    scene.append_child(&camera)?;

    let parent: Element = match document.get_element_by_id(SCENE_PARENT_ID) {
        Some(el) => el,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .into(),
    };
    parent.append_child(&scene)?;

    log::info!(
        "Scene mounted: {} anchors, {} assets, maxTrack {}",
        decl.anchors.len(),
        decl.assets.len(),
        decl.max_track
    );

    Ok(MountedScene {
        root: scene,
        _listeners: listeners,
    })
}

fn create_anchor(document: &Document, anchor: &AnchorDecl) -> Result<Element, JsValue> {
    let entity = document.create_element("a-entity")?;
    entity.set_attribute("mindar-image-target", &image_target_attr(anchor.target_index))?;

    let model = document.create_element("a-gltf-model")?;
    model.set_attribute("rotation", &vec3_attr(anchor.model.rotation))?;
    model.set_attribute("position", &vec3_attr(anchor.model.position))?;
    model.set_attribute("scale", &vec3_attr(anchor.model.scale))?;
    model.set_attribute("src", &anchor.model.src)?;
    entity.append_child(&model)?;

    Ok(entity)
}

fn forward(target: &Element, event_name: &str, event: TrackingEvent) -> Result<Listener, JsValue> {
    let listener = Closure::wrap(Box::new(move |_: Event| {
        crate::push_tracking(event);
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event_name, listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_formats() {
        assert_eq!(vec3_attr(Vec3::new(0.0, -0.1, 0.0)), "0 -0.1 0");
        assert_eq!(vec3_attr(Vec3::splat(0.08)), "0.08 0.08 0.08");
        assert_eq!(
            mindar_image_attr("/ar/elements.mind", 3),
            "imageTargetSrc: /ar/elements.mind; maxTrack: 3"
        );
        assert_eq!(image_target_attr(2), "targetIndex: 2");
        assert_eq!(enabled_attr(false), "enabled: false");
    }
}
