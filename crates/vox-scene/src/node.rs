//! Scene-graph node surface read by the history recorder.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::keyframe::KeyFramesMap;
use crate::palette::Palette;
use crate::volume::RawVolume;

/// Identifier of a scene-graph node. Ids are reassigned when the graph
/// root restructures, which is why history supports rewriting them.
pub type NodeId = i32;

/// Sentinel for "no node".
pub const INVALID_NODE_ID: NodeId = -1;

/// The scene-graph root always has id zero.
pub const ROOT_NODE_ID: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneNodeType {
    Root,
    Model,
    ModelReference,
    Group,
}

impl SceneNodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            SceneNodeType::Root => "Root",
            SceneNodeType::Model => "Model",
            SceneNodeType::ModelReference => "ModelReference",
            SceneNodeType::Group => "Group",
        }
    }
}

/// Free-form string properties attached to a node.
pub type NodeProperties = BTreeMap<String, String>;

/// A scene-graph node as the history engine sees it.
///
/// This is the narrow accessor surface the recorder reads when a change is
/// marked: identity, hierarchy edges, name, and the attribute values that
/// can appear in a history state. The editor's real node type owns much
/// more; none of it is relevant here.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,
    parent_id: NodeId,
    reference_id: NodeId,
    name: String,
    node_type: SceneNodeType,
    volume: Option<RawVolume>,
    pivot: Vec3,
    key_frames: KeyFramesMap,
    palette: Palette,
    properties: NodeProperties,
}

impl SceneNode {
    pub fn new(
        id: NodeId,
        parent_id: NodeId,
        name: impl Into<String>,
        node_type: SceneNodeType,
    ) -> Self {
        Self {
            id,
            parent_id,
            reference_id: INVALID_NODE_ID,
            name: name.into(),
            node_type,
            volume: None,
            pivot: Vec3::ZERO,
            key_frames: KeyFramesMap::new(),
            palette: Palette::default(),
            properties: NodeProperties::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> NodeId {
        self.parent_id
    }

    pub fn reference(&self) -> NodeId {
        self.reference_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> SceneNodeType {
        self.node_type
    }

    pub fn volume(&self) -> Option<&RawVolume> {
        self.volume.as_ref()
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn all_key_frames(&self) -> &KeyFramesMap {
        &self.key_frames
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn properties(&self) -> &NodeProperties {
        &self.properties
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_parent(&mut self, parent_id: NodeId) {
        self.parent_id = parent_id;
    }

    pub fn set_reference(&mut self, reference_id: NodeId) {
        self.reference_id = reference_id;
    }

    pub fn set_volume(&mut self, volume: Option<RawVolume>) {
        self.volume = volume;
    }

    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    pub fn set_key_frames(&mut self, key_frames: KeyFramesMap) {
        self.key_frames = key_frames;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_defaults() {
        let node = SceneNode::new(1, ROOT_NODE_ID, "model", SceneNodeType::Model);
        assert_eq!(node.id(), 1);
        assert_eq!(node.parent(), ROOT_NODE_ID);
        assert_eq!(node.reference(), INVALID_NODE_ID);
        assert!(node.volume().is_none());
        assert!(node.properties().is_empty());
    }

    #[test]
    fn property_updates_are_visible() {
        let mut node = SceneNode::new(1, 0, "n", SceneNodeType::Model);
        node.set_property("locked", "true");
        assert_eq!(node.properties().get("locked").map(String::as_str), Some("true"));
    }
}
