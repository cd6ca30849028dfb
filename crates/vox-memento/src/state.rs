//! Heterogeneous history deltas and the groups that bundle them.

use glam::Vec3;

use vox_scene::{KeyFramesMap, NodeId, NodeProperties, Palette, Region, SceneNodeType};

use crate::data::MementoData;

/// What kind of change a [`MementoState`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MementoType {
    Modification,
    SceneNodeMove,
    SceneNodeAdded,
    SceneNodeRemoved,
    SceneNodeRenamed,
    SceneNodeTransform,
    SceneNodePaletteChanged,
    SceneNodeKeyFrames,
    SceneNodeProperties,
    PaletteChanged,
}

impl MementoType {
    pub fn as_str(self) -> &'static str {
        match self {
            MementoType::Modification => "Modification",
            MementoType::SceneNodeMove => "SceneNodeMove",
            MementoType::SceneNodeAdded => "SceneNodeAdded",
            MementoType::SceneNodeRemoved => "SceneNodeRemoved",
            MementoType::SceneNodeRenamed => "SceneNodeRenamed",
            MementoType::SceneNodeTransform => "SceneNodeTransform",
            MementoType::SceneNodePaletteChanged => "SceneNodePaletteChanged",
            MementoType::SceneNodeKeyFrames => "SceneNodeKeyFrames",
            MementoType::SceneNodeProperties => "SceneNodeProperties",
            MementoType::PaletteChanged => "PaletteChanged",
        }
    }
}

/// One recorded delta: the post-edit value of everything about one node
/// that the recording kind covers.
///
/// The record is wide on purpose; a state stores only the attributes
/// relevant to its kind and leaves the rest `None`. Undo reconstructs the
/// pre-edit value by scanning older states, so no "before" copy is kept.
///
/// States are immutable once logged except for node-id rewrites, which
/// happen when the scene graph reassigns ids.
#[derive(Debug, Clone)]
pub struct MementoState {
    pub kind: MementoType,
    /// Compressed voxel snapshot; empty for kinds without volume capture.
    pub data: MementoData,
    pub parent_id: NodeId,
    pub node_id: NodeId,
    /// Node this one references, or `INVALID_NODE_ID`.
    pub reference_id: NodeId,
    /// Node name at recording time; may be empty.
    pub name: String,
    pub node_type: SceneNodeType,
    /// The modified region for `Modification` states; invalid otherwise.
    /// The snapshot's own region lives in `data`.
    pub region: Region,
    pub pivot: Option<Vec3>,
    pub key_frames: Option<KeyFramesMap>,
    pub palette: Option<Palette>,
    pub properties: Option<NodeProperties>,
}

impl MementoState {
    /// A copy of `other` recorded under a different kind. This is how undo
    /// turns a found predecessor into the state to re-apply.
    pub fn with_kind(kind: MementoType, other: &MementoState) -> Self {
        Self {
            kind,
            ..other.clone()
        }
    }

    pub fn has_volume_data(&self) -> bool {
        self.data.has_volume()
    }

    /// Region of the captured snapshot (not the modified region).
    pub fn data_region(&self) -> Region {
        self.data.region()
    }
}

/// Structural equality over everything except the compressed bytes, which
/// have no meaningful equality of their own.
impl PartialEq for MementoState {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.parent_id == other.parent_id
            && self.node_id == other.node_id
            && self.reference_id == other.reference_id
            && self.name == other.name
            && self.node_type == other.node_type
            && self.region == other.region
            && self.pivot == other.pivot
            && self.key_frames == other.key_frames
            && self.palette == other.palette
            && self.properties == other.properties
    }
}

/// An ordered, named bundle of states the editor applies atomically.
///
/// A group with no states is invalid and never reaches the log.
#[derive(Debug, Clone, PartialEq)]
pub struct MementoStateGroup {
    pub name: String,
    pub states: Vec<MementoState>,
}

impl MementoStateGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
        }
    }

    /// The singleton group created for an ungrouped mark.
    pub fn single(state: MementoState) -> Self {
        Self {
            name: "single".to_string(),
            states: vec![state],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vox_scene::INVALID_NODE_ID;

    fn state(kind: MementoType, node_id: NodeId) -> MementoState {
        MementoState {
            kind,
            data: MementoData::empty(),
            parent_id: 0,
            node_id,
            reference_id: INVALID_NODE_ID,
            name: "node".to_string(),
            node_type: SceneNodeType::Model,
            region: Region::INVALID,
            pivot: None,
            key_frames: None,
            palette: None,
            properties: None,
        }
    }

    #[test]
    fn equality_ignores_snapshot_bytes() {
        let a = state(MementoType::SceneNodeRenamed, 1);
        let mut b = a.clone();
        b.data = MementoData::from_compressed(vec![1, 2, 3], Region::INVALID);
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_fields() {
        let a = state(MementoType::SceneNodeRenamed, 1);
        let mut b = a.clone();
        b.name = "other".to_string();
        assert_ne!(a, b);
    }

    #[test]
    fn with_kind_overrides_only_the_kind() {
        let prev = state(MementoType::SceneNodeAdded, 3);
        let s = MementoState::with_kind(MementoType::SceneNodeRenamed, &prev);
        assert_eq!(s.kind, MementoType::SceneNodeRenamed);
        assert_eq!(s.node_id, prev.node_id);
        assert_eq!(s.name, prev.name);
    }

    #[test]
    fn singleton_group_name() {
        let g = MementoStateGroup::single(state(MementoType::Modification, 0));
        assert_eq!(g.name, "single");
        assert_eq!(g.states.len(), 1);
    }

    #[test]
    fn type_names_match_kind() {
        assert_eq!(MementoType::Modification.as_str(), "Modification");
        assert_eq!(MementoType::PaletteChanged.as_str(), "PaletteChanged");
    }
}
