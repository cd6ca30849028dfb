//! Scene-graph value types for the vox-memento history engine.
//!
//! The history engine records per-node deltas; everything it needs to know
//! about the scene graph is the clonable value surface defined here: node
//! identity and hierarchy edges, regions, dense voxel volumes, palettes,
//! key frames, and string properties. No scene-graph *behavior* lives in
//! this crate.

pub mod keyframe;
pub mod node;
pub mod palette;
pub mod region;
pub mod volume;

pub use keyframe::{InterpolationType, KeyFrame, KeyFrames, KeyFramesMap};
pub use node::{
    NodeId, NodeProperties, SceneNode, SceneNodeType, INVALID_NODE_ID, ROOT_NODE_ID,
};
pub use palette::{Palette, MAX_PALETTE_ENTRIES};
pub use region::Region;
pub use volume::{RawVolume, Voxel, VOXEL_STRIDE};
