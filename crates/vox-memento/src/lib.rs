//! Transactional undo/redo history for a voxel scene editor.
//!
//! The engine records every semantically meaningful change to the scene
//! graph as a [`MementoState`] inside a [`MementoStateGroup`] and keeps a
//! linear log of those groups with a cursor:
//!
//! - Volume edits carry a zlib-compressed snapshot of the node's voxel
//!   buffer ([`MementoData`]).
//! - Node lifecycle, hierarchy, naming, transform, key-frame, palette and
//!   property changes carry the relevant value-typed attributes.
//! - Undo reconstructs each state's *previous* value by scanning older
//!   states of the same node, so no duplicate "before" snapshots are kept.
//! - Recording can be locked while an undo result is re-applied so replay
//!   does not generate further history.
//!
//! The engine is single-threaded and instantiated per document. It has no
//! wire or on-disk format; the compressed snapshots live only in memory.
//!
//! # Example
//!
//! ```
//! use vox_memento::MementoHandler;
//! use vox_scene::{Region, RawVolume, SceneNode, SceneNodeType};
//! use glam::IVec3;
//!
//! let mut handler = MementoHandler::new();
//!
//! let mut node = SceneNode::new(1, 0, "sphere", SceneNodeType::Model);
//! node.set_volume(Some(RawVolume::new(Region::cube(IVec3::ZERO, 8))));
//! handler.mark_node_added(&node);
//!
//! // ... the editor paints into the volume ...
//! handler.mark_modification(&node, Region::cube(IVec3::ZERO, 8));
//!
//! let group = handler.undo().expect("one edit to revert");
//! handler.lock();
//! // ... the editor re-applies every state in `group` ...
//! handler.unlock();
//! # assert_eq!(group.states.len(), 1);
//! ```

pub mod codec;
pub mod data;
pub mod handler;
pub mod history;
pub mod state;

pub use codec::CodecError;
pub use data::MementoData;
pub use handler::{MementoHandler, ScopedMementoGroup, ScopedMementoLock};
pub use history::MementoHistory;
pub use state::{MementoState, MementoStateGroup, MementoType};
