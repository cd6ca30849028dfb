//! The history handler: records scene edits and resolves undo/redo.
//!
//! Recording is cheap enough to call on every semantic edit: each `mark_*`
//! clones the node's value surface (and compresses its voxel buffer where
//! the kind calls for one) into a [`MementoState`]. Undo never stores a
//! "before" copy; it reconstructs the previous value of the affected
//! attribute by scanning older states of the same node.
//!
//! Replay must not record: the editor wraps the application of an undone
//! group in [`MementoHandler::lock`]/[`MementoHandler::unlock`] (or a
//! [`ScopedMementoLock`]) so re-applying states does not push history.

use std::ops::{Deref, DerefMut};

use vox_scene::{NodeId, RawVolume, Region, SceneNode, INVALID_NODE_ID};

use crate::data::MementoData;
use crate::history::MementoHistory;
use crate::state::{MementoState, MementoStateGroup, MementoType};

/// Records every semantically meaningful scene change and serves
/// transactional undo/redo over them. One handler per document.
#[derive(Debug)]
pub struct MementoHandler {
    history: MementoHistory,
    lock_depth: i32,
    group_depth: i32,
    /// Name of the outermost group that has not materialized yet. The
    /// group shell is only created by the first state recorded inside it,
    /// so a group without marks leaves the log untouched.
    pending_group: Option<String>,
}

impl Default for MementoHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MementoHandler {
    pub fn new() -> Self {
        Self {
            history: MementoHistory::new(),
            lock_depth: 0,
            group_depth: 0,
            pending_group: None,
        }
    }

    /// A handler whose log keeps at most `max_states` groups, evicting
    /// the oldest when the cap is exceeded.
    pub fn with_max_states(max_states: usize) -> Self {
        Self {
            history: MementoHistory::with_max_states(max_states),
            lock_depth: 0,
            group_depth: 0,
            pending_group: None,
        }
    }

    // ── Locking ────────────────────────────────────────────────────────

    /// Suppresses recording until the matching [`unlock`]. Calls nest.
    ///
    /// [`unlock`]: MementoHandler::unlock
    pub fn lock(&mut self) {
        self.lock_depth += 1;
    }

    pub fn unlock(&mut self) {
        debug_assert!(self.lock_depth > 0, "unlock without matching lock");
        self.lock_depth -= 1;
    }

    pub fn locked(&self) -> bool {
        self.lock_depth > 0
    }

    // ── Grouping ───────────────────────────────────────────────────────

    /// Opens a named group; every state recorded until the matching
    /// [`end_group`] joins it and is later undone atomically. Nested
    /// groups merge into the outermost one.
    ///
    /// [`end_group`]: MementoHandler::end_group
    pub fn begin_group(&mut self, name: &str) {
        if self.locked() {
            log::debug!("not opening group '{name}' while recording is locked");
            return;
        }
        log::debug!("begin memento group {}: {name}", self.group_depth);
        if self.group_depth == 0 {
            self.pending_group = Some(name.to_string());
        }
        self.group_depth += 1;
    }

    /// Closes the innermost open group.
    ///
    /// # Panics
    ///
    /// Panics when no group is open.
    pub fn end_group(&mut self) {
        if self.locked() {
            debug_assert!(self.group_depth <= 0);
            log::debug!("not closing group while recording is locked");
            return;
        }
        log::debug!("end memento group: {}", self.group_depth);
        assert!(self.group_depth > 0, "end_group without matching begin_group");
        self.group_depth -= 1;
        if self.group_depth == 0 && self.pending_group.take().is_none() {
            // The group materialized, so at least one state was recorded.
            self.history.commit_open_group();
        }
    }

    // ── Recording ──────────────────────────────────────────────────────

    /// Records a voxel edit on the node. `modified_region` is the area the
    /// edit touched; the snapshot still captures the whole volume.
    pub fn mark_modification(&mut self, node: &SceneNode, modified_region: Region) {
        self.mark(node, node.volume(), MementoType::Modification, modified_region);
    }

    pub fn mark_node_added(&mut self, node: &SceneNode) {
        self.mark(node, node.volume(), MementoType::SceneNodeAdded, Region::INVALID);
    }

    /// Records the state a node has when it enters the document, e.g. on
    /// scene load. Identical to [`mark_node_added`].
    ///
    /// [`mark_node_added`]: MementoHandler::mark_node_added
    pub fn mark_initial_node_state(&mut self, node: &SceneNode) {
        self.mark_node_added(node);
    }

    pub fn mark_node_removed(&mut self, node: &SceneNode) {
        self.mark(node, node.volume(), MementoType::SceneNodeRemoved, Region::INVALID);
    }

    pub fn mark_node_renamed(&mut self, node: &SceneNode) {
        self.mark(node, node.volume(), MementoType::SceneNodeRenamed, Region::INVALID);
    }

    /// Records a change of the node's parent edge.
    pub fn mark_node_moved(&mut self, node: &SceneNode) {
        self.mark(node, None, MementoType::SceneNodeMove, Region::INVALID);
    }

    /// Records pivot and key-frame changes without a volume snapshot.
    pub fn mark_node_transform(&mut self, node: &SceneNode) {
        self.mark(node, None, MementoType::SceneNodeTransform, Region::INVALID);
    }

    /// Records a palette change. When `modified_region` is valid the
    /// palette edit rewrote voxel indices, so the volume is snapshotted
    /// along with it.
    pub fn mark_palette_change(&mut self, node: &SceneNode, modified_region: Region) {
        let volume = if modified_region.is_valid() {
            node.volume()
        } else {
            None
        };
        self.mark(node, volume, MementoType::SceneNodePaletteChanged, modified_region);
    }

    pub fn mark_key_frames_change(&mut self, node: &SceneNode) {
        self.mark(node, None, MementoType::SceneNodeKeyFrames, Region::INVALID);
    }

    pub fn mark_node_property_change(&mut self, node: &SceneNode) {
        self.mark(node, None, MementoType::SceneNodeProperties, Region::INVALID);
    }

    fn mark(
        &mut self,
        node: &SceneNode,
        volume: Option<&RawVolume>,
        kind: MementoType,
        region: Region,
    ) {
        if self.locked() {
            log::debug!(
                "recording locked, dropping {} for node {}",
                kind.as_str(),
                node.id()
            );
            return;
        }
        log::debug!(
            "new {} state for node {} ({})",
            kind.as_str(),
            node.id(),
            node.name()
        );
        let records_animation = matches!(
            kind,
            MementoType::SceneNodeTransform | MementoType::SceneNodeKeyFrames
        );
        let state = MementoState {
            kind,
            data: MementoData::from_volume(volume, region),
            parent_id: node.parent(),
            node_id: node.id(),
            reference_id: node.reference(),
            name: node.name().to_string(),
            node_type: node.node_type(),
            region,
            pivot: records_animation.then(|| node.pivot()),
            key_frames: records_animation.then(|| node.all_key_frames().clone()),
            palette: Some(node.palette().clone()),
            properties: (kind == MementoType::SceneNodeProperties)
                .then(|| node.properties().clone()),
        };
        self.add_state(state);
    }

    fn add_state(&mut self, state: MementoState) {
        if self.group_depth > 0 {
            if let Some(name) = self.pending_group.take() {
                // First state of the outermost group: this is the point
                // where new history branches off, so the redo tail goes.
                self.history.truncate_redo_tail();
                self.history.open_group(name);
            }
            self.history.append_to_open_group(state);
            return;
        }
        self.history.truncate_redo_tail();
        self.history.push_group(MementoStateGroup::single(state));
    }

    // ── Log maintenance ────────────────────────────────────────────────

    /// Rewrites every recorded reference to `node_id` (as node or parent)
    /// to `new_node_id`. Needed when the scene graph reassigns ids.
    pub fn update_node_id(&mut self, node_id: NodeId, new_node_id: NodeId) {
        self.history.update_node_id(node_id, new_node_id);
    }

    /// Empties the log.
    ///
    /// # Panics
    ///
    /// Panics while a group is being recorded.
    pub fn clear_states(&mut self) {
        assert!(
            self.group_depth <= 0,
            "must not clear states while recording a group"
        );
        self.history.clear();
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of recorded groups.
    pub fn state_size(&self) -> usize {
        self.history.len()
    }

    /// Index of the group an undo would revert; `-1` when there is none.
    pub fn state_position(&self) -> isize {
        self.history.cursor()
    }

    pub fn history(&self) -> &MementoHistory {
        &self.history
    }

    // ── Undo / redo ────────────────────────────────────────────────────

    /// Steps the cursor back and returns the group to re-apply for
    /// reverting the most recent edit, with every state rewritten to the
    /// node's previous value. `None` when there is nothing to undo.
    ///
    /// The caller applies the group and must keep the handler locked
    /// while doing so.
    pub fn undo(&mut self) -> Option<MementoStateGroup> {
        if !self.can_undo() {
            return None;
        }
        log::debug!(
            "undo: {} group(s), current index {}",
            self.history.len(),
            self.history.cursor()
        );
        let group = self.history.groups()[self.history.cursor() as usize].clone();
        debug_assert!(!group.states.is_empty());
        self.history.step_back();

        let mut states = Vec::with_capacity(group.states.len());
        for state in &group.states {
            log::debug!("undo memento type {}", state.kind.as_str());
            let undone = match state.kind {
                MementoType::Modification => self.undo_modification(state),
                MementoType::SceneNodeTransform => self.undo_transform(state),
                MementoType::SceneNodePaletteChanged => self.undo_palette_change(state),
                MementoType::SceneNodeProperties => self.undo_node_properties(state),
                MementoType::SceneNodeKeyFrames => self.undo_key_frames(state),
                MementoType::SceneNodeRenamed => self.undo_rename(state),
                MementoType::SceneNodeMove => self.undo_move(state),
                _ => state.clone(),
            };
            states.push(undone);
        }
        Some(MementoStateGroup {
            name: group.name,
            states,
        })
    }

    /// Steps the cursor forward and returns a copy of the group to
    /// re-apply. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<MementoStateGroup> {
        if !self.can_redo() {
            return None;
        }
        self.history.step_forward();
        log::debug!(
            "redo: {} group(s), current index {}",
            self.history.len(),
            self.history.cursor()
        );
        Some(self.history.groups()[self.history.cursor() as usize].clone())
    }

    // ── Backward scans ─────────────────────────────────────────────────

    /// Finds the nearest state at or before the cursor that belongs to
    /// `node_id` and satisfies `matches`. Groups are scanned newest first;
    /// states inside a group in recording order.
    fn find_previous(
        &self,
        node_id: NodeId,
        matches: impl Fn(&MementoState) -> bool,
    ) -> Option<&MementoState> {
        let cursor = self.history.cursor();
        if cursor < 0 {
            return None;
        }
        for group in self.history.groups()[..=cursor as usize].iter().rev() {
            for prev in &group.states {
                if prev.node_id == node_id && matches(prev) {
                    return Some(prev);
                }
            }
        }
        None
    }

    /// Best-effort recovery when no predecessor matches: the very first
    /// recorded state.
    fn first_recorded_state(&self) -> MementoState {
        self.history.groups()[0].states[0].clone()
    }

    fn undo_modification(&self, state: &MementoState) -> MementoState {
        let found = self.find_previous(state.node_id, |prev| {
            matches!(
                prev.kind,
                MementoType::Modification | MementoType::SceneNodeAdded
            ) && (prev.has_volume_data()
                || (prev.kind == MementoType::SceneNodeAdded
                    && prev.reference_id != INVALID_NODE_ID))
        });
        if let Some(prev) = found {
            // Keep the modified region of the edit being reverted, but
            // restore the volume snapshot of the previous state.
            let mut undone = state.clone();
            undone.data = prev.data.clone();
            undone.reference_id = prev.reference_id;
            undone.node_type = prev.node_type;
            return undone;
        }
        log::warn!(
            "no previous modification state found for node {}",
            state.node_id
        );
        self.first_recorded_state()
    }

    fn undo_transform(&self, state: &MementoState) -> MementoState {
        if let Some(prev) = self.find_previous(state.node_id, |_| true) {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous transform state found for node {}", state.node_id);
        self.first_recorded_state()
    }

    fn undo_palette_change(&self, state: &MementoState) -> MementoState {
        if let Some(prev) = self.find_previous(state.node_id, |prev| prev.palette.is_some()) {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous palette found for node {}", state.node_id);
        self.first_recorded_state()
    }

    fn undo_node_properties(&self, state: &MementoState) -> MementoState {
        if let Some(prev) = self.find_previous(state.node_id, |prev| prev.properties.is_some()) {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous properties found for node {}", state.node_id);
        self.first_recorded_state()
    }

    fn undo_key_frames(&self, state: &MementoState) -> MementoState {
        if let Some(prev) = self.find_previous(state.node_id, |prev| prev.key_frames.is_some()) {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous key frames found for node {}", state.node_id);
        self.first_recorded_state()
    }

    fn undo_rename(&self, state: &MementoState) -> MementoState {
        if let Some(prev) = self.find_previous(state.node_id, |prev| !prev.name.is_empty()) {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous name found for node {}", state.node_id);
        self.first_recorded_state()
    }

    fn undo_move(&self, state: &MementoState) -> MementoState {
        if let Some(prev) =
            self.find_previous(state.node_id, |prev| prev.parent_id != INVALID_NODE_ID)
        {
            return MementoState::with_kind(state.kind, prev);
        }
        log::warn!("no previous parent found for node {}", state.node_id);
        self.first_recorded_state()
    }

    // ── Diagnostics ────────────────────────────────────────────────────

    /// Dumps the whole log through `log::info!`. Wired to the editor's
    /// debug command.
    pub fn print(&self) {
        log::info!("current memento state index: {}", self.history.cursor());
        for group in self.history.groups() {
            log::info!("group: {}", group.name);
            for state in &group.states {
                Self::print_state(state);
            }
        }
    }

    fn print_state(state: &MementoState) {
        log::info!("{}: node id: {}", state.kind.as_str(), state.node_id);
        log::info!(" - parent: {}", state.parent_id);
        log::info!(" - name: {}", state.name);
        log::info!(
            " - volume: {}",
            if state.has_volume_data() { "volume" } else { "empty" }
        );
        log::info!(" - region: {}", state.region);
        log::info!(" - size: {}b", state.data.size());
        match &state.palette {
            Some(palette) => {
                log::info!(" - palette: true [hash: {}]", palette.hash())
            }
            None => log::info!(" - palette: false"),
        }
        match state.pivot {
            Some(pivot) => log::info!(" - pivot: {}:{}:{}", pivot.x, pivot.y, pivot.z),
            None => log::info!(" - pivot: none"),
        }
        match &state.key_frames {
            Some(key_frames) => {
                log::info!(" - key frames");
                for (animation, frames) in key_frames {
                    log::info!("   - animation: {animation}");
                    for frame in frames {
                        log::info!("     - frame: {}", frame.frame_idx);
                        log::info!("       - interpolation: {}", frame.interpolation.as_str());
                        log::info!("       - long rotation: {}", frame.long_rotation);
                        log::info!("       - transform: {}", frame.local_matrix());
                    }
                }
            }
            None => log::info!(" - key frames: none"),
        }
        match &state.properties {
            Some(properties) => {
                log::info!(" - properties");
                for (key, value) in properties {
                    log::info!("   - {key}: {value}");
                }
            }
            None => log::info!(" - properties: none"),
        }
    }
}

/// Keeps the handler locked for the guard's lifetime. Derefs to the
/// handler so replay code can keep using it while recording is off.
pub struct ScopedMementoLock<'a> {
    handler: &'a mut MementoHandler,
}

impl<'a> ScopedMementoLock<'a> {
    pub fn new(handler: &'a mut MementoHandler) -> Self {
        handler.lock();
        Self { handler }
    }
}

impl Drop for ScopedMementoLock<'_> {
    fn drop(&mut self) {
        self.handler.unlock();
    }
}

impl Deref for ScopedMementoLock<'_> {
    type Target = MementoHandler;

    fn deref(&self) -> &MementoHandler {
        self.handler
    }
}

impl DerefMut for ScopedMementoLock<'_> {
    fn deref_mut(&mut self) -> &mut MementoHandler {
        self.handler
    }
}

/// Opens a named group and closes it when dropped.
pub struct ScopedMementoGroup<'a> {
    handler: &'a mut MementoHandler,
}

impl<'a> ScopedMementoGroup<'a> {
    pub fn new(handler: &'a mut MementoHandler, name: &str) -> Self {
        handler.begin_group(name);
        Self { handler }
    }
}

impl Drop for ScopedMementoGroup<'_> {
    fn drop(&mut self) {
        self.handler.end_group();
    }
}

impl Deref for ScopedMementoGroup<'_> {
    type Target = MementoHandler;

    fn deref(&self) -> &MementoHandler {
        self.handler
    }
}

impl DerefMut for ScopedMementoGroup<'_> {
    fn deref_mut(&mut self) -> &mut MementoHandler {
        self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use vox_scene::{SceneNodeType, Voxel};

    fn model(id: NodeId, name: &str, edge: i32) -> SceneNode {
        let mut node = SceneNode::new(id, 0, name, SceneNodeType::Model);
        let mut volume = RawVolume::new(Region::cube(IVec3::ZERO, edge));
        volume.set_voxel(IVec3::ZERO, Voxel::solid(1));
        node.set_volume(Some(volume));
        node
    }

    #[test]
    fn empty_handler_has_nothing_to_replay() {
        let mut handler = MementoHandler::new();
        assert!(!handler.can_undo());
        assert!(!handler.can_redo());
        assert!(handler.undo().is_none());
        assert!(handler.redo().is_none());
    }

    #[test]
    fn locked_marks_do_not_record() {
        let mut handler = MementoHandler::new();
        let node = model(0, "n", 1);
        handler.lock();
        handler.mark_modification(&node, Region::cube(IVec3::ZERO, 1));
        handler.mark_node_added(&node);
        handler.unlock();
        assert_eq!(handler.state_size(), 0);
    }

    #[test]
    fn nested_locks_must_all_release() {
        let mut handler = MementoHandler::new();
        let node = model(0, "n", 1);
        handler.lock();
        handler.lock();
        handler.unlock();
        handler.mark_node_added(&node);
        assert_eq!(handler.state_size(), 0);
        handler.unlock();
        handler.mark_node_added(&node);
        assert_eq!(handler.state_size(), 1);
    }

    #[test]
    fn scoped_lock_unlocks_on_drop() {
        let mut handler = MementoHandler::new();
        let node = model(0, "n", 1);
        {
            let mut locked = ScopedMementoLock::new(&mut handler);
            locked.mark_node_added(&node);
            assert!(locked.locked());
        }
        assert!(!handler.locked());
        assert_eq!(handler.state_size(), 0);
    }

    #[test]
    fn group_without_marks_leaves_the_log_unchanged() {
        let mut handler = MementoHandler::new();
        handler.begin_group("empty");
        handler.end_group();
        assert_eq!(handler.state_size(), 0);
        assert_eq!(handler.state_position(), -1);
    }

    #[test]
    fn nested_groups_merge_into_the_outermost() {
        let mut handler = MementoHandler::new();
        let node = model(0, "n", 1);
        handler.begin_group("outer");
        handler.mark_node_added(&node);
        handler.begin_group("inner");
        handler.mark_modification(&node, Region::cube(IVec3::ZERO, 1));
        handler.end_group();
        handler.mark_node_renamed(&node);
        handler.end_group();

        assert_eq!(handler.state_size(), 1);
        let group = &handler.history().groups()[0];
        assert_eq!(group.name, "outer");
        assert_eq!(group.states.len(), 3);
    }

    #[test]
    #[should_panic(expected = "end_group without matching begin_group")]
    fn end_group_without_begin_is_a_contract_violation() {
        let mut handler = MementoHandler::new();
        handler.end_group();
    }

    #[test]
    #[should_panic(expected = "must not clear states while recording a group")]
    fn clear_states_inside_group_is_a_contract_violation() {
        let mut handler = MementoHandler::new();
        handler.begin_group("g");
        handler.clear_states();
    }

    #[test]
    fn clear_states_empties_the_log() {
        let mut handler = MementoHandler::new();
        let node = model(0, "n", 1);
        handler.mark_node_added(&node);
        handler.mark_node_renamed(&node);
        handler.clear_states();
        assert_eq!(handler.state_size(), 0);
        assert_eq!(handler.state_position(), -1);
        assert!(!handler.can_undo());
    }
}
