//! Ordered group log with a cursor and an optional length cap.

use vox_scene::NodeId;

use crate::state::{MementoState, MementoStateGroup};

/// The linear history: recorded groups plus the cursor of the most
/// recently applied one.
///
/// `cursor` is `-1` when the log is empty or fully undone, otherwise the
/// index of the group an undo would revert. Groups never have zero states.
#[derive(Debug)]
pub struct MementoHistory {
    groups: Vec<MementoStateGroup>,
    cursor: isize,
    max_states: Option<usize>,
}

impl Default for MementoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MementoHistory {
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            cursor: -1,
            max_states: None,
        }
    }

    /// A history that keeps at most `max_states` groups, dropping the
    /// oldest when the cap is exceeded.
    ///
    /// # Panics
    ///
    /// Panics if `max_states` is zero.
    pub fn with_max_states(max_states: usize) -> Self {
        assert!(max_states > 0, "history cap must be positive");
        Self {
            groups: Vec::new(),
            cursor: -1,
            max_states: Some(max_states),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn groups(&self) -> &[MementoStateGroup] {
        &self.groups
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0 && !self.groups.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.groups.len() as isize
    }

    /// Discards every group after the cursor. Recording anything new makes
    /// the previously undone groups unreachable.
    pub(crate) fn truncate_redo_tail(&mut self) {
        let keep = (self.cursor + 1) as usize;
        if keep < self.groups.len() {
            log::debug!("dropping {} redo group(s)", self.groups.len() - keep);
            self.groups.truncate(keep);
        }
    }

    /// Appends a finished group and moves the cursor onto it.
    pub(crate) fn push_group(&mut self, group: MementoStateGroup) {
        debug_assert!(!group.states.is_empty());
        self.groups.push(group);
        self.cursor = self.groups.len() as isize - 1;
        self.enforce_cap();
    }

    /// Appends an empty group shell that an open recording group fills.
    /// The cursor moves only when the group is committed.
    pub(crate) fn open_group(&mut self, name: String) {
        self.groups.push(MementoStateGroup::new(name));
    }

    pub(crate) fn append_to_open_group(&mut self, state: MementoState) {
        let group = self
            .groups
            .last_mut()
            .expect("no open group to append to");
        group.states.push(state);
    }

    /// Finalizes the open group: the cursor moves onto it and the cap is
    /// applied.
    pub(crate) fn commit_open_group(&mut self) {
        debug_assert!(self
            .groups
            .last()
            .is_some_and(|group| !group.states.is_empty()));
        self.cursor = self.groups.len() as isize - 1;
        self.enforce_cap();
    }

    pub(crate) fn step_back(&mut self) {
        debug_assert!(self.can_undo());
        self.cursor -= 1;
    }

    pub(crate) fn step_forward(&mut self) {
        debug_assert!(self.can_redo());
        self.cursor += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.groups.clear();
        self.cursor = -1;
    }

    /// Rewrites every stored node and parent reference from `node_id` to
    /// `new_node_id`. A no-op when the id does not occur.
    pub(crate) fn update_node_id(&mut self, node_id: NodeId, new_node_id: NodeId) {
        for group in &mut self.groups {
            for state in &mut group.states {
                if state.node_id == node_id {
                    state.node_id = new_node_id;
                }
                if state.parent_id == node_id {
                    state.parent_id = new_node_id;
                }
            }
        }
    }

    fn enforce_cap(&mut self) {
        let Some(max) = self.max_states else {
            return;
        };
        while self.groups.len() > max {
            self.groups.remove(0);
            if self.cursor >= 0 {
                self.cursor -= 1;
            }
        }
    }
}
