use crate::chunker::Chunker;

use super::ghost_info::{GhostHandle, GhostInfo};

/// One connection's ghosts, split in two partitions.
///
/// `ghosts[..zero_update_index]` hold pending work and `ghosts[zero_update_index..]`
/// are caught up. Every `GhostInfo` remembers its own slot in `array_index`
/// so moving between partitions is a single swap.
#[derive(Default)]
pub struct GhostArray {
    ghosts: Vec<GhostHandle>,
    zero_update_index: usize,
}

impl GhostArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a ghost to the zero partition.
    pub fn push(&mut self, arena: &mut Chunker<GhostInfo>, handle: GhostHandle) {
        if let Some(info) = arena.get_mut(&handle) {
            info.array_index = self.ghosts.len();
        }
        self.ghosts.push(handle);
    }

    /// Removes a ghost from whichever partition it is in.
    pub fn remove(&mut self, arena: &mut Chunker<GhostInfo>, handle: &GhostHandle) {
        let Some(index) = self.index_of(arena, handle) else {
            return;
        };
        let index = if index < self.zero_update_index {
            self.push_to_zero(arena, handle);
            self.zero_update_index
        } else {
            index
        };

        self.ghosts.swap_remove(index);
        if let Some(moved) = self.ghosts.get(index) {
            if let Some(info) = arena.get_mut(moved) {
                info.array_index = index;
            }
        }
    }

    /// Moves a caught-up ghost into the pending partition.
    pub fn push_non_zero(&mut self, arena: &mut Chunker<GhostInfo>, handle: &GhostHandle) {
        let Some(index) = self.index_of(arena, handle) else {
            return;
        };
        if index < self.zero_update_index {
            return;
        }
        self.swap(arena, index, self.zero_update_index);
        self.zero_update_index += 1;
    }

    /// Moves a pending ghost back into the zero partition.
    pub fn push_to_zero(&mut self, arena: &mut Chunker<GhostInfo>, handle: &GhostHandle) {
        let Some(index) = self.index_of(arena, handle) else {
            return;
        };
        if index >= self.zero_update_index {
            return;
        }
        self.zero_update_index -= 1;
        self.swap(arena, index, self.zero_update_index);
    }

    pub fn is_pending(&self, arena: &Chunker<GhostInfo>, handle: &GhostHandle) -> bool {
        self.index_of(arena, handle)
            .is_some_and(|index| index < self.zero_update_index)
    }

    pub fn pending(&self) -> &[GhostHandle] {
        &self.ghosts[..self.zero_update_index]
    }

    pub fn zero(&self) -> &[GhostHandle] {
        &self.ghosts[self.zero_update_index..]
    }

    pub fn all(&self) -> &[GhostHandle] {
        &self.ghosts
    }

    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    fn index_of(&self, arena: &Chunker<GhostInfo>, handle: &GhostHandle) -> Option<usize> {
        let index = arena.get(handle)?.array_index;
        (self.ghosts.get(index) == Some(handle)).then_some(index)
    }

    fn swap(&mut self, arena: &mut Chunker<GhostInfo>, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.ghosts.swap(a, b);
        for index in [a, b] {
            if let Some(info) = arena.get_mut(&self.ghosts[index]) {
                info.array_index = index;
            }
        }
    }
}
