use std::collections::HashMap;

use log::debug;

use crate::{
    chunker::Chunker,
    types::{ConnectionKey, NetIndex, ObjectKey},
};

use super::{
    dirty_list::DirtyList,
    error::GhostError,
    ghost_array::GhostArray,
    ghost_info::{GhostHandle, GhostInfo, GhostStatus},
    net_index_pool::NetIndexPool,
};

struct ConnectionGhosts {
    array: GhostArray,
    by_object: HashMap<ObjectKey, GhostHandle>,
    by_index: HashMap<NetIndex, GhostHandle>,
    index_pool: NetIndexPool,
}

impl ConnectionGhosts {
    fn new(ghost_index_bits: u8) -> Self {
        Self {
            array: GhostArray::new(),
            by_object: HashMap::new(),
            by_index: HashMap::new(),
            index_pool: NetIndexPool::new(ghost_index_bits),
        }
    }
}

/// Dirty list plus every ghost record, shared between a `HostWorld` and the
/// `MaskMutator`s of the objects it owns.
///
/// Single-threaded by contract: objects reach it through `Rc<RefCell<..>>`
/// and nothing may hold a borrow across a call into object code.
#[derive(Default)]
pub struct ReplicationState {
    dirty_list: DirtyList,
    ghosts: Chunker<GhostInfo>,
    object_refs: HashMap<ObjectKey, Vec<GhostHandle>>,
    connections: HashMap<ConnectionKey, ConnectionGhosts>,
}

impl ReplicationState {
    pub fn new() -> Self {
        Self::default()
    }

    // Objects

    pub fn register_object(&mut self, object: ObjectKey) {
        self.dirty_list.register(object);
        self.object_refs.entry(object).or_default();
    }

    /// Forgets `object`, detaching every ghost that references it.
    pub fn unregister_object(&mut self, object: &ObjectKey) {
        let connections: Vec<ConnectionKey> = self
            .object_ghosts(object)
            .into_iter()
            .map(|(_, connection)| connection)
            .collect();
        for connection in connections {
            let _ = self.detach_ghost(&connection, object);
        }
        self.dirty_list.unregister(object);
        self.object_refs.remove(object);
    }

    pub fn is_registered(&self, object: &ObjectKey) -> bool {
        self.object_refs.contains_key(object)
    }

    // Dirty masks

    /// Marks `mask` dirty on `object`. Propagation to ghosts waits for the
    /// next collapse.
    pub fn set_mask_bits(&mut self, object: &ObjectKey, mask: u32) {
        debug_assert!(mask != 0, "set_mask_bits called with an empty mask");
        if mask == 0 {
            return;
        }
        self.dirty_list.set(object, mask);
    }

    /// Clears `mask` from the dirty bits and from every ghost of `object`.
    /// A ghost is only demoted to the zero partition when its pending mask is
    /// exactly `mask`; otherwise the bits are just removed.
    pub fn clear_mask_bits(&mut self, object: &ObjectKey, mask: u32) {
        let Some(handles) = self.object_refs.get(object) else {
            return;
        };
        self.dirty_list.clear(object, mask);

        for handle in handles {
            let Some(info) = self.ghosts.get_mut(handle) else {
                continue;
            };
            if info.update_mask == mask {
                info.update_mask = 0;
                let connection = info.connection;
                if let Some(connection) = self.connections.get_mut(&connection) {
                    connection.array.push_to_zero(&mut self.ghosts, handle);
                }
            } else {
                info.update_mask &= !mask;
            }
        }
    }

    pub fn dirty_bits(&self, object: &ObjectKey) -> u32 {
        self.dirty_list.dirty_bits(object)
    }

    pub fn dirty_list(&self) -> &DirtyList {
        &self.dirty_list
    }

    /// Empties the dirty list, see `DirtyList::drain`.
    pub fn drain_dirty(&mut self) -> Vec<(ObjectKey, u32)> {
        self.dirty_list.drain()
    }

    /// ORs `mask` into a live ghost, promoting it to the pending partition if
    /// it was caught up.
    pub fn merge_update_mask(&mut self, handle: &GhostHandle, mask: u32) {
        if mask == 0 {
            return;
        }
        let Some(info) = self.ghosts.get_mut(handle) else {
            return;
        };
        if info.is_killing() {
            return;
        }

        let was_zero = info.update_mask == 0;
        info.update_mask |= mask;
        if was_zero {
            let connection = info.connection;
            if let Some(connection) = self.connections.get_mut(&connection) {
                connection.array.push_non_zero(&mut self.ghosts, handle);
            }
        }
    }

    // Connections

    pub fn add_connection(&mut self, connection: ConnectionKey, ghost_index_bits: u8) {
        self.connections
            .entry(connection)
            .or_insert_with(|| ConnectionGhosts::new(ghost_index_bits));
    }

    /// Drops every ghost of `connection`, unlinking each from its object
    /// first.
    pub fn remove_connection(&mut self, connection: &ConnectionKey) {
        let Some(ghosts) = self.connections.remove(connection) else {
            return;
        };
        for handle in ghosts.array.all() {
            let Some(info) = self.ghosts.free(handle) else {
                continue;
            };
            if let Some(object) = info.object {
                if let Some(refs) = self.object_refs.get_mut(&object) {
                    refs.retain(|other| other != handle);
                }
            }
        }
    }

    pub fn has_connection(&self, connection: &ConnectionKey) -> bool {
        self.connections.contains_key(connection)
    }

    pub fn connections(&self) -> impl Iterator<Item = &ConnectionKey> {
        self.connections.keys()
    }

    // Ghosts

    /// Starts ghosting `object` to `connection`. The new ghost owes its full
    /// state and sits in the pending partition.
    pub fn attach_ghost(
        &mut self,
        connection_key: &ConnectionKey,
        object: &ObjectKey,
    ) -> Result<GhostHandle, GhostError> {
        let Some(refs) = self.object_refs.get_mut(object) else {
            return Err(GhostError::UnknownObject { object: *object });
        };
        let Some(connection) = self.connections.get_mut(connection_key) else {
            return Err(GhostError::UnknownConnection {
                connection: *connection_key,
            });
        };
        if connection.by_object.contains_key(object) {
            return Err(GhostError::AlreadyGhosted {
                object: *object,
                connection: *connection_key,
            });
        }
        let Some(net_index) = connection.index_pool.generate() else {
            return Err(GhostError::GhostLimitReached {
                connection: *connection_key,
                capacity: connection.index_pool.capacity(),
            });
        };

        let mut info = GhostInfo::new(*connection_key, *object, net_index);
        info.update_mask = u32::MAX;
        let handle = self.ghosts.alloc(info);

        connection.array.push(&mut self.ghosts, handle);
        connection.array.push_non_zero(&mut self.ghosts, &handle);
        connection.by_object.insert(*object, handle);
        connection.by_index.insert(net_index, handle);
        refs.push(handle);

        Ok(handle)
    }

    /// Stops ghosting `object` to `connection`. The ghost leaves the object's
    /// list immediately; if the remote side may know about it, a kill is
    /// queued, otherwise the record is freed on the spot.
    pub fn detach_ghost(
        &mut self,
        connection_key: &ConnectionKey,
        object: &ObjectKey,
    ) -> Result<(), GhostError> {
        let Some(connection) = self.connections.get_mut(connection_key) else {
            return Err(GhostError::UnknownConnection {
                connection: *connection_key,
            });
        };
        let Some(handle) = connection.by_object.remove(object) else {
            return Err(GhostError::NotGhosted {
                object: *object,
                connection: *connection_key,
            });
        };
        if let Some(refs) = self.object_refs.get_mut(object) {
            refs.retain(|other| *other != handle);
        }

        let Some(info) = self.ghosts.get_mut(&handle) else {
            return Ok(());
        };
        if info.status == GhostStatus::NotYetGhosted {
            self.free_ghost(&handle);
            return Ok(());
        }

        debug!(
            "queueing kill of ghost {} on {}",
            info.net_index, connection_key
        );
        info.status = GhostStatus::KillPending;
        info.object = None;
        info.update_mask = u32::MAX;
        connection.array.push_non_zero(&mut self.ghosts, &handle);
        Ok(())
    }

    pub fn ghost(&self, handle: &GhostHandle) -> Option<&GhostInfo> {
        self.ghosts.get(handle)
    }

    pub fn ghost_for(&self, connection: &ConnectionKey, object: &ObjectKey) -> Option<GhostHandle> {
        self.connections
            .get(connection)?
            .by_object
            .get(object)
            .copied()
    }

    pub fn ghost_by_index(
        &self,
        connection: &ConnectionKey,
        net_index: NetIndex,
    ) -> Option<GhostHandle> {
        self.connections
            .get(connection)?
            .by_index
            .get(&net_index)
            .copied()
    }

    /// Every live ghost of `object` with the connection it belongs to.
    pub fn object_ghosts(&self, object: &ObjectKey) -> Vec<(GhostHandle, ConnectionKey)> {
        let Some(refs) = self.object_refs.get(object) else {
            return Vec::new();
        };
        refs.iter()
            .filter_map(|handle| Some((*handle, self.ghosts.get(handle)?.connection)))
            .collect()
    }

    pub fn pending_ghosts(&self, connection: &ConnectionKey) -> Vec<GhostHandle> {
        self.connections
            .get(connection)
            .map(|connection| connection.array.pending().to_vec())
            .unwrap_or_default()
    }

    pub fn zero_ghosts(&self, connection: &ConnectionKey) -> Vec<GhostHandle> {
        self.connections
            .get(connection)
            .map(|connection| connection.array.zero().to_vec())
            .unwrap_or_default()
    }

    pub fn is_pending(&self, handle: &GhostHandle) -> bool {
        let Some(info) = self.ghosts.get(handle) else {
            return false;
        };
        self.connections
            .get(&info.connection)
            .is_some_and(|connection| connection.array.is_pending(&self.ghosts, handle))
    }

    pub fn ghost_count(&self, connection: &ConnectionKey) -> usize {
        self.connections
            .get(connection)
            .map_or(0, |connection| connection.array.len())
    }

    // Packet bookkeeping

    pub fn set_priority(&mut self, handle: &GhostHandle, priority: f32) {
        if let Some(info) = self.ghosts.get_mut(handle) {
            info.priority = priority;
        }
    }

    pub fn record_skip(&mut self, handle: &GhostHandle) {
        if let Some(info) = self.ghosts.get_mut(handle) {
            info.update_skips += 1;
        }
    }

    /// Stores the bits a `pack_update` call left unwritten. A ghost with
    /// nothing retained drops back to the zero partition.
    pub fn finish_update(&mut self, handle: &GhostHandle, retained: u32) {
        let Some(info) = self.ghosts.get_mut(handle) else {
            return;
        };
        info.update_mask = retained;
        info.update_skips = 0;
        if info.status == GhostStatus::NotYetGhosted {
            info.status = GhostStatus::Ghosting;
        }
        if retained == 0 {
            self.push_to_zero(handle);
        }
    }

    pub fn create_delivered(&mut self, handle: &GhostHandle) {
        if let Some(info) = self.ghosts.get_mut(handle) {
            if info.status == GhostStatus::Ghosting {
                info.status = GhostStatus::Ghosted;
            }
        }
    }

    /// The create never arrived: the ghost owes its full state again.
    pub fn create_dropped(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get_mut(handle) else {
            return;
        };
        if info.status != GhostStatus::Ghosting {
            return;
        }
        debug!("resending create of ghost {}", info.net_index);
        info.status = GhostStatus::NotYetGhosted;
        info.update_mask = u32::MAX;
        self.push_non_zero(handle);
    }

    pub fn begin_kill(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get_mut(handle) else {
            return;
        };
        if info.status != GhostStatus::KillPending {
            return;
        }
        info.status = GhostStatus::Killing;
        info.update_mask = 0;
        info.update_skips = 0;
        self.push_to_zero(handle);
    }

    /// The remote side dropped the ghost: free the record and its index.
    pub fn kill_delivered(&mut self, handle: &GhostHandle) {
        let is_killing = self
            .ghosts
            .get(handle)
            .is_some_and(|info| info.status == GhostStatus::Killing);
        if is_killing {
            self.free_ghost(handle);
        }
    }

    pub fn kill_dropped(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get_mut(handle) else {
            return;
        };
        if info.status != GhostStatus::Killing {
            return;
        }
        debug!("requeueing kill of ghost {}", info.net_index);
        info.status = GhostStatus::KillPending;
        info.update_mask = u32::MAX;
        self.push_non_zero(handle);
    }

    fn push_non_zero(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get(handle) else {
            return;
        };
        if let Some(connection) = self.connections.get_mut(&info.connection) {
            connection.array.push_non_zero(&mut self.ghosts, handle);
        }
    }

    fn push_to_zero(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get(handle) else {
            return;
        };
        if let Some(connection) = self.connections.get_mut(&info.connection) {
            connection.array.push_to_zero(&mut self.ghosts, handle);
        }
    }

    fn free_ghost(&mut self, handle: &GhostHandle) {
        let Some(info) = self.ghosts.get(handle) else {
            return;
        };
        let connection_key = info.connection;
        let net_index = info.net_index;
        let object = info.object;

        if let Some(connection) = self.connections.get_mut(&connection_key) {
            connection.array.remove(&mut self.ghosts, handle);
            connection.by_index.remove(&net_index);
            if let Some(object) = object {
                if connection.by_object.get(&object) == Some(handle) {
                    connection.by_object.remove(&object);
                }
            }
            connection.index_pool.recycle(net_index);
        }
        if let Some(object) = object {
            if let Some(refs) = self.object_refs.get_mut(&object) {
                refs.retain(|other| other != handle);
            }
        }
        self.ghosts.free(handle);
    }
}
