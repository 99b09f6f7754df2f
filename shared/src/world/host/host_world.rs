use std::{
    cell::{Ref, RefCell, RefMut},
    collections::HashMap,
    rc::Rc,
};

use log::info;

use crate::{
    net_object::MaskMutator,
    types::{ConnectionKey, KeyGenerator, ObjectKey},
    world::object::replicate::Replicate,
    BitWrite,
};

use super::{
    error::GhostError,
    ghost_info::{GhostHandle, GhostStatus},
    replication_state::ReplicationState,
};

/// Priority given to kills so they go out before any update
pub const KILL_PRIORITY: f32 = 10_000.0;

/// Authoritative objects together with the replication state their masks
/// feed.
///
/// Owns the once-per-tick collapse of the dirty list and the per-ghost
/// `pack_update` step; packet framing is left to the connection layer.
pub struct HostWorld {
    state: Rc<RefCell<ReplicationState>>,
    objects: HashMap<ObjectKey, Box<dyn Replicate>>,
    key_generator: KeyGenerator,
}

impl HostWorld {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ReplicationState::new())),
            objects: HashMap::new(),
            key_generator: KeyGenerator::new(),
        }
    }

    // Objects

    pub fn insert<T: Replicate>(&mut self, object: T) -> ObjectKey {
        self.insert_boxed(Box::new(object))
    }

    /// Registers `object` and installs its mask mutator.
    pub fn insert_boxed(&mut self, mut object: Box<dyn Replicate>) -> ObjectKey {
        let key = ObjectKey::new(self.key_generator.generate());
        self.state.borrow_mut().register_object(key);
        object
            .net_object_mut()
            .set_mutator(MaskMutator::new(self.state.clone(), key));

        info!("registered {} as {}", object.name(), key);
        self.objects.insert(key, object);
        key
    }

    /// Takes `key` out of the world. Every ghost of it is detached, so the
    /// returned object can be dropped right away.
    pub fn remove(&mut self, key: &ObjectKey) -> Option<Box<dyn Replicate>> {
        let mut object = self.objects.remove(key)?;
        self.state.borrow_mut().unregister_object(key);
        object.net_object_mut().take_mutator();
        info!("unregistered {} ({})", key, object.name());
        Some(object)
    }

    pub fn get<T: Replicate>(&self, key: &ObjectKey) -> Option<&T> {
        self.objects.get(key)?.to_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Replicate>(&mut self, key: &ObjectKey) -> Option<&mut T> {
        self.objects.get_mut(key)?.to_any_mut().downcast_mut::<T>()
    }

    pub fn object(&self, key: &ObjectKey) -> Option<&dyn Replicate> {
        self.objects.get(key).map(|object| object.as_ref())
    }

    pub fn object_mut(&mut self, key: &ObjectKey) -> Option<&mut dyn Replicate> {
        self.objects.get_mut(key).map(|object| object.as_mut())
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ObjectKey> {
        self.objects.keys()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // Collapse

    /// Fans every dirty object's bits out to its ghosts, filtered per
    /// connection. Runs once per tick, before any packet is written.
    ///
    /// The dirty list is emptied before any filter runs, so an object that
    /// dirties itself from `filter_mask_bits` is picked up by the next
    /// collapse instead of this one.
    pub fn collapse_dirty_list(&mut self) {
        let dirty = self.state.borrow_mut().drain_dirty();

        for (key, mask) in dirty {
            if mask == 0 {
                continue;
            }
            let Some(object) = self.objects.get(&key) else {
                continue;
            };
            let ghosts = self.state.borrow().object_ghosts(&key);
            for (handle, connection) in ghosts {
                let filtered = object.filter_mask_bits(mask, &connection);
                self.state.borrow_mut().merge_update_mask(&handle, filtered);
            }
        }
    }

    // Connections and ghosts

    pub fn add_connection(&mut self, connection: ConnectionKey, ghost_index_bits: u8) {
        self.state
            .borrow_mut()
            .add_connection(connection, ghost_index_bits);
    }

    pub fn remove_connection(&mut self, connection: &ConnectionKey) {
        self.state.borrow_mut().remove_connection(connection);
    }

    /// Starts ghosting `key` to `connection`, refusing objects that are not
    /// ghostable.
    pub fn attach_ghost(
        &mut self,
        connection: &ConnectionKey,
        key: &ObjectKey,
    ) -> Result<GhostHandle, GhostError> {
        let Some(object) = self.objects.get(key) else {
            return Err(GhostError::UnknownObject { object: *key });
        };
        if !object.net_object().is_ghostable() {
            return Err(GhostError::NotGhostable { object: *key });
        }
        self.state.borrow_mut().attach_ghost(connection, key)
    }

    pub fn detach_ghost(
        &mut self,
        connection: &ConnectionKey,
        key: &ObjectKey,
    ) -> Result<(), GhostError> {
        self.state.borrow_mut().detach_ghost(connection, key)
    }

    /// Borrows the replication state. Every `MaskMutator` shares it, so the
    /// guard must be dropped before any object's mask bits are set or the
    /// world is packed, otherwise the `RefCell` panics.
    pub fn state(&self) -> Ref<'_, ReplicationState> {
        self.state.borrow()
    }

    /// Mutable counterpart of [`HostWorld::state`], under the same rule.
    pub fn state_mut(&self) -> RefMut<'_, ReplicationState> {
        self.state.borrow_mut()
    }

    pub fn ghost_for(&self, connection: &ConnectionKey, key: &ObjectKey) -> Option<GhostHandle> {
        self.state.borrow().ghost_for(connection, key)
    }

    pub fn is_pending(&self, handle: &GhostHandle) -> bool {
        self.state.borrow().is_pending(handle)
    }

    pub fn update_mask_of(&self, handle: &GhostHandle) -> Option<u32> {
        self.state.borrow().ghost(handle).map(|info| info.update_mask())
    }

    // Packing

    /// Recomputes and stores the priority of a pending ghost.
    pub fn update_priority(&self, handle: &GhostHandle) -> f32 {
        let (object, mask, skips) = {
            let state = self.state.borrow();
            let Some(info) = state.ghost(handle) else {
                return 0.0;
            };
            (info.object(), info.update_mask(), info.update_skips())
        };

        let priority = match object.and_then(|key| self.objects.get(&key)) {
            Some(object) => object.update_priority(mask, skips),
            None => KILL_PRIORITY,
        };
        self.state.borrow_mut().set_priority(handle, priority);
        priority
    }

    /// Calls the ghost's `pack_update` with its pending mask and returns the
    /// bits it retained. `None` when the ghost has no object to pack, which
    /// is the case for kills.
    pub fn pack_ghost(&self, handle: &GhostHandle, writer: &mut dyn BitWrite) -> Option<u32> {
        let (object, connection, mask) = {
            let state = self.state.borrow();
            let info = state.ghost(handle)?;
            (info.object()?, info.connection(), info.update_mask())
        };
        let object = self.objects.get(&object)?;
        Some(object.pack_update(&connection, mask, writer))
    }

    /// Packs the ghost and hands its pending mask over to whatever the
    /// packet took, keeping only the retained bits queued. Returns the mask
    /// that was requested from `pack_update`.
    pub fn flush_ghost(&self, handle: &GhostHandle, writer: &mut dyn BitWrite) -> Option<u32> {
        let requested = self.state.borrow().ghost(handle)?.update_mask();
        let retained = self.pack_ghost(handle, writer)?;
        self.state.borrow_mut().finish_update(handle, retained);
        Some(requested & !retained)
    }

    pub fn ghost_status(&self, handle: &GhostHandle) -> Option<GhostStatus> {
        self.state.borrow().ghost(handle).map(|info| info.status())
    }
}

impl Default for HostWorld {
    fn default() -> Self {
        Self::new()
    }
}
