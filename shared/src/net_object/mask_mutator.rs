use std::{cell::RefCell, rc::Rc};

use crate::{types::ObjectKey, world::host::ReplicationState};

/// Handle an object uses to mark its own state dirty.
///
/// Installed by `HostWorld` when the object is inserted and removed when it
/// is taken out again.
#[derive(Clone)]
pub struct MaskMutator {
    state: Rc<RefCell<ReplicationState>>,
    object: ObjectKey,
}

impl MaskMutator {
    pub(crate) fn new(state: Rc<RefCell<ReplicationState>>, object: ObjectKey) -> Self {
        Self { state, object }
    }

    pub fn object(&self) -> ObjectKey {
        self.object
    }

    pub fn set_mask_bits(&self, mask: u32) {
        self.state.borrow_mut().set_mask_bits(&self.object, mask);
    }

    pub fn clear_mask_bits(&self, mask: u32) {
        self.state.borrow_mut().clear_mask_bits(&self.object, mask);
    }
}
