use crate::world::object::{
    datablock::DataBlock,
    kinds::{DataBlockKinds, ObjectKinds},
    replicate::Replicate,
};

/// Registered object and datablock types, in registration order. Both ends
/// must build the same `Protocol` for kind ids to line up.
#[derive(Default)]
pub struct Protocol {
    pub object_kinds: ObjectKinds,
    pub datablock_kinds: DataBlockKinds,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_object<T: Replicate>(&mut self) -> &mut Self {
        self.check_lock();
        self.object_kinds.add_object::<T>();
        self
    }

    pub fn add_datablock<T: DataBlock>(&mut self) -> &mut Self {
        self.check_lock();
        self.datablock_kinds.add_datablock::<T>();
        self
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Panics once the protocol has been locked
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
