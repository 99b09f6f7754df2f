use std::fmt;

use thiserror::Error;

use crate::{
    net_object::{MaskLayout, MaskMutator, NetFlags},
    types::{ConnectionKey, ObjectKey},
    BitReader, BitWrite, SerdeErr,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NetObjectError {
    #[error("A ghost proxy cannot itself be ghostable, flags {flags:?}")]
    GhostCannotBeGhostable { flags: NetFlags },
}

/// Root of every replicated type chain.
///
/// Owns the replication flags and, once inserted into a `HostWorld`, the
/// mutator that feeds the dirty list.
pub struct NetObject {
    flags: NetFlags,
    mutator: Option<MaskMutator>,
}

impl NetObject {
    /// Set on the first update a connection receives after scope entry
    pub const INITIAL_UPDATE_MASK: u32 = MaskLayout::ROOT.bit(0);
    pub const MASK_LAYOUT: MaskLayout = MaskLayout::ROOT.claim(1);

    pub fn new(flags: NetFlags) -> Result<Self, NetObjectError> {
        Self::check_flags(flags)?;
        Ok(Self {
            flags,
            mutator: None,
        })
    }

    /// Authoritative object that may be replicated.
    pub fn ghostable() -> Self {
        Self {
            flags: NetFlags::GHOSTABLE,
            mutator: None,
        }
    }

    /// Client-side proxy.
    pub fn ghost() -> Self {
        Self {
            flags: NetFlags::IS_GHOST,
            mutator: None,
        }
    }

    pub fn flags(&self) -> NetFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: NetFlags) -> Result<(), NetObjectError> {
        Self::check_flags(flags)?;
        self.flags = flags;
        Ok(())
    }

    pub fn is_ghostable(&self) -> bool {
        self.flags.contains(NetFlags::GHOSTABLE)
    }

    pub fn is_ghost(&self) -> bool {
        self.flags.contains(NetFlags::IS_GHOST)
    }

    pub fn is_scope_always(&self) -> bool {
        self.flags.contains(NetFlags::SCOPE_ALWAYS)
    }

    pub fn set_scope_always(&mut self, scope_always: bool) {
        if scope_always {
            self.flags |= NetFlags::SCOPE_ALWAYS;
        } else {
            self.flags = self.flags.difference(NetFlags::SCOPE_ALWAYS);
        }
    }

    /// Key of the owning `HostWorld` entry, if inserted.
    pub fn key(&self) -> Option<ObjectKey> {
        self.mutator.as_ref().map(MaskMutator::object)
    }

    /// Marks `mask` dirty. A no-op on objects that are not in a `HostWorld`,
    /// which includes every ghost proxy.
    pub fn set_mask_bits(&self, mask: u32) {
        debug_assert!(mask != 0, "set_mask_bits called with an empty mask");
        if let Some(mutator) = &self.mutator {
            mutator.set_mask_bits(mask);
        }
    }

    pub fn clear_mask_bits(&self, mask: u32) {
        if let Some(mutator) = &self.mutator {
            mutator.clear_mask_bits(mask);
        }
    }

    pub fn pack_update(
        &self,
        _connection: &ConnectionKey,
        _mask: u32,
        _writer: &mut dyn BitWrite,
    ) -> u32 {
        0
    }

    pub fn unpack_update(
        &mut self,
        _connection: &ConnectionKey,
        _reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        Ok(())
    }

    pub(crate) fn set_mutator(&mut self, mutator: MaskMutator) {
        self.mutator = Some(mutator);
    }

    pub(crate) fn take_mutator(&mut self) -> Option<MaskMutator> {
        self.mutator.take()
    }

    fn check_flags(flags: NetFlags) -> Result<(), NetObjectError> {
        if flags.contains(NetFlags::IS_GHOST) && flags.contains(NetFlags::GHOSTABLE) {
            return Err(NetObjectError::GhostCannotBeGhostable { flags });
        }
        Ok(())
    }
}

impl Default for NetObject {
    fn default() -> Self {
        Self::ghostable()
    }
}

impl fmt::Debug for NetObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetObject")
            .field("flags", &self.flags)
            .field("key", &self.key())
            .finish()
    }
}
