use std::any::Any;

use crate::{net_object::NetObject, types::ConnectionKey, BitReader, BitWrite, SerdeErr};

/// A replicated object type: owns its `NetObject` and the bit-level encoding
/// of whichever of its mask bits a connection flushes.
///
/// `pack_update` and `unpack_update` must stay symmetric. Each layer calls
/// its base layer first, on both ends, so field order follows the type chain.
pub trait Replicate: Any {
    /// Human-readable type name, used in logs
    fn name(&self) -> &'static str;

    fn net_object(&self) -> &NetObject;

    fn net_object_mut(&mut self) -> &mut NetObject;

    /// Per-connection filter applied while collapsing the dirty list. Bits
    /// removed here are never queued for `connection`.
    fn filter_mask_bits(&self, mask: u32, _connection: &ConnectionKey) -> u32 {
        mask
    }

    /// Ordering key of pending ghosts when a packet is assembled, higher
    /// goes first.
    fn update_priority(&self, update_mask: u32, update_skips: u32) -> f32 {
        let mut priority = update_skips as f32 * 0.1;
        if update_mask & NetObject::INITIAL_UPDATE_MASK != 0 {
            priority += 1.0;
        }
        priority
    }

    /// Writes the field groups selected by `mask` and returns the bits that
    /// were not fully written and must stay queued.
    fn pack_update(&self, connection: &ConnectionKey, mask: u32, writer: &mut dyn BitWrite) -> u32;

    /// Reads what `pack_update` wrote, in the same order, applying it
    /// immediately.
    fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr>;

    fn to_any(&self) -> &dyn Any;

    fn to_any_mut(&mut self) -> &mut dyn Any;

    /// Blank client-side proxy, filled in by its first update.
    fn new_ghost() -> Self
    where
        Self: Sized;
}
