use std::any::Any;

use crate::{world::object::datablock::DataBlock, BitReader, BitWrite, Serde, SerdeErr};

/// Shared configuration of a family of triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerData {
    tick_period_ms: i32,
    is_client_side: bool,
}

impl TriggerData {
    /// Shortest allowed period between tick commands
    pub const MIN_TICK_PERIOD_MS: i32 = 100;
    pub const DEFAULT_TICK_PERIOD_MS: i32 = 100;

    pub fn new(tick_period_ms: i32, is_client_side: bool) -> Self {
        Self {
            tick_period_ms: tick_period_ms.max(Self::MIN_TICK_PERIOD_MS),
            is_client_side,
        }
    }

    pub fn tick_period_ms(&self) -> i32 {
        self.tick_period_ms
    }

    pub fn is_client_side(&self) -> bool {
        self.is_client_side
    }
}

impl Default for TriggerData {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICK_PERIOD_MS, false)
    }
}

impl DataBlock for TriggerData {
    fn name(&self) -> &'static str {
        "TriggerData"
    }

    fn pack_data(&self, writer: &mut dyn BitWrite) {
        self.tick_period_ms.ser(writer);
        self.is_client_side.ser(writer);
    }

    fn unpack_data(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr> {
        self.tick_period_ms = i32::de(reader)?;
        self.is_client_side = bool::de(reader)?;
        Ok(())
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn new_empty() -> Self {
        Self::default()
    }
}
