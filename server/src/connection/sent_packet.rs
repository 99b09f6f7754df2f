use ghostwire_shared::GhostHandle;

/// What one ghost packet carried, kept until it is delivered or dropped.
#[derive(Debug, Default)]
pub struct SentPacket {
    pub(crate) creates: Vec<GhostHandle>,
    pub(crate) updates: Vec<(GhostHandle, u32)>,
    pub(crate) kills: Vec<GhostHandle>,
}

impl SentPacket {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.kills.is_empty()
    }

    /// Bits this packet carried for `handle`, 0 if it carried none.
    pub fn update_mask(&self, handle: &GhostHandle) -> u32 {
        self.updates
            .iter()
            .filter(|(other, _)| other == handle)
            .fold(0, |mask, (_, written)| mask | written)
    }

    pub fn creates(&self) -> &[GhostHandle] {
        &self.creates
    }

    pub fn updates(&self) -> &[(GhostHandle, u32)] {
        &self.updates
    }

    pub fn kills(&self) -> &[GhostHandle] {
        &self.kills
    }
}
