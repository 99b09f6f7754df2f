use thiserror::Error;

/// Number of bits available to a whole type chain
pub const MASK_CAPACITY: u32 = u32::BITS;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MaskLayoutError {
    #[error("Mask layout overflow: {claimed} bits requested with only {available} of {capacity} still free")]
    Overflow {
        claimed: u32,
        available: u32,
        capacity: u32,
    },
}

/// Tracks the next free mask bit of a replicated type chain.
///
/// Every layer of a chain starts from its parent's layout and claims the bits
/// it needs, so the 32-bit update mask is partitioned across the chain:
///
/// ```
/// use ghostwire_shared::MaskLayout;
///
/// const PARENT: MaskLayout = MaskLayout::ROOT.claim(1);
/// const CHILD_FIRST: u32 = PARENT.bit(0);
/// const CHILD: MaskLayout = PARENT.claim(2);
///
/// assert_eq!(CHILD_FIRST, 1 << 1);
/// assert_eq!(CHILD.next_free_mask(), 1 << 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskLayout {
    shift: u32,
}

impl MaskLayout {
    pub const ROOT: MaskLayout = MaskLayout { shift: 0 };

    /// Claims `count` bits after the ones already in use. Panics when the
    /// chain would need more than 32 bits, at compile time when evaluated in
    /// a `const`.
    pub const fn claim(self, count: u32) -> MaskLayout {
        if count > MASK_CAPACITY - self.shift {
            panic!("mask layout claims more than 32 bits");
        }
        MaskLayout {
            shift: self.shift + count,
        }
    }

    pub const fn try_claim(self, count: u32) -> Result<MaskLayout, MaskLayoutError> {
        let available = MASK_CAPACITY - self.shift;
        if count > available {
            return Err(MaskLayoutError::Overflow {
                claimed: count,
                available,
                capacity: MASK_CAPACITY,
            });
        }
        Ok(MaskLayout {
            shift: self.shift + count,
        })
    }

    /// The `index`-th bit above this layout's used bits.
    pub const fn bit(self, index: u32) -> u32 {
        if index >= MASK_CAPACITY - self.shift {
            panic!("mask bit lies outside the 32-bit mask");
        }
        1 << (self.shift + index)
    }

    pub const fn used_bits(self) -> u32 {
        self.shift
    }

    /// Lowest bit not used by this layout, or 0 once all 32 are taken.
    pub const fn next_free_mask(self) -> u32 {
        if self.shift >= MASK_CAPACITY {
            0
        } else {
            1 << self.shift
        }
    }

    /// Every bit claimed so far.
    pub const fn used_mask(self) -> u32 {
        if self.shift >= MASK_CAPACITY {
            u32::MAX
        } else {
            (1 << self.shift) - 1
        }
    }
}
