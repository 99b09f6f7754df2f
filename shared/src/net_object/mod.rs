mod mask_layout;
mod mask_mutator;
mod net_flags;
mod object;

pub use mask_layout::{MaskLayout, MaskLayoutError, MASK_CAPACITY};
pub use mask_mutator::MaskMutator;
pub use net_flags::NetFlags;
pub use object::{NetObject, NetObjectError};
