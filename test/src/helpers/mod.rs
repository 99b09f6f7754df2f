pub mod assertions;
pub mod packet_exchange;
pub mod test_protocol;

pub use assertions::{assert_ghost_mask, assert_ghost_pending, ghost_handle};
pub use packet_exchange::{Delivery, TestLink};
pub use test_protocol::protocol;
