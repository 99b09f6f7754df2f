mod dirty_list;
mod error;
mod ghost_array;
mod ghost_info;
mod host_world;
mod net_index_pool;
mod replication_state;

pub use dirty_list::{DirtyList, DirtyListIter};
pub use error::GhostError;
pub use ghost_array::GhostArray;
pub use ghost_info::{GhostHandle, GhostInfo, GhostStatus};
pub use host_world::{HostWorld, KILL_PRIORITY};
pub use net_index_pool::NetIndexPool;
pub use replication_state::ReplicationState;
