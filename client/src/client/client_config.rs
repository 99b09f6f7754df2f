use std::default::Default;

use ghostwire_shared::GhostConfig;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Must match the server's `ServerConfig::ghosting`
    pub ghosting: GhostConfig,
}
