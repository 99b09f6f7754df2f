use std::default::Default;

use ghostwire_shared::GhostConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Must match the `GhostConfig` of every connecting client
    pub ghosting: GhostConfig,
    /// Whether objects flagged `ScopeAlways` are scoped to every connection
    /// without an explicit `include`
    pub scope_always_on_connect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ghosting: GhostConfig::default(),
            scope_always_on_connect: true,
        }
    }
}
