use ghostwire_shared::{ConnectionKey, ObjectKey};

use crate::server::Server;

pub struct ScopeRef<'s> {
    server: &'s Server,
    key: ConnectionKey,
}

impl<'s> ScopeRef<'s> {
    pub(crate) fn new(server: &'s Server, key: &ConnectionKey) -> Self {
        Self { server, key: *key }
    }

    /// Returns true if the Connection's scope contains the object
    pub fn has(&self, object: &ObjectKey) -> bool {
        self.server.scope_has_object(&self.key, object)
    }

    /// Returns true if the object is currently ghosted to the Connection
    pub fn is_ghosted(&self, object: &ObjectKey) -> bool {
        self.server.scope_is_ghosted(&self.key, object)
    }
}

pub struct ScopeMut<'s> {
    server: &'s mut Server,
    key: ConnectionKey,
}

impl<'s> ScopeMut<'s> {
    pub(crate) fn new(server: &'s mut Server, key: &ConnectionKey) -> Self {
        Self { server, key: *key }
    }

    /// Returns true if the Connection's scope contains the object
    pub fn has(&self, object: &ObjectKey) -> bool {
        self.server.scope_has_object(&self.key, object)
    }

    /// Adds an object to the Connection's scope. It is ghosted on the next
    /// tick.
    pub fn include(&mut self, object: &ObjectKey) -> &mut Self {
        self.server.scope_set_object(&self.key, object, true);

        self
    }

    /// Removes an object from the Connection's scope. Its ghost is killed on
    /// the next tick.
    pub fn exclude(&mut self, object: &ObjectKey) -> &mut Self {
        self.server.scope_set_object(&self.key, object, false);

        self
    }

    /// Removes all objects from the Connection's scope
    pub fn clear(&mut self) -> &mut Self {
        self.server.scope_clear(&self.key);

        self
    }
}
