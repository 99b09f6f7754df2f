use std::{
    any::TypeId,
    collections::{BTreeMap, HashMap, HashSet},
};

use log::{debug, info, warn};

use ghostwire_shared::{
    BitWrite, BitWriter, ConnectionKey, DataBlock, DataBlockError, DataBlockId, GhostError,
    GhostHandle, GhostStatus, HostWorld, KindId, NetIndex, ObjectKey, ObjectKinds, PacketIndex,
    Protocol, Replicate, StreamWriter, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST,
};

use crate::{
    connection::{connection::Connection, sent_packet::SentPacket},
    error::ServerError,
    scope::{ScopeMut, ScopeRef},
    ServerConfig,
};

/// What the writer owes a pending ghost in the packet being assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GhostWrite {
    Kill,
    Create { kind: KindId },
    Update,
}

/// Authoritative replication endpoint.
///
/// Owns the `HostWorld`, the connections and the datablocks. Each tick runs
/// `tick()` once, then `write_packet()` for every connection; the transport
/// reports back through `notify_packet_delivered`/`notify_packet_dropped`.
pub struct Server {
    config: ServerConfig,
    protocol: Protocol,
    world: HostWorld,
    connections: HashMap<ConnectionKey, Connection>,
    next_connection: u64,
    datablocks: BTreeMap<DataBlockId, Box<dyn DataBlock>>,
}

impl Server {
    pub fn new(config: ServerConfig, mut protocol: Protocol) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }

        Self {
            config,
            protocol,
            world: HostWorld::new(),
            connections: HashMap::new(),
            next_connection: 0,
            datablocks: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn world(&self) -> &HostWorld {
        &self.world
    }

    // Connections

    pub fn connect(&mut self) -> ConnectionKey {
        let key = ConnectionKey::new(self.next_connection);
        self.next_connection += 1;

        self.world
            .add_connection(key, self.config.ghosting.ghost_index_bits);
        self.connections.insert(key, Connection::new(key));
        info!("{} connected", key);
        key
    }

    /// Drops the connection and every ghost it owned. No kills are written.
    pub fn disconnect(&mut self, key: &ConnectionKey) -> Result<(), ServerError> {
        if self.connections.remove(key).is_none() {
            return Err(ServerError::UnknownConnection { connection: *key });
        }
        self.world.remove_connection(key);
        info!("{} disconnected", key);
        Ok(())
    }

    pub fn is_connected(&self, key: &ConnectionKey) -> bool {
        self.connections.contains_key(key)
    }

    pub fn connection_keys(&self) -> Vec<ConnectionKey> {
        let mut output: Vec<ConnectionKey> = self.connections.keys().copied().collect();
        output.sort();
        output
    }

    pub fn connection(&self, key: &ConnectionKey) -> Option<&Connection> {
        self.connections.get(key)
    }

    // Objects

    /// Adds an authoritative object. Its type must be registered with the
    /// `Protocol` so remote ends can build its ghost.
    pub fn insert_object<T: Replicate>(&mut self, object: T) -> Result<ObjectKey, ServerError> {
        if self
            .protocol
            .object_kinds
            .kind_of(&TypeId::of::<T>())
            .is_none()
        {
            return Err(ServerError::UnregisteredObject {
                name: object.name(),
            });
        }
        Ok(self.world.insert(object))
    }

    /// Removes an object. Every ghost of it is queued for a kill.
    pub fn remove_object(&mut self, key: &ObjectKey) -> Option<Box<dyn Replicate>> {
        for connection in self.connections.values_mut() {
            connection.scope_forget(key);
        }
        self.world.remove(key)
    }

    pub fn object<T: Replicate>(&self, key: &ObjectKey) -> Option<&T> {
        self.world.get::<T>(key)
    }

    pub fn object_mut<T: Replicate>(&mut self, key: &ObjectKey) -> Option<&mut T> {
        self.world.get_mut::<T>(key)
    }

    pub fn has_object(&self, key: &ObjectKey) -> bool {
        self.world.contains(key)
    }

    // Scopes

    pub fn scope(&self, key: &ConnectionKey) -> Result<ScopeRef<'_>, ServerError> {
        if !self.connections.contains_key(key) {
            return Err(ServerError::UnknownConnection { connection: *key });
        }
        Ok(ScopeRef::new(self, key))
    }

    pub fn scope_mut(&mut self, key: &ConnectionKey) -> Result<ScopeMut<'_>, ServerError> {
        if !self.connections.contains_key(key) {
            return Err(ServerError::UnknownConnection { connection: *key });
        }
        Ok(ScopeMut::new(self, key))
    }

    pub(crate) fn scope_has_object(&self, key: &ConnectionKey, object: &ObjectKey) -> bool {
        self.connections
            .get(key)
            .is_some_and(|connection| connection.scope_has(object))
    }

    pub(crate) fn scope_is_ghosted(&self, key: &ConnectionKey, object: &ObjectKey) -> bool {
        self.connections
            .get(key)
            .is_some_and(|connection| connection.is_ghosted(object))
    }

    pub(crate) fn scope_set_object(&mut self, key: &ConnectionKey, object: &ObjectKey, in_scope: bool) {
        if let Some(connection) = self.connections.get_mut(key) {
            connection.scope_set(object, in_scope);
        }
    }

    pub(crate) fn scope_clear(&mut self, key: &ConnectionKey) {
        if let Some(connection) = self.connections.get_mut(key) {
            connection.scope_clear();
        }
    }

    // Datablocks

    pub fn add_datablock<T: DataBlock>(
        &mut self,
        id: DataBlockId,
        datablock: T,
    ) -> Result<(), ServerError> {
        DataBlockError::check_id(id)?;
        if self.datablocks.contains_key(&id) {
            return Err(DataBlockError::IdInUse { id }.into());
        }
        if self
            .protocol
            .datablock_kinds
            .kind_of(&TypeId::of::<T>())
            .is_none()
        {
            return Err(ServerError::UnregisteredDataBlock {
                name: datablock.name(),
            });
        }
        self.datablocks.insert(id, Box::new(datablock));
        Ok(())
    }

    pub fn datablock<T: DataBlock>(&self, id: &DataBlockId) -> Option<&T> {
        self.datablocks.get(id)?.to_any().downcast_ref::<T>()
    }

    /// Serializes every datablock for the preload phase, in id order:
    /// `flag continue; ranged kind; ranged id; pack_data`, ended by a false
    /// flag.
    pub fn write_datablocks(&self) -> Vec<u8> {
        let kinds = &self.protocol.datablock_kinds;
        let mut writer = StreamWriter::new();

        for (id, datablock) in &self.datablocks {
            let Some(kind) = kinds.kind_of_datablock(datablock.as_ref()) else {
                continue;
            };
            writer.write_flag(true);
            kinds.write_kind(&mut writer, kind);
            writer.write_ranged_u32(*id, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST);
            datablock.pack_data(&mut writer);
        }
        writer.write_flag(false);

        debug!(
            "datablock preload of {} blocks, {} bits",
            self.datablocks.len(),
            writer.bits_written()
        );
        writer.to_bytes()
    }

    // Ticking

    /// Collapses the dirty list, then brings every connection's ghosts in
    /// line with its scope.
    pub fn tick(&mut self) {
        self.world.collapse_dirty_list();
        self.update_scopes();
    }

    fn update_scopes(&mut self) {
        let scope_always: Vec<ObjectKey> = if self.config.scope_always_on_connect {
            self.world
                .keys()
                .filter(|key| {
                    self.world
                        .object(key)
                        .is_some_and(|object| object.net_object().is_scope_always())
                })
                .copied()
                .collect()
        } else {
            Vec::new()
        };

        for connection in self.connections.values_mut() {
            let key = connection.key();
            let wanted: HashSet<ObjectKey> = self
                .world
                .keys()
                .filter(|object| connection.scope_has(object))
                .chain(scope_always.iter())
                .copied()
                .collect();

            let leaving: Vec<ObjectKey> = connection
                .ghosted()
                .filter(|object| !wanted.contains(object))
                .copied()
                .collect();
            for object in leaving {
                if let Err(error) = self.world.detach_ghost(&key, &object) {
                    warn!("cannot kill ghost: {}", error);
                }
                connection.set_ghosted(&object, false);
            }

            // sorted so ghost indices are handed out deterministically
            let mut entering: Vec<ObjectKey> = wanted
                .into_iter()
                .filter(|object| !connection.is_ghosted(object))
                .collect();
            entering.sort();
            for object in entering {
                match self.world.attach_ghost(&key, &object) {
                    Ok(_) => {
                        info!("ghosting {} to {}", object, key);
                        connection.set_ghosted(&object, true);
                    }
                    Err(GhostError::NotGhostable { .. }) => {}
                    Err(error) => {
                        warn!("cannot ghost {}: {}", object, error);
                        break;
                    }
                }
            }
        }
    }

    // Packets

    /// Assembles the next ghost packet for `key`: pending ghosts by
    /// descending priority, as many as fit in `GhostConfig::packet_bits`.
    pub fn write_packet(
        &mut self,
        key: &ConnectionKey,
    ) -> Result<(PacketIndex, Vec<u8>), ServerError> {
        let Some(connection) = self.connections.get_mut(key) else {
            return Err(ServerError::UnknownConnection { connection: *key });
        };
        let packet_index = connection.next_packet_index();

        let pending = self.world.state().pending_ghosts(key);
        let mut candidates = Vec::with_capacity(pending.len());
        for handle in pending {
            let writable = self
                .world
                .state()
                .ghost(&handle)
                .is_some_and(|info| info.is_writable());
            if writable {
                let priority = self.world.update_priority(&handle);
                candidates.push((handle, priority));
            }
        }
        candidates.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        let max_net_index = self.config.ghosting.max_net_index();
        let mut writer = BitWriter::with_capacity(self.config.ghosting.packet_bits);
        let mut packet = SentPacket::default();
        let mut has_written = false;

        // reserve the terminating flag
        writer.reserve_bits(1);

        for (handle, _) in candidates {
            let Some((net_index, write)) = self.ghost_write(&handle) else {
                continue;
            };
            let mask = self.ghost_mask(&handle);
            if write == GhostWrite::Update && mask == 0 {
                // emptied by a partial clear, nothing left to send
                self.world.state_mut().finish_update(&handle, 0);
                continue;
            }

            let mut counter = writer.counter();
            self.write_ghost_header(&mut counter, net_index, max_net_index, write);
            let retained = match write {
                GhostWrite::Kill => 0,
                _ => self.world.pack_ghost(&handle, &mut counter).unwrap_or(0),
            };
            if counter.overflowed() {
                if !has_written {
                    Self::warn_overflow_ghost(
                        self.ghost_name(&handle),
                        counter.bits_needed(),
                        writer.bits_free(),
                    );
                }
                self.world.state_mut().record_skip(&handle);
                continue;
            }
            // an update that would carry none of its groups waits for more room
            if write == GhostWrite::Update && retained & mask == mask {
                if !has_written {
                    Self::warn_stalled_ghost(self.ghost_name(&handle), writer.bits_free());
                }
                self.world.state_mut().record_skip(&handle);
                continue;
            }

            self.write_ghost_header(&mut writer, net_index, max_net_index, write);
            match write {
                GhostWrite::Kill => {
                    self.world.state_mut().begin_kill(&handle);
                    debug!("killing ghost {} on {}", net_index, key);
                    packet.kills.push(handle);
                }
                GhostWrite::Create { .. } => {
                    self.world.flush_ghost(&handle, &mut writer);
                    packet.creates.push(handle);
                }
                GhostWrite::Update => {
                    if let Some(written) = self.world.flush_ghost(&handle, &mut writer) {
                        packet.updates.push((handle, written));
                    }
                }
            }
            has_written = true;
        }

        writer.release_bits(1);
        writer.write_flag(false);

        if let Some(connection) = self.connections.get_mut(key) {
            connection.record_packet(packet_index, packet);
        }
        Ok((packet_index, writer.to_bytes()))
    }

    /// The remote end acknowledged `packet_index`.
    pub fn notify_packet_delivered(
        &mut self,
        key: &ConnectionKey,
        packet_index: PacketIndex,
    ) -> Result<(), ServerError> {
        let Some(connection) = self.connections.get_mut(key) else {
            return Err(ServerError::UnknownConnection { connection: *key });
        };
        let Some(packet) = connection.take_packet(&packet_index) else {
            return Ok(());
        };

        let mut state = self.world.state_mut();
        for handle in packet.creates() {
            state.create_delivered(handle);
        }
        for handle in packet.kills() {
            state.kill_delivered(handle);
        }
        Ok(())
    }

    /// `packet_index` was lost. Dropped creates and kills are queued again,
    /// and dropped update bits go back to their ghosts unless a newer packet
    /// already carries them.
    pub fn notify_packet_dropped(
        &mut self,
        key: &ConnectionKey,
        packet_index: PacketIndex,
    ) -> Result<(), ServerError> {
        let Some(connection) = self.connections.get_mut(key) else {
            return Err(ServerError::UnknownConnection { connection: *key });
        };
        let Some(packet) = connection.take_packet(&packet_index) else {
            return Ok(());
        };
        debug!("packet {} to {} dropped", packet_index, key);

        let mut state = self.world.state_mut();
        for handle in packet.creates() {
            state.create_dropped(handle);
        }
        for handle in packet.kills() {
            state.kill_dropped(handle);
        }
        for (handle, written) in packet.updates() {
            let lost = connection.resent_since(packet_index, handle, *written);
            state.merge_update_mask(handle, lost);
        }
        Ok(())
    }

    fn ghost_write(&self, handle: &GhostHandle) -> Option<(NetIndex, GhostWrite)> {
        let (net_index, status, object) = {
            let state = self.world.state();
            let info = state.ghost(handle)?;
            (info.net_index(), info.status(), info.object())
        };
        let write = match status {
            GhostStatus::KillPending => GhostWrite::Kill,
            GhostStatus::NotYetGhosted => {
                let object = self.world.object(&object?)?;
                let kind = self.object_kinds().kind_of_object(object)?;
                GhostWrite::Create { kind }
            }
            GhostStatus::Ghosted => GhostWrite::Update,
            GhostStatus::Ghosting | GhostStatus::Killing => return None,
        };
        Some((net_index, write))
    }

    fn write_ghost_header(
        &self,
        writer: &mut dyn BitWrite,
        net_index: NetIndex,
        max_net_index: u32,
        write: GhostWrite,
    ) {
        writer.write_flag(true);
        writer.write_ranged_u32(u32::from(net_index), 0, max_net_index);
        if writer.write_flag(write == GhostWrite::Kill) {
            return;
        }
        if let GhostWrite::Create { kind } = write {
            writer.write_flag(true);
            self.object_kinds().write_kind(writer, kind);
        } else {
            writer.write_flag(false);
        }
    }

    fn ghost_mask(&self, handle: &GhostHandle) -> u32 {
        self.world
            .state()
            .ghost(handle)
            .map_or(0, |info| info.update_mask())
    }

    fn ghost_name(&self, handle: &GhostHandle) -> &'static str {
        let object = self.world.state().ghost(handle).and_then(|info| info.object());
        object
            .and_then(|key| self.world.object(&key))
            .map_or("ghost kill", |object| object.name())
    }

    fn object_kinds(&self) -> &ObjectKinds {
        &self.protocol.object_kinds
    }

    fn warn_stalled_ghost(name: &'static str, bits_free: u32) {
        warn!(
            "Packet Write Error: no pending field group of `{name}` fits in an empty packet of {bits_free} bits! Those groups will never be sent"
        );
    }

    fn warn_overflow_ghost(name: &'static str, bits_needed: u32, bits_free: u32) {
        warn!(
            "Packet Write Error: update of `{name}` requires {bits_needed} bits, but an empty packet only has {bits_free} bits available! It will never be sent"
        );
    }
}

#[cfg(test)]
mod tests {
    use ghostwire_shared::{ConnectionKey, PhysicalZone, Protocol, Trigger};

    use super::Server;
    use crate::{ServerConfig, ServerError};

    fn init_logger() {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init()
            .ok();
    }

    fn server() -> Server {
        let protocol = Protocol::builder().add_object::<Trigger>().build();
        Server::new(ServerConfig::default(), protocol)
    }

    #[test]
    fn unregistered_types_are_refused() {
        init_logger();
        let mut server = server();
        assert!(matches!(
            server.insert_object(PhysicalZone::new()),
            Err(ServerError::UnregisteredObject {
                name: "PhysicalZone"
            })
        ));
        assert!(server.insert_object(Trigger::new()).is_ok());
    }

    #[test]
    fn unknown_connections_are_errors() {
        let mut server = server();
        let stranger = ConnectionKey::new(99);
        assert!(server.write_packet(&stranger).is_err());
        assert!(server.disconnect(&stranger).is_err());
        assert!(server.notify_packet_dropped(&stranger, 0).is_err());
    }

    #[test]
    fn idle_connection_gets_a_bare_terminator() {
        init_logger();
        let mut server = server();
        let connection = server.connect();
        server.tick();

        let (first, bytes) = server.write_packet(&connection).unwrap();
        assert_eq!(bytes, vec![0]);
        let (second, _) = server.write_packet(&connection).unwrap();
        assert_eq!(second, first.wrapping_add(1));
        assert_eq!(server.connection(&connection).unwrap().packets_in_flight(), 0);
    }

    #[test]
    fn scope_changes_apply_on_tick() {
        let mut server = server();
        let connection = server.connect();
        let object = server.insert_object(Trigger::new()).unwrap();

        server.scope_mut(&connection).unwrap().include(&object);
        assert!(server.scope(&connection).unwrap().has(&object));
        assert!(!server.scope(&connection).unwrap().is_ghosted(&object));

        server.tick();
        assert!(server.scope(&connection).unwrap().is_ghosted(&object));
        assert_eq!(server.world().state().ghost_count(&connection), 1);
    }
}
