use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};

use ghostwire_shared::{
    BitReader, ConnectionKey, DataBlock, DataBlockId, NetIndex, Protocol, Replicate,
    DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST,
};

use crate::{error::ClientError, events::ClientEvent, ClientConfig};

/// Remote end of one server connection: a pool of ghost proxies indexed by
/// the server's per-connection `NetIndex`, plus the preloaded datablocks.
pub struct Client {
    config: ClientConfig,
    protocol: Protocol,
    server: ConnectionKey,
    ghosts: HashMap<NetIndex, Box<dyn Replicate>>,
    datablocks: BTreeMap<DataBlockId, Box<dyn DataBlock>>,
}

impl Client {
    pub fn new(config: ClientConfig, mut protocol: Protocol) -> Self {
        if !protocol.is_locked() {
            protocol.lock();
        }
        Self {
            config,
            protocol,
            server: ConnectionKey::new(0),
            ghosts: HashMap::new(),
            datablocks: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Reads a datablock preload stream, returning how many blocks it held.
    /// Blocks with an id already present replace the old instance.
    pub fn read_datablocks(&mut self, bytes: &[u8]) -> Result<usize, ClientError> {
        let kinds = &self.protocol.datablock_kinds;
        let mut reader = BitReader::new(bytes);
        let mut count = 0;

        while reader.read_flag()? {
            let kind = kinds.read_kind(&mut reader)?;
            let id = reader.read_ranged_u32(DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST)?;
            let Some(mut datablock) = kinds.build(kind) else {
                return Err(ClientError::UnknownDataBlockKind { kind });
            };
            datablock.unpack_data(&mut reader)?;
            debug!("preloaded {} as datablock {}", datablock.name(), id);
            self.datablocks.insert(id, datablock);
            count += 1;
        }

        info!("preloaded {} datablocks", count);
        Ok(count)
    }

    /// Applies one ghost packet. Each ghost's state is applied as soon as
    /// it is read, so a failure part way leaves the earlier ghosts updated.
    pub fn read_packet(&mut self, bytes: &[u8]) -> Result<Vec<ClientEvent>, ClientError> {
        let max_net_index = self.config.ghosting.max_net_index();
        let mut reader = BitReader::new(bytes);
        let mut events = Vec::new();

        while reader.read_flag()? {
            let net_index = reader.read_ranged_u32(0, max_net_index)? as NetIndex;

            // kill
            if reader.read_flag()? {
                if self.ghosts.remove(&net_index).is_some() {
                    debug!("ghost {} killed", net_index);
                    events.push(ClientEvent::GhostKilled { net_index });
                } else {
                    warn!("kill for unknown ghost {}", net_index);
                }
                continue;
            }

            // create
            if reader.read_flag()? {
                let kinds = &self.protocol.object_kinds;
                let kind = kinds.read_kind(&mut reader)?;
                let Some(mut ghost) = kinds.build(kind) else {
                    return Err(ClientError::UnknownObjectKind { kind });
                };
                ghost.unpack_update(&self.server, &mut reader)?;
                info!("ghost {} created as {}", net_index, ghost.name());
                if self.ghosts.insert(net_index, ghost).is_some() {
                    warn!("ghost {} replaced an existing ghost", net_index);
                }
                events.push(ClientEvent::GhostCreated { net_index, kind });
                continue;
            }

            let Some(ghost) = self.ghosts.get_mut(&net_index) else {
                warn!("update for unknown ghost {}", net_index);
                return Err(ClientError::UnknownGhost { net_index });
            };
            ghost.unpack_update(&self.server, &mut reader)?;
            events.push(ClientEvent::GhostUpdated { net_index });
        }

        Ok(events)
    }

    pub fn ghost<T: Replicate>(&self, net_index: NetIndex) -> Option<&T> {
        self.ghosts.get(&net_index)?.to_any().downcast_ref::<T>()
    }

    pub fn ghost_mut<T: Replicate>(&mut self, net_index: NetIndex) -> Option<&mut T> {
        self.ghosts
            .get_mut(&net_index)?
            .to_any_mut()
            .downcast_mut::<T>()
    }

    pub fn has_ghost(&self, net_index: NetIndex) -> bool {
        self.ghosts.contains_key(&net_index)
    }

    pub fn ghost_indices(&self) -> Vec<NetIndex> {
        let mut output: Vec<NetIndex> = self.ghosts.keys().copied().collect();
        output.sort();
        output
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    pub fn datablock<T: DataBlock>(&self, id: DataBlockId) -> Option<&T> {
        let Some(datablock) = self.datablocks.get(&id) else {
            warn!("datablock {} was never preloaded", id);
            return None;
        };
        datablock.to_any().downcast_ref::<T>()
    }

    pub fn datablock_count(&self) -> usize {
        self.datablocks.len()
    }
}
