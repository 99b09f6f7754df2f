use ghostwire_client::{Client, ClientConfig, ClientEvent};
use ghostwire_server::{Server, ServerConfig};
use ghostwire_shared::{ConnectionKey, PacketIndex};

use super::test_protocol::protocol;

/// Fate of a packet handed to `TestLink::send`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Read by the client and acknowledged
    Delivered,
    /// Read by the client, acknowledgement still outstanding
    InFlight,
    /// Never reaches the client and is reported lost
    Dropped,
}

/// One server with one connected client, exchanging packets in memory.
pub struct TestLink {
    pub server: Server,
    pub client: Client,
    pub connection: ConnectionKey,
}

impl TestLink {
    pub fn new() -> Self {
        Self::with_configs(ServerConfig::default(), ClientConfig::default())
    }

    pub fn with_configs(server_config: ServerConfig, client_config: ClientConfig) -> Self {
        let mut server = Server::new(server_config, protocol());
        let client = Client::new(client_config, protocol());
        let connection = server.connect();
        Self {
            server,
            client,
            connection,
        }
    }

    /// Writes the next packet and applies `delivery` to it.
    pub fn send(&mut self, delivery: Delivery) -> (PacketIndex, Vec<ClientEvent>) {
        let (packet_index, bytes) = self
            .server
            .write_packet(&self.connection)
            .expect("connection exists");

        let events = match delivery {
            Delivery::Dropped => {
                self.server
                    .notify_packet_dropped(&self.connection, packet_index)
                    .expect("connection exists");
                Vec::new()
            }
            Delivery::Delivered | Delivery::InFlight => {
                let events = self.client.read_packet(&bytes).expect("packet reads cleanly");
                if delivery == Delivery::Delivered {
                    self.deliver(packet_index);
                }
                events
            }
        };
        (packet_index, events)
    }

    pub fn deliver(&mut self, packet_index: PacketIndex) {
        self.server
            .notify_packet_delivered(&self.connection, packet_index)
            .expect("connection exists");
    }

    pub fn drop_packet(&mut self, packet_index: PacketIndex) {
        self.server
            .notify_packet_dropped(&self.connection, packet_index)
            .expect("connection exists");
    }

    /// Ticks the server and delivers one packet.
    pub fn tick_and_exchange(&mut self) -> Vec<ClientEvent> {
        self.server.tick();
        self.send(Delivery::Delivered).1
    }
}

impl Default for TestLink {
    fn default() -> Self {
        Self::new()
    }
}
