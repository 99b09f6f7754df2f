//! # Ghostwire Server
//! The authoritative side of ghostwire: scopes replicated objects to
//! connections, ghosts them, and writes each connection's ghost packets by
//! priority within a fixed bit budget.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use ghostwire_shared::{
        BitReader, BitWrite, BitWriter, ConnectionKey, GhostConfig, ObjectKey, PacketIndex,
        Protocol, Replicate, Serde, SerdeErr,
    };
}

mod connection;
mod error;
mod scope;
mod server;

pub use connection::{connection::Connection, sent_packet::SentPacket};
pub use error::ServerError;
pub use scope::{ScopeMut, ScopeRef};
pub use server::{Server, ServerConfig};
