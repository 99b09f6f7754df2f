//! # Ghostwire Client
//! The remote side of ghostwire: reads the datablock preload and ghost
//! packets written by ghostwire-server, keeping a pool of ghost proxies in
//! sync with their authoritative objects.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use ghostwire_shared::{
        BitReader, BitWrite, BitWriter, DataBlock, GhostConfig, NetIndex, Protocol, Replicate,
        Serde, SerdeErr,
    };
}

mod client;
mod error;
mod events;

pub use client::{Client, ClientConfig};
pub use error::ClientError;
pub use events::ClientEvent;
