pub mod connection;
pub mod sent_packet;
