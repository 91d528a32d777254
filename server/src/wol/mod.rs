mod limiter;

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};

use async_std::net::UdpSocket;
use async_trait::async_trait;
use proto::prelude::*;

pub use limiter::Limiter;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidAddress(#[from] proto::Error),
    #[error("unable to send magic packet")]
    Transmission(#[from] io::Error),
}

/// Sends one Wake-on-LAN datagram per call.
#[async_trait]
pub trait Transmitter {
    async fn send_wake(&self, mac_address: &str, broadcast: Ipv4Addr, port: u16)
        -> Result<(), Error>;
}

/// Broadcasts the magic packet over UDP from an ephemeral port.
#[derive(Default)]
pub struct UdpTransmitter;

#[async_trait]
impl Transmitter for UdpTransmitter {
    async fn send_wake(
        &self,
        mac_address: &str,
        broadcast: Ipv4Addr,
        port: u16,
    ) -> Result<(), Error> {
        let mac_address = MacAddress::parse(mac_address)?;
        let packet = MagicPacket::new(&mac_address);

        // socket is dropped on every return path
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        socket.set_broadcast(true)?;
        socket
            .send_to(packet.as_bytes(), SocketAddrV4::new(broadcast, port))
            .await?;

        log::info!("Magic packet sent to {} via {}:{}", mac_address, broadcast, port);
        Ok(())
    }
}
