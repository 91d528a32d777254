use crate::constant::{MAC_REPEAT, PACKET_LEN, SYNC_STREAM};
use crate::mac::{Error, MacAddress};

pub struct MagicPacket {
    packet: Vec<u8>,
}

impl MagicPacket {
    pub fn new(mac_address: &MacAddress) -> MagicPacket {
        log::debug!("construct MagicPacket of {}", mac_address);
        MagicPacket {
            packet: {
                let mut dst = Vec::with_capacity(PACKET_LEN);

                dst.extend_from_slice(&SYNC_STREAM);

                (0..MAC_REPEAT).for_each(|_iter| {
                    dst.extend_from_slice(mac_address.octets());
                });

                dst
            },
        }
    }
    /// Normalizes `mac_address` first; nothing is built for a malformed address.
    pub fn parse(mac_address: &str) -> Result<MagicPacket, Error> {
        Ok(Self::new(&MacAddress::parse(mac_address)?))
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.packet
    }
}
