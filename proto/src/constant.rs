use std::net::Ipv4Addr;

pub const WOL_PORT: u16 = 9;
pub const DEFAULT_BROADCAST: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 255);
pub const MAC_LEN: usize = 6;
pub const SYNC_STREAM: [u8; MAC_LEN] = [0xFF; MAC_LEN];
pub const MAC_REPEAT: usize = 16;
pub const PACKET_LEN: usize = MAC_LEN * (MAC_REPEAT + 1);
