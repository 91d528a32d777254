pub mod constant;
mod mac;
mod packet;

pub use mac::{Error, MacAddress};
pub use packet::MagicPacket;

pub mod prelude {
    pub use super::constant::*;
    pub use super::mac::{Error, MacAddress};
    pub use super::packet::MagicPacket;
}
