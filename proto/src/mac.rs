use std::fmt;
use std::str::FromStr;

use crate::constant::MAC_LEN;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),
}

/// Hardware address of the machine to wake.
///
/// Accepts `aa:bb:cc:dd:ee:ff`, `AA-BB-CC-DD-EE-FF`, `aabbccddeeff` and any
/// mix of those separators, as long as exactly 12 hex digits remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; MAC_LEN]);

impl MacAddress {
    pub fn new(bytes: [u8; MAC_LEN]) -> Self {
        MacAddress(bytes)
    }
    pub fn parse(src: &str) -> Result<Self, Error> {
        let digits: Vec<char> = src
            .chars()
            .filter(|c| *c != ':' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let invalid = || Error::InvalidMacAddress(digits.iter().collect());

        if digits.len() != MAC_LEN * 2 {
            return Err(invalid());
        }

        let mut bytes = [0_u8; MAC_LEN];
        for (i, pair) in digits.chunks(2).enumerate() {
            let high = pair[0].to_digit(16).ok_or_else(invalid)?;
            let low = pair[1].to_digit(16).ok_or_else(invalid)?;
            bytes[i] = (high * 16 + low) as u8;
        }
        Ok(MacAddress(bytes))
    }
    pub fn octets(&self) -> &[u8; MAC_LEN] {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}
