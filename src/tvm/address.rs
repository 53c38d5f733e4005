//! TON internal address (workchain + 256-bit account id)
//!
//! Parsing accepts the raw `workchain:hex` form and the 48-character
//! user-friendly base64 form (standard or URL-safe alphabet).

use crate::crc::CRC16;
use anyhow::{Result, bail};
use base64::Engine;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TEST_ONLY: u8 = 0x80;

/// Represents a TON blockchain address
///
/// Equality and hashing cover the account only; the bounceable and test-only
/// flags affect the user-friendly form and nothing else.
#[derive(Debug, Clone)]
pub struct Address {
    /// Workchain ID (-1 for masterchain, 0 for basechain)
    pub workchain: i8,
    /// 32-byte hash part of the address
    pub hash_part: [u8; 32],
    /// Whether the address is bounceable
    pub is_bounceable: bool,
    /// Whether this is a test-only address
    pub is_test_only: bool,
}

impl Address {
    /// Creates a new address from workchain and hash part
    pub fn new(workchain: i8, hash_part: [u8; 32]) -> Self {
        Self {
            workchain,
            hash_part,
            is_bounceable: true,
            is_test_only: false,
        }
    }

    /// Parses an address in either raw or user-friendly format
    pub fn parse(address: &str) -> Result<Self> {
        if address.contains(':') {
            return Self::from_hex(address);
        }
        Self::from_base64(address)
    }

    /// Parses address from raw format: "workchain:hash"
    pub fn from_hex(address: &str) -> Result<Self> {
        let Some((workchain, hash_hex)) = address.split_once(':') else {
            bail!("Invalid raw address format: {}", address);
        };

        let workchain = workchain.parse::<i8>()?;
        if hash_hex.len() != 64 {
            bail!("Hash part must be 64 hex characters");
        }

        let mut hash_part = [0u8; 32];
        hex::decode_to_slice(hash_hex, &mut hash_part)?;

        Ok(Self::new(workchain, hash_part))
    }

    /// Parses address from base64 user-friendly format
    pub fn from_base64(address: &str) -> Result<Self> {
        let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(address)
            .or_else(|_| base64::engine::general_purpose::STANDARD.decode(address))?;

        if decoded.len() != 36 {
            bail!("Invalid base64 address length: {}", decoded.len());
        }

        let expected_crc = u16::from_be_bytes([decoded[34], decoded[35]]);
        let actual_crc = CRC16.checksum(&decoded[..34]);
        if expected_crc != actual_crc {
            bail!("Invalid address CRC");
        }

        let mut tag = decoded[0];
        let is_test_only = tag & TAG_TEST_ONLY != 0;
        tag &= !TAG_TEST_ONLY;

        let is_bounceable = match tag {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            _ => bail!("Invalid address tag: {:#04x}", tag),
        };

        let mut hash_part = [0u8; 32];
        hash_part.copy_from_slice(&decoded[2..34]);

        Ok(Self {
            workchain: decoded[1] as i8,
            hash_part,
            is_bounceable,
            is_test_only,
        })
    }

    /// Converts to raw format (workchain:hash)
    pub fn to_hex(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash_part))
    }

    /// Converts to user-friendly URL-safe base64 with explicit flags
    pub fn to_friendly(&self, bounceable: bool, test_only: bool) -> String {
        let mut tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if test_only {
            tag |= TAG_TEST_ONLY;
        }

        let mut data = Vec::with_capacity(36);
        data.push(tag);
        data.push(self.workchain as u8);
        data.extend_from_slice(&self.hash_part);
        let crc = CRC16.checksum(&data);
        data.extend_from_slice(&crc.to_be_bytes());

        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&data)
    }

    /// Converts to user-friendly base64 using this address's own flags
    pub fn to_base64(&self) -> String {
        self.to_friendly(self.is_bounceable, self.is_test_only)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.workchain == other.workchain && self.hash_part == other.hash_part
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.workchain.hash(state);
        self.hash_part.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Address::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex() {
        let addr =
            Address::from_hex("0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8")
                .unwrap();
        assert_eq!(addr.workchain, 0);
        assert_eq!(
            addr.to_hex(),
            "0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8"
        );
    }

    #[test]
    fn test_address_base64() {
        let addr = Address::parse("EQCD39VS5jcptHL8vMjEXrzGaRcCVYto7HUn4bpAOg8xqB2N").unwrap();
        assert_eq!(addr.workchain, 0);
        assert!(addr.is_bounceable);
        assert!(!addr.is_test_only);
        assert_eq!(
            addr.to_hex(),
            "0:83dfd552e63729b472fcbcc8c45ebcc6691702558b68ec7527e1ba403a0f31a8"
        );
    }

    #[test]
    fn test_testnet_non_bounceable() {
        let addr = Address::parse("0QAUGgVrmYWc0sPMsolAT6Z4jjaZ574lEgYj9vCk-X74iqlU").unwrap();
        assert!(addr.is_test_only);
        assert!(!addr.is_bounceable);
        assert_eq!(
            addr.to_string(),
            "0QAUGgVrmYWc0sPMsolAT6Z4jjaZ574lEgYj9vCk-X74iqlU"
        );
    }

    #[test]
    fn test_zero_address_formats() {
        let zero_addr = Address::new(0, [0u8; 32]);
        assert_eq!(
            zero_addr.to_hex(),
            "0:0000000000000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(
            zero_addr.to_friendly(true, false),
            "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c"
        );
        assert_eq!(
            zero_addr.to_friendly(false, false),
            "UQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJKZ"
        );
    }

    #[test]
    fn test_flags_ignored_by_equality() {
        use std::collections::HashSet;

        let testnet = Address::parse("0QAUGgVrmYWc0sPMsolAT6Z4jjaZ574lEgYj9vCk-X74iqlU").unwrap();
        let raw = Address::from_hex(&testnet.to_hex()).unwrap();
        assert!(raw.is_bounceable && !raw.is_test_only);
        assert_eq!(testnet, raw);

        let set: HashSet<Address> = [testnet.clone(), raw].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(testnet, Address::new(-1, testnet.hash_part));
    }

    #[test]
    fn test_bad_crc_rejected() {
        assert!(Address::parse("EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9d").is_err());
        assert!(Address::parse("0:abcd").is_err());
    }
}
