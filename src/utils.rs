use crate::crc::CRC16;
use anyhow::{Result, bail};
use pretty_env_logger::formatted_builder;

const NANO_DIGITS: usize = 9;

pub fn init_logger() -> Result<(), log::SetLoggerError> {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        builder.parse_filters("info");
    }

    builder.try_init()
}

/// Get-method id: `(crc16(name) & 0xffff) | 0x10000`
pub fn method_name_to_id(name: &str) -> u32 {
    (CRC16.checksum(name.as_bytes()) as u32 & 0xFFFF) | 0x10000
}

/// Parses a decimal TON amount ("0.165") into nanotons
pub fn to_nano(amount: &str) -> Result<u128> {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() && fraction.is_empty() {
        bail!("Empty amount");
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        bail!("Invalid amount: {}", amount);
    }
    if fraction.len() > NANO_DIGITS {
        bail!("Amount {} has more than {} fractional digits", amount, NANO_DIGITS);
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse()? };
    let fraction: u128 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = NANO_DIGITS).parse()?
    };

    whole
        .checked_mul(10u128.pow(NANO_DIGITS as u32))
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| anyhow::anyhow!("Amount {} overflows", amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_nano() {
        assert_eq!(to_nano("0.165").unwrap(), 165_000_000);
        assert_eq!(to_nano("0.01").unwrap(), 10_000_000);
        assert_eq!(to_nano("3").unwrap(), 3_000_000_000);
        assert_eq!(to_nano(".5").unwrap(), 500_000_000);
        assert_eq!(to_nano("1.000000001").unwrap(), 1_000_000_001);
    }

    #[test]
    fn test_to_nano_rejects_garbage() {
        assert!(to_nano("").is_err());
        assert!(to_nano(".").is_err());
        assert!(to_nano("-1").is_err());
        assert!(to_nano("1.2.3").is_err());
        assert!(to_nano("0.0000000001").is_err());
    }

    #[test]
    fn test_method_name_to_id() {
        assert_eq!(method_name_to_id("seqno"), 85143);
    }
}
