//! Collection configuration (initial contract data)
//!
//! Layout of the data cell:
//!
//! ```text
//! root:    owner:MsgAddress next_item_index:uint64
//!          ^content ^nft_item_code ^royalty
//!          started:int4 start_time:uint64 public_start_time:uint64
//!          end_public_mint_time:uint64 ^whitelist_checker_code
//! content: ^collection_content (off-chain, tagged) ^common_content (raw snake)
//! royalty: factor:uint16 base:uint16 recipient:MsgAddress
//! ```
//!
//! The contract address is derived from this cell, so field order and widths
//! are fixed.

use crate::nft::constants::{ROYALTY_BASE, STARTED_FLAG_BITS, STARTED_FLAG_ON};
use crate::nft::content::{encode_off_chain_content, make_snake_cell};
use crate::tvm::{Address, Builder, Cell, CellError, CellResult};
use std::sync::Arc;

/// Mint-window state shared by the configuration and the set-started message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MintWindow {
    /// Signed 4-bit flag, `-1` when minting has started
    pub started: i8,
    pub start_time: u64,
    pub public_start_time: u64,
    pub end_public_mint_time: u64,
}

impl MintWindow {
    /// A window that has not been opened, all timestamps zero
    pub fn closed() -> Self {
        Self::default()
    }

    /// An open window with the given Unix timestamps
    pub fn started_now(start_time: u64, public_start_time: u64, end_public_mint_time: u64) -> Self {
        Self {
            started: STARTED_FLAG_ON,
            start_time,
            public_start_time,
            end_public_mint_time,
        }
    }

    pub(crate) fn store(&self, builder: &mut Builder) -> CellResult<()> {
        builder.store_int(self.started as i64, STARTED_FLAG_BITS)?;
        builder.store_uint(self.start_time, 64)?;
        builder.store_uint(self.public_start_time, 64)?;
        builder.store_uint(self.end_public_mint_time, 64)?;
        Ok(())
    }
}

/// Royalty fraction `factor / base`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Royalty {
    pub factor: u16,
    pub base: u16,
}

impl Royalty {
    /// Scales a fraction of one (`0.05` for 5%) by [`ROYALTY_BASE`],
    /// truncating toward zero
    pub fn from_percent(percent: f64) -> CellResult<Self> {
        let scaled = (percent * ROYALTY_BASE as f64).floor();
        if !(0.0..=u16::MAX as f64).contains(&scaled) {
            return Err(CellError::ValueOutOfRange {
                value: scaled as i128,
                bits: 16,
            });
        }
        Ok(Self {
            factor: scaled as u16,
            base: ROYALTY_BASE,
        })
    }

    /// Encodes the royalty cell paying out to `recipient`
    pub fn to_cell(&self, recipient: &Address) -> CellResult<Arc<Cell>> {
        let mut builder = Builder::new();
        builder.store_uint(self.factor as u64, 16)?;
        builder.store_uint(self.base as u64, 16)?;
        builder.store_address(Some(recipient))?;
        builder.end_cell()
    }
}

/// Everything needed to build the collection's initial data cell
#[derive(Debug, Clone)]
pub struct NftCollectionConfig {
    pub owner_address: Address,
    pub next_item_index: u64,
    /// Royalty as a fraction of one, e.g. `0.05`
    pub royalty_percent: f64,
    pub royalty_address: Address,
    pub collection_content_url: String,
    pub common_content_url: String,
    pub nft_item_code: Arc<Cell>,
    pub mint_window: MintWindow,
    pub whitelist_checker_code: Arc<Cell>,
}

impl NftCollectionConfig {
    /// Encodes the configuration into the collection data cell
    pub fn to_cell(&self) -> CellResult<Arc<Cell>> {
        let royalty = Royalty::from_percent(self.royalty_percent)?;

        let mut content = Builder::new();
        content.store_ref(encode_off_chain_content(&self.collection_content_url)?)?;
        content.store_ref(make_snake_cell(self.common_content_url.as_bytes())?)?;

        let mut builder = Builder::new();
        builder.store_address(Some(&self.owner_address))?;
        builder.store_uint(self.next_item_index, 64)?;
        builder.store_ref(content.end_cell()?)?;
        builder.store_ref(self.nft_item_code.clone())?;
        builder.store_ref(royalty.to_cell(&self.royalty_address)?)?;
        self.mint_window.store(&mut builder)?;
        builder.store_ref(self.whitelist_checker_code.clone())?;

        let cell = builder.end_cell()?;
        log::debug!(
            "Encoded collection config: {} bits, royalty {}/{}",
            cell.bit_len(),
            royalty.factor,
            royalty.base
        );
        Ok(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_royalty_rounding() {
        assert_eq!(
            Royalty::from_percent(0.05).unwrap(),
            Royalty {
                factor: 50,
                base: 1000
            }
        );
        assert_eq!(Royalty::from_percent(0.0001).unwrap().factor, 0);
        assert_eq!(Royalty::from_percent(0.0999).unwrap().factor, 99);
    }

    #[test]
    fn test_royalty_out_of_range() {
        assert!(Royalty::from_percent(-0.01).is_err());
        assert!(Royalty::from_percent(70.0).is_err());
        assert!(Royalty::from_percent(f64::NAN).is_err());
    }

    #[test]
    fn test_mint_window_bits() {
        let mut builder = Builder::new();
        MintWindow::started_now(1, 2, 3).store(&mut builder).unwrap();
        assert_eq!(builder.bit_len(), 4 + 3 * 64);

        let mut builder = Builder::new();
        let window = MintWindow {
            started: 8,
            ..MintWindow::closed()
        };
        assert!(window.store(&mut builder).is_err());
    }
}
