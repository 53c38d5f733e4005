//! High-level builder for constructing cells
//!
//! `Builder` wraps the low-level [`CellBuilder`] with the TON-specific encodings
//! the collection encoders need: signed integers, standard addresses
//! (`MsgAddressInt`) and coin amounts (`VarUInteger 16`).
//!
//! # Examples
//!
//! ```rust
//! use ton_nft_collection::tvm::{Address, Builder};
//!
//! let mut builder = Builder::new();
//! let addr = Address::new(0, [0u8; 32]);
//! builder.store_address(Some(&addr)).unwrap();
//! builder.store_coins(1_000_000_000).unwrap();
//! let cell = builder.end_cell().unwrap();
//! assert_eq!(cell.bit_len(), 267 + 4 + 32);
//! ```

use crate::tvm::address::Address;
use crate::tvm::cell::{Cell, CellBuilder, MAX_CELL_BITS, MAX_CELL_REFS};
use crate::tvm::error::{CellError, CellResult};
use std::sync::Arc;

/// Extended builder with convenience methods
#[derive(Debug, Default)]
pub struct Builder {
    inner: CellBuilder,
}

impl Builder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bits used
    pub fn bit_len(&self) -> usize {
        self.inner.bit_len()
    }

    /// Returns the number of available bits
    pub fn available_bits(&self) -> usize {
        MAX_CELL_BITS - self.bit_len()
    }

    /// Returns the number of references
    pub fn ref_count(&self) -> usize {
        self.inner.ref_count()
    }

    /// Returns the number of available references
    pub fn available_refs(&self) -> usize {
        MAX_CELL_REFS - self.ref_count()
    }

    /// Stores a single bit
    pub fn store_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        self.inner.store_bit(bit)?;
        Ok(self)
    }

    /// Stores raw bytes (storeBuffer)
    pub fn store_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        self.inner.store_bytes(bytes)?;
        Ok(self)
    }

    /// Stores an unsigned integer with specific bit length
    pub fn store_uint(&mut self, value: u64, bits: usize) -> CellResult<&mut Self> {
        self.inner.store_uint(value, bits)?;
        Ok(self)
    }

    /// Stores a two's complement signed integer with specific bit length
    pub fn store_int(&mut self, value: i64, bits: usize) -> CellResult<&mut Self> {
        if bits > 64 {
            return Err(CellError::InvalidWidth(bits));
        }
        if bits == 0 {
            if value != 0 {
                return Err(CellError::ValueOutOfRange {
                    value: value as i128,
                    bits,
                });
            }
            return Ok(self);
        }

        let min = -(1i128 << (bits - 1));
        let max = (1i128 << (bits - 1)) - 1;
        if !(min..=max).contains(&(value as i128)) {
            return Err(CellError::ValueOutOfRange {
                value: value as i128,
                bits,
            });
        }

        let mask = if bits == 64 {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        };
        self.store_uint((value as u64) & mask, bits)
    }

    /// Stores a reference to another cell
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> CellResult<&mut Self> {
        self.inner.store_reference(cell)?;
        Ok(self)
    }

    /// Stores coins (VarUInteger 16): 4-bit byte length, then the value
    pub fn store_coins(&mut self, amount: u128) -> CellResult<&mut Self> {
        if amount == 0 {
            return self.store_uint(0, 4);
        }

        let byte_len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        if byte_len > 15 {
            return Err(CellError::ValueOutOfRange {
                value: i128::try_from(amount).unwrap_or(i128::MAX),
                bits: 120,
            });
        }

        self.store_uint(byte_len as u64, 4)?;
        let bytes = amount.to_be_bytes();
        self.store_bytes(&bytes[16 - byte_len..])
    }

    /// Stores a TON address (`MsgAddressInt`), or `addr_none` for `None`
    pub fn store_address(&mut self, address: Option<&Address>) -> CellResult<&mut Self> {
        match address {
            None => {
                // addr_none$00
                self.store_uint(0b00, 2)?;
            }
            Some(addr) => {
                // addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256
                self.store_uint(0b10, 2)?;
                self.store_bit(false)?;
                self.store_int(addr.workchain as i64, 8)?;
                self.store_bytes(&addr.hash_part)?;
            }
        }
        Ok(self)
    }

    /// Finalizes the cell
    pub fn end_cell(self) -> CellResult<Arc<Cell>> {
        self.inner.build()
    }
}
