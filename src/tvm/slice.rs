//! Slice implementation for reading data from cells
//!
//! A Slice reads a Cell sequentially, tracking the current position in both
//! bits and references. Only the trivial reads needed for call results and
//! verifying encoded cells are provided.

use crate::tvm::address::Address;
use crate::tvm::cell::Cell;
use crate::tvm::error::{CellError, CellResult};
use std::sync::Arc;

/// A slice for reading data from a cell
#[derive(Debug, Clone)]
pub struct Slice {
    /// The cell being read
    cell: Arc<Cell>,
    /// Current bit position in the cell
    bit_pos: usize,
    /// Current reference position
    ref_pos: usize,
}

impl Slice {
    /// Creates a new slice from a cell
    pub fn new(cell: Arc<Cell>) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Returns the number of remaining bits
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// Returns the number of remaining references
    pub fn remaining_refs(&self) -> usize {
        self.cell.reference_count() - self.ref_pos
    }

    /// Checks if both bits and references are exhausted
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    fn ensure_bits(&self, n: usize) -> CellResult<()> {
        if n > self.remaining_bits() {
            return Err(CellError::Underflow {
                requested: n,
                available: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Loads a single bit
    pub fn load_bit(&mut self) -> CellResult<bool> {
        self.ensure_bits(1)?;
        let byte = self.cell.data()[self.bit_pos / 8];
        let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Loads `n` bits, MSB-aligned into a byte vector
    pub fn load_bits(&mut self, n: usize) -> CellResult<Vec<u8>> {
        self.ensure_bits(n)?;

        if self.bit_pos % 8 == 0 && n % 8 == 0 {
            let start = self.bit_pos / 8;
            self.bit_pos += n;
            return Ok(self.cell.data()[start..start + n / 8].to_vec());
        }

        let mut result = vec![0u8; n.div_ceil(8)];
        for i in 0..n {
            if self.load_bit()? {
                result[i / 8] |= 1 << (7 - i % 8);
            }
        }
        Ok(result)
    }

    /// Loads multiple bytes
    pub fn load_bytes(&mut self, n: usize) -> CellResult<Vec<u8>> {
        self.load_bits(n * 8)
    }

    /// Loads an unsigned integer of `bits` width
    pub fn load_uint(&mut self, bits: usize) -> CellResult<u64> {
        if bits > 64 {
            return Err(CellError::InvalidWidth(bits));
        }
        self.ensure_bits(bits)?;

        let mut result = 0u64;
        for _ in 0..bits {
            result = (result << 1) | self.load_bit()? as u64;
        }
        Ok(result)
    }

    /// Loads a two's complement signed integer of `bits` width
    pub fn load_int(&mut self, bits: usize) -> CellResult<i64> {
        let unsigned = self.load_uint(bits)?;
        if bits == 0 || bits == 64 {
            return Ok(unsigned as i64);
        }

        let sign_bit = 1u64 << (bits - 1);
        if unsigned & sign_bit != 0 {
            Ok((unsigned | (!0u64 << bits)) as i64)
        } else {
            Ok(unsigned as i64)
        }
    }

    /// Loads coins (VarUInteger 16)
    pub fn load_coins(&mut self) -> CellResult<u128> {
        let len = self.load_uint(4)? as usize;
        let bytes = self.load_bytes(len)?;
        Ok(bytes
            .iter()
            .fold(0u128, |acc, &byte| (acc << 8) | byte as u128))
    }

    /// Loads a `MsgAddressInt` stored as `addr_std` or `addr_none`
    pub fn load_address(&mut self) -> CellResult<Option<Address>> {
        let tag = self.load_uint(2)? as u8;
        match tag {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    // anycast is not produced by any encoder here
                    return Err(CellError::UnsupportedAddressTag(tag));
                }
                let workchain = self.load_int(8)? as i8;
                let mut hash_part = [0u8; 32];
                hash_part.copy_from_slice(&self.load_bytes(32)?);
                Ok(Some(Address::new(workchain, hash_part)))
            }
            _ => Err(CellError::UnsupportedAddressTag(tag)),
        }
    }

    /// Loads the next reference
    pub fn load_reference(&mut self) -> CellResult<Arc<Cell>> {
        let reference = self
            .cell
            .reference(self.ref_pos)
            .cloned()
            .ok_or(CellError::Underflow {
                requested: 1,
                available: 0,
            })?;
        self.ref_pos += 1;
        Ok(reference)
    }

    /// Loads all remaining bits
    pub fn load_remaining_bits(&mut self) -> CellResult<Vec<u8>> {
        self.load_bits(self.remaining_bits())
    }

    /// Skips a number of bits
    pub fn skip_bits(&mut self, n: usize) -> CellResult<()> {
        self.ensure_bits(n)?;
        self.bit_pos += n;
        Ok(())
    }
}

impl From<Arc<Cell>> for Slice {
    fn from(cell: Arc<Cell>) -> Self {
        Self::new(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tvm::cell::CellBuilder;

    #[test]
    fn test_slice_load_bytes() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(&[0xFF, 0x00]).unwrap();
        let mut slice = Slice::new(builder.build().unwrap());
        assert_eq!(slice.remaining_bits(), 16);
        assert_eq!(slice.load_bytes(1).unwrap(), vec![0xFF]);
        assert_eq!(slice.load_bytes(1).unwrap(), vec![0x00]);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_slice_load_uint() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0x12345678, 32).unwrap();
        let mut slice = Slice::new(builder.build().unwrap());
        slice.skip_bits(16).unwrap();
        assert_eq!(slice.load_uint(16).unwrap(), 0x5678);
    }

    #[test]
    fn test_slice_underflow() {
        let mut builder = CellBuilder::new();
        builder.store_uint(3, 2).unwrap();
        let mut slice = Slice::new(builder.build().unwrap());
        assert_eq!(
            slice.load_uint(3).unwrap_err(),
            CellError::Underflow {
                requested: 3,
                available: 2
            }
        );
        assert!(slice.load_reference().is_err());
    }

    #[test]
    fn test_slice_load_reference() {
        let child = CellBuilder::new().build().unwrap();
        let mut builder = CellBuilder::new();
        builder.store_reference(child.clone()).unwrap();
        let mut slice = Slice::new(builder.build().unwrap());
        assert_eq!(slice.remaining_refs(), 1);
        assert_eq!(slice.load_reference().unwrap(), child);
        assert_eq!(slice.remaining_refs(), 0);
    }
}
