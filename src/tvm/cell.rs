//! Cell implementation for TON blockchain
//!
//! A cell is a fundamental data structure in TON that can store up to 1023 bits
//! of data and maintain up to 4 references to other cells. Cells are immutable
//! once built: the representation hash and depth are fixed at finalization.

use crate::tvm::error::{CellError, CellResult};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Maximum number of bits a cell can store
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of references a cell can have
pub const MAX_CELL_REFS: usize = 4;

/// Maximum depth of a cell tree accepted by the TVM
pub const MAX_CELL_DEPTH: u16 = 1024;

/// Represents an ordinary cell in the TON blockchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell data, `ceil(bit_len / 8)` bytes with unused trailing bits zeroed
    data: Vec<u8>,
    /// Number of bits in the cell (not necessarily a multiple of 8)
    bit_len: usize,
    /// References to other cells
    references: Vec<Arc<Cell>>,
    /// Representation hash
    hash: [u8; 32],
    /// Max depth of the subtree rooted here
    depth: u16,
}

impl Cell {
    /// Finalizes a cell from raw parts, validating capacity
    pub fn new(mut data: Vec<u8>, bit_len: usize, references: Vec<Arc<Cell>>) -> CellResult<Self> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::BitOverflow {
                current: 0,
                requested: bit_len,
                max: MAX_CELL_BITS,
            });
        }
        if references.len() > MAX_CELL_REFS {
            return Err(CellError::RefOverflow { max: MAX_CELL_REFS });
        }

        let required_bytes = bit_len.div_ceil(8);
        if data.len() < required_bytes {
            return Err(CellError::InsufficientData { bits: bit_len });
        }
        data.truncate(required_bytes);
        if bit_len % 8 != 0 {
            let last = required_bytes - 1;
            data[last] &= 0xFFu8 << (8 - bit_len % 8);
        }

        let depth = match references.iter().map(|r| r.depth()).max() {
            Some(deepest) => deepest
                .checked_add(1)
                .filter(|depth| *depth <= MAX_CELL_DEPTH)
                .ok_or(CellError::DepthOverflow { max: MAX_CELL_DEPTH })?,
            None => 0,
        };

        let mut cell = Self {
            data,
            bit_len,
            references,
            hash: [0u8; 32],
            depth,
        };
        cell.hash = cell.compute_hash();
        Ok(cell)
    }

    /// Creates a new empty cell
    pub fn empty() -> Self {
        let mut cell = Self {
            data: Vec::new(),
            bit_len: 0,
            references: Vec::new(),
            hash: [0u8; 32],
            depth: 0,
        };
        cell.hash = cell.compute_hash();
        cell
    }

    /// Returns the cell's data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of bits in the cell
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Returns the cell's references
    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    /// Returns the number of references
    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Gets a reference by index
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.references.get(index)
    }

    /// Returns the depth of the cell
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Returns the representation hash of the cell
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Computes the cell's descriptors (2 bytes)
    pub fn descriptors(&self) -> [u8; 2] {
        // d1 = r + 8*s + 32*l, ordinary cells only: s = 0, l = 0
        let refs_descriptor = self.references.len() as u8;
        // d2 = floor(b/8) + ceil(b/8)
        let bits_descriptor = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [refs_descriptor, bits_descriptor]
    }

    /// Serializes the cell data, appending the completion tag to an incomplete byte
    pub fn serialize_data(&self) -> Vec<u8> {
        let mut result = self.data.clone();
        if self.bit_len % 8 != 0 {
            let last_byte_idx = self.bit_len / 8;
            result[last_byte_idx] |= 1 << (7 - self.bit_len % 8);
        }
        result
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.serialize_data());
        for reference in &self.references {
            hasher.update(reference.depth().to_be_bytes());
        }
        for reference in &self.references {
            hasher.update(reference.hash());
        }
        hasher.finalize().into()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Low-level builder for constructing cells
///
/// Append-only accumulator of bits and references. Every append fails with a
/// [`CellError`] rather than exceeding [`MAX_CELL_BITS`] or [`MAX_CELL_REFS`].
/// For the higher-level API with address and coin encoding, see
/// [`Builder`](crate::tvm::Builder).
///
/// # Example
///
/// ```rust
/// use ton_nft_collection::tvm::CellBuilder;
///
/// let mut builder = CellBuilder::new();
/// builder.store_uint(0x12345678, 32).unwrap();
/// builder.store_byte(0xFF).unwrap();
/// let cell = builder.build().unwrap();
/// assert_eq!(cell.bit_len(), 40);
/// ```
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Creates a new cell builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits stored so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Number of references stored so far
    pub fn ref_count(&self) -> usize {
        self.references.len()
    }

    /// Stores the first `bit_len` bits of a byte slice, MSB first
    pub fn store_bits(&mut self, bits: &[u8], bit_len: usize) -> CellResult<&mut Self> {
        if self.bit_len + bit_len > MAX_CELL_BITS {
            return Err(CellError::BitOverflow {
                current: self.bit_len,
                requested: bit_len,
                max: MAX_CELL_BITS,
            });
        }
        if bits.len() < bit_len.div_ceil(8) {
            return Err(CellError::InsufficientData { bits: bit_len });
        }

        // Byte-aligned fast path
        if self.bit_len % 8 == 0 && bit_len % 8 == 0 {
            self.data.extend_from_slice(&bits[..bit_len / 8]);
            self.bit_len += bit_len;
            return Ok(self);
        }

        for i in 0..bit_len {
            let bit = (bits[i / 8] >> (7 - i % 8)) & 1;
            let target_byte_idx = self.bit_len / 8;
            if target_byte_idx >= self.data.len() {
                self.data.push(0);
            }
            if bit == 1 {
                self.data[target_byte_idx] |= 1 << (7 - self.bit_len % 8);
            }
            self.bit_len += 1;
        }

        Ok(self)
    }

    /// Stores a single bit
    pub fn store_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        self.store_bits(&[if bit { 0x80 } else { 0x00 }], 1)
    }

    /// Stores a byte
    pub fn store_byte(&mut self, byte: u8) -> CellResult<&mut Self> {
        self.store_bits(&[byte], 8)
    }

    /// Stores multiple bytes
    pub fn store_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        self.store_bits(bytes, bytes.len() * 8)
    }

    /// Stores the `bits` least significant bits of `value`, big-endian
    pub fn store_uint(&mut self, value: u64, bits: usize) -> CellResult<&mut Self> {
        if bits > 64 {
            return Err(CellError::InvalidWidth(bits));
        }
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueOutOfRange {
                value: value as i128,
                bits,
            });
        }
        if bits == 0 {
            return Ok(self);
        }

        // Left-align so the top `bits` bits of the buffer hold the value
        let aligned = value << (64 - bits);
        self.store_bits(&aligned.to_be_bytes(), bits)
    }

    /// Adds a reference to a finalized cell
    pub fn store_reference(&mut self, cell: Arc<Cell>) -> CellResult<&mut Self> {
        if self.references.len() >= MAX_CELL_REFS {
            return Err(CellError::RefOverflow { max: MAX_CELL_REFS });
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Finalizes the cell, consuming the builder
    pub fn build(self) -> CellResult<Arc<Cell>> {
        Cell::new(self.data, self.bit_len, self.references).map(Arc::new)
    }
}
