//! Bag of Cells (BoC) serialization and deserialization
//!
//! BoC is the wire format for handing a cell tree to a transport collaborator
//! and the format compiled contract code arrives in. Only single-root,
//! ordinary-cell bags are supported.

use crate::crc::CRC32C;
use crate::tvm::cell::Cell;
use anyhow::{Context, Result, bail};
use base64::Engine;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// BoC magic number for the generic format
const BOC_GENERIC_MAGIC: u32 = 0xb5ee9c72;

const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC32C: u8 = 0x40;

/// Serializes a cell tree into a Bag of Cells
///
/// Cells are deduplicated by representation hash and ordered so that every
/// cell precedes the cells it references; the root is always index 0.
pub fn serialize_boc(root: &Arc<Cell>, has_crc32c: bool) -> Result<Vec<u8>> {
    let cells = topological_order(root);
    let index: HashMap<[u8; 32], usize> = cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| (cell.hash(), idx))
        .collect();

    let size_bytes = bytes_needed(cells.len());

    let mut cells_data = Vec::new();
    for cell in &cells {
        cells_data.extend_from_slice(&cell.descriptors());
        cells_data.extend_from_slice(&cell.serialize_data());
        for reference in cell.references() {
            let ref_idx = index
                .get(&reference.hash())
                .context("Reference not found in cell index")?;
            write_uint(&mut cells_data, *ref_idx, size_bytes);
        }
    }

    let offset_bytes = bytes_needed(cells_data.len());

    let mut result = Vec::with_capacity(cells_data.len() + 32);
    result.extend_from_slice(&BOC_GENERIC_MAGIC.to_be_bytes());
    let flags = if has_crc32c { FLAG_HAS_CRC32C } else { 0 };
    result.push(flags | size_bytes as u8);
    result.push(offset_bytes as u8);
    write_uint(&mut result, cells.len(), size_bytes);
    // one root, no absent cells
    write_uint(&mut result, 1, size_bytes);
    write_uint(&mut result, 0, size_bytes);
    write_uint(&mut result, cells_data.len(), offset_bytes);
    write_uint(&mut result, 0, size_bytes);
    result.extend_from_slice(&cells_data);

    if has_crc32c {
        let crc = CRC32C.checksum(&result);
        result.extend_from_slice(&crc.to_le_bytes());
    }

    log::trace!("Serialized {} cells into {} BoC bytes", cells.len(), result.len());
    Ok(result)
}

/// Deserializes a single-root Bag of Cells
pub fn deserialize_boc(data: &[u8]) -> Result<Arc<Cell>> {
    let mut pos = 0;
    let magic = read_uint(data, &mut pos, 4)? as u32;
    if magic != BOC_GENERIC_MAGIC {
        bail!("Invalid BoC magic number: 0x{:08x}", magic);
    }

    let flags = read_uint(data, &mut pos, 1)? as u8;
    let has_idx = flags & FLAG_HAS_IDX != 0;
    let has_crc32c = flags & FLAG_HAS_CRC32C != 0;
    let size_bytes = (flags & 0x07) as usize;
    if size_bytes == 0 || size_bytes > 4 {
        bail!("Invalid size_bytes: {}", size_bytes);
    }

    let offset_bytes = read_uint(data, &mut pos, 1)?;
    if offset_bytes == 0 || offset_bytes > 8 {
        bail!("Invalid offset_bytes: {}", offset_bytes);
    }

    let cells_count = read_uint(data, &mut pos, size_bytes)?;
    let roots_count = read_uint(data, &mut pos, size_bytes)?;
    if roots_count != 1 {
        bail!("Expected exactly one root, found {}", roots_count);
    }
    let _absent_count = read_uint(data, &mut pos, size_bytes)?;
    let cells_size = read_uint(data, &mut pos, offset_bytes)?;
    let root_idx = read_uint(data, &mut pos, size_bytes)?;
    // every cell takes at least its two descriptor bytes
    if cells_count == 0 || cells_count > cells_size / 2 {
        bail!(
            "Invalid cell count {} for {} bytes of cell data",
            cells_count,
            cells_size
        );
    }
    if root_idx >= cells_count {
        bail!("Invalid root index: {}", root_idx);
    }
    if has_idx {
        pos = cells_count
            .checked_mul(offset_bytes)
            .and_then(|idx_len| pos.checked_add(idx_len))
            .context("Index section exceeds BoC length")?;
    }

    let cells_end = pos
        .checked_add(cells_size)
        .filter(|end| *end <= data.len())
        .context("Cells section exceeds BoC length")?;

    if has_crc32c {
        if data.len() != cells_end + 4 {
            bail!("Missing or misplaced CRC32C");
        }
        let expected = u32::from_le_bytes([
            data[cells_end],
            data[cells_end + 1],
            data[cells_end + 2],
            data[cells_end + 3],
        ]);
        let actual = CRC32C.checksum(&data[..cells_end]);
        if expected != actual {
            bail!(
                "CRC32C mismatch: expected 0x{:08x}, got 0x{:08x}",
                expected,
                actual
            );
        }
    }

    let cells = parse_cells(&data[pos..cells_end], cells_count, size_bytes)?;
    cells
        .get(root_idx)
        .cloned()
        .with_context(|| format!("Invalid root index: {}", root_idx))
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

fn parse_cells(data: &[u8], count: usize, size_bytes: usize) -> Result<Vec<Arc<Cell>>> {
    let mut raw_cells = Vec::with_capacity(count);
    let mut pos = 0;

    for _ in 0..count {
        let d1 = read_uint(data, &mut pos, 1)? as u8;
        let d2 = read_uint(data, &mut pos, 1)? as u8;

        if d1 & 0x08 != 0 {
            bail!("Exotic cells are not supported");
        }
        if d1 & 0x10 != 0 {
            bail!("Cells with stored hashes are not supported");
        }
        if d1 >> 5 != 0 {
            bail!("Cells with non-zero level are not supported");
        }
        let ref_count = (d1 & 0x07) as usize;

        let data_size = (d2 as usize).div_ceil(2);
        let cell_data = data
            .get(pos..pos + data_size)
            .context("Cell data exceeds buffer")?
            .to_vec();
        pos += data_size;

        let bit_len = if d2 % 2 == 0 {
            data_size * 8
        } else {
            // incomplete last byte carries a completion tag
            let last = cell_data[data_size - 1];
            if last == 0 {
                bail!("Missing completion tag in cell data");
            }
            data_size * 8 - last.trailing_zeros() as usize - 1
        };

        let mut refs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            refs.push(read_uint(data, &mut pos, size_bytes)?);
        }

        raw_cells.push(RawCell {
            data: cell_data,
            bit_len,
            refs,
        });
    }

    // references always point forward, so build from the last cell back
    let mut built: Vec<Option<Arc<Cell>>> = vec![None; count];
    for (idx, raw) in raw_cells.into_iter().enumerate().rev() {
        let mut references = Vec::with_capacity(raw.refs.len());
        for ref_idx in raw.refs {
            if ref_idx <= idx {
                bail!("Cell {} references non-forward index {}", idx, ref_idx);
            }
            let reference = built
                .get(ref_idx)
                .cloned()
                .flatten()
                .with_context(|| format!("Invalid reference index: {}", ref_idx))?;
            references.push(reference);
        }
        built[idx] = Some(Arc::new(Cell::new(raw.data, raw.bit_len, references)?));
    }

    Ok(built.into_iter().flatten().collect())
}

fn topological_order(root: &Arc<Cell>) -> Vec<Arc<Cell>> {
    fn visit(
        cell: &Arc<Cell>,
        visited: &mut HashSet<[u8; 32]>,
        post_order: &mut Vec<Arc<Cell>>,
    ) {
        if !visited.insert(cell.hash()) {
            return;
        }
        for reference in cell.references() {
            visit(reference, visited, post_order);
        }
        post_order.push(cell.clone());
    }

    let mut visited = HashSet::new();
    let mut post_order = Vec::new();
    visit(root, &mut visited, &mut post_order);
    post_order.reverse();
    post_order
}

fn bytes_needed(value: usize) -> usize {
    let bits = (usize::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

fn write_uint(buf: &mut Vec<u8>, value: usize, size: usize) {
    let bytes = (value as u64).to_be_bytes();
    buf.extend_from_slice(&bytes[8 - size..]);
}

fn read_uint(data: &[u8], pos: &mut usize, size: usize) -> Result<usize> {
    let bytes = data
        .get(*pos..*pos + size)
        .context("Unexpected end of BoC data")?;
    *pos += size;
    Ok(bytes
        .iter()
        .fold(0usize, |acc, &byte| (acc << 8) | byte as usize))
}

/// Converts a hex string to a cell
pub fn hex_to_boc(hex: &str) -> Result<Arc<Cell>> {
    let hex: String = hex.split_whitespace().collect();
    let bytes = hex::decode(&hex).context("Failed to decode hex")?;
    deserialize_boc(&bytes)
}

/// Serializes a cell to a hex string
pub fn boc_to_hex(cell: &Arc<Cell>, has_crc32c: bool) -> Result<String> {
    Ok(hex::encode(serialize_boc(cell, has_crc32c)?))
}

/// Serializes a cell to a base64 string
pub fn boc_to_base64(cell: &Arc<Cell>, has_crc32c: bool) -> Result<String> {
    let bytes = serialize_boc(cell, has_crc32c)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Converts a base64 string to a cell
pub fn base64_to_boc(b64: &str) -> Result<Arc<Cell>> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .context("Failed to decode base64")?;
    deserialize_boc(&bytes)
}
