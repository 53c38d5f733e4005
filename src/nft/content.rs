//! Snake and off-chain content encoding
//!
//! A snake chain stores a byte buffer across a singly linked list of cells:
//! each cell holds at most [`CHUNK_SIZE`] bytes and, except the last, exactly
//! one reference to the cell holding the next chunk.

use crate::nft::constants::{CHUNK_SIZE, OFF_CHAIN_CONTENT_TAG};
use crate::tvm::{Builder, Cell, CellResult};
use std::sync::Arc;

/// Encodes `data` as a snake chain and returns its head cell
///
/// An empty buffer yields a single empty cell. The chain is built tail-first:
/// a cell can only reference a cell that is already finalized.
pub fn make_snake_cell(data: &[u8]) -> CellResult<Arc<Cell>> {
    let mut chunks = data.chunks(CHUNK_SIZE).rev();

    let Some(last) = chunks.next() else {
        return Builder::new().end_cell();
    };

    let mut builder = Builder::new();
    builder.store_bytes(last)?;
    let mut next = builder.end_cell()?;
    let mut cells = 1;

    for chunk in chunks {
        let mut builder = Builder::new();
        builder.store_bytes(chunk)?;
        builder.store_ref(next)?;
        next = builder.end_cell()?;
        cells += 1;
    }

    log::trace!("Snake-encoded {} bytes into {} cells", data.len(), cells);
    Ok(next)
}

/// Encodes a URL as off-chain content: tag byte `0x01` followed by the UTF-8
/// bytes of `url`, snake-encoded
pub fn encode_off_chain_content(url: &str) -> CellResult<Arc<Cell>> {
    let mut data = Vec::with_capacity(url.len() + 1);
    data.push(OFF_CHAIN_CONTENT_TAG);
    data.extend_from_slice(url.as_bytes());
    make_snake_cell(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let cell = make_snake_cell(&[]).unwrap();
        assert_eq!(cell.bit_len(), 0);
        assert_eq!(cell.reference_count(), 0);
    }

    #[test]
    fn test_single_chunk_is_single_cell() {
        let cell = make_snake_cell(b"ipfs://bafy/").unwrap();
        assert_eq!(cell.data(), b"ipfs://bafy/");
        assert_eq!(cell.reference_count(), 0);
    }

    #[test]
    fn test_chain_links_in_order() {
        let data: Vec<u8> = (0..200u8).collect();
        let head = make_snake_cell(&data).unwrap();
        assert_eq!(head.data(), &data[..127]);
        assert_eq!(head.reference_count(), 1);

        let tail = head.reference(0).unwrap();
        assert_eq!(tail.data(), &data[127..]);
        assert_eq!(tail.reference_count(), 0);
    }

    #[test]
    fn test_off_chain_tag() {
        let cell = encode_off_chain_content("https://a.b/c.json").unwrap();
        assert_eq!(cell.data()[0], 0x01);
        assert_eq!(&cell.data()[1..], b"https://a.b/c.json");
    }

    #[test]
    fn test_off_chain_tag_shifts_chunk_boundary() {
        let url = "u".repeat(127);
        let cell = encode_off_chain_content(&url).unwrap();
        // 128 tagged bytes: 127 in the head, one in the tail
        assert_eq!(cell.bit_len(), 127 * 8);
        assert_eq!(cell.reference(0).unwrap().data(), b"u");
    }
}
