//! TVM (TON Virtual Machine) data structures and utilities
//!
//! This module provides the cell primitives the collection encoders build on:
//! - Cell / CellBuilder: immutable cells of up to 1023 bits and 4 references
//! - Builder: address, coin and signed-integer encodings on top of CellBuilder
//! - Slice: sequential reader for trivial reads of encoded cells
//! - BoC: Bag of Cells serialization for handing cells to a transport
//! - StateInit: initial contract state and address derivation

pub mod address;
pub mod boc;
pub mod builder;
pub mod cell;
pub mod error;
pub mod slice;
pub mod state_init;

pub use address::Address;
pub use boc::{base64_to_boc, boc_to_base64, boc_to_hex, deserialize_boc, hex_to_boc, serialize_boc};
pub use builder::Builder;
pub use cell::{Cell, CellBuilder, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
pub use error::{CellError, CellResult};
pub use slice::Slice;
pub use state_init::StateInit;
