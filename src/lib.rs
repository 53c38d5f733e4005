//! Cell encoders for a whitelisted NFT collection contract on TON
//!
//! Configuration records and operation messages are encoded into cell trees
//! under the 1023-bit / 4-reference cell limits. Transport, signing and
//! decoding of results are left to other crates.

pub mod cli;
pub mod crc;
pub mod nft;
pub mod tvm;
pub mod utils;
