//! Protocol constants of the collection contract
//!
//! These are fixed by the on-chain contract and the cell format; changing any
//! of them produces cells the contract rejects or misreads.

/// Maximum bytes stored per cell of a snake chain
pub const CHUNK_SIZE: usize = 127;

/// Content layout tag marking an off-chain, snake-encoded URL
pub const OFF_CHAIN_CONTENT_TAG: u8 = 0x01;

/// Denominator of the royalty fraction
pub const ROYALTY_BASE: u16 = 1000;

/// Width of the signed mint-window `started` flag
pub const STARTED_FLAG_BITS: usize = 4;

/// `started` value the contract treats as "mint window open"
pub const STARTED_FLAG_ON: i8 = -1;

pub const OP_MINT: u32 = 1;
pub const OP_CHANGE_ADMIN: u32 = 3;
pub const OP_SET_STARTED: u32 = 4;
pub const OP_WITHDRAW: u32 = 5;
pub const OP_SET_WHITELIST_ADDRESS: u32 = 7;

/// Attached value for administrative operations (0.01 TON)
pub const ADMIN_MESSAGE_VALUE: u128 = 10_000_000;
