//! NFT collection encoders
//!
//! Pure functions from typed records to finalized cells:
//! - content: snake chains and off-chain content
//! - config: the collection's initial data cell
//! - messages: operation message bodies
//! - collection: address derivation and message envelopes
//! - get_methods: get-method ids and arguments

pub mod collection;
pub mod config;
pub mod constants;
pub mod content;
pub mod get_methods;
pub mod messages;

pub use collection::{InternalMessage, NftCollection, SendMode};
pub use config::{MintWindow, NftCollectionConfig, Royalty};
pub use content::{encode_off_chain_content, make_snake_cell};
pub use get_methods::{GetMethod, whitelist_checker_argument};
pub use messages::{CollectionMessage, MintParams, QueryId, SetStartedParams, WithdrawParams};
